use std::ops::{Index, IndexMut};

use crate::error::Fault;

/// Total size of the Chip8 memory.
pub const MEMORY_SIZE: usize = 4096;

/// Address where loaded programs begin. Everything below this is
/// reserved for the interpreter.
pub const PROGRAM_START: usize = 0x200;

/// Address of the built-in font glyphs.
pub const FONT_ADDR: usize = 0x50;

/// Size in bytes of a single font glyph.
pub const FONT_GLYPH_SIZE: usize = 5;

/// Built in Chip8 font data, one 5-byte glyph per hex digit.
const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// The 4096-byte address space of the `Chip8`.
///
/// The font glyphs are written once at construction and are never touched
/// by [`load`](Memory::load); a program that overwrites them gets whatever
/// it asked for.
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[FONT_ADDR..FONT_ADDR + FONT.len()].copy_from_slice(&FONT);
        Self { bytes }
    }
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a program into memory starting at [`PROGRAM_START`].
    ///
    /// Input longer than the program region is rejected before any byte
    /// is written. All other regions, including the font, are untouched.
    pub fn load(&mut self, data: &[u8]) -> Result<(), Fault> {
        let max = MEMORY_SIZE - PROGRAM_START;
        if data.len() > max {
            return Err(Fault::ProgramTooLarge {
                size: data.len(),
                max,
            });
        }
        self.bytes[PROGRAM_START..PROGRAM_START + data.len()].copy_from_slice(data);
        log::debug!("loaded {} byte program at {PROGRAM_START:#06X}", data.len());
        Ok(())
    }
}

impl Index<usize> for Memory {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.bytes[index]
    }
}

impl IndexMut<usize> for Memory {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.bytes[index]
    }
}
