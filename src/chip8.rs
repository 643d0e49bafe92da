//! Core virtual machine for the CHIP-8 instruction set.
//!
//! The crate owns everything between a loaded program image and a 64x32
//! pixel grid: memory, registers, timers, input state, and the
//! fetch/decode/execute cycle. Rendering, audio output, file loading and
//! keyboard mapping live in the embedding frontend, which talks to the
//! machine through [`Chip8`], [`FrameSink`] and the shared sound timer.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::processor::Processor;

pub mod clock;
pub mod decoder;
pub mod error;
pub mod graphics;
pub mod input;
pub mod memory;
pub mod processor;

pub use error::Fault;

/// Instruction cycles run per 60 Hz frame by [`Chip8::run`].
/// 10 cycles per frame puts the machine at roughly 600 instructions
/// per second.
pub const DEFAULT_CYCLES_PER_FRAME: u32 = 10;

/// Duration of one 60 Hz display frame.
const FRAME_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Contains all the different components of the `Chip8` system, excluding
/// the `Processor`.
#[derive(Default)]
pub struct Bus {
    pub clock: clock::Clock,
    pub graphics: graphics::GraphicsBuffer,
    pub input: input::Input,
    pub memory: memory::Memory,
}

/// Receives display snapshots from the driver loop, once per frame.
pub trait FrameSink {
    fn present(&mut self, frame: &[bool; graphics::PIXEL_COUNT]);
}

/// The main CHIP-8 machine state, containing all the components of the
/// CHIP-8 and procedures to interact with them at a high level.
///
/// Multiple machines can coexist; nothing here is process-global.
#[derive(Default)]
pub struct Chip8 {
    pub processor: Processor,
    pub bus: Bus,
    cycles_per_frame: u32,
}

impl Chip8 {
    /// Create a new Chip8 instance with the font preloaded and the
    /// program counter at 0x200.
    pub fn new() -> Self {
        Self {
            processor: Processor::new(),
            cycles_per_frame: DEFAULT_CYCLES_PER_FRAME,
            ..Default::default()
        }
    }

    /// Load a program image into memory at 0x200.
    ///
    /// Images larger than the program region are rejected without
    /// touching memory.
    pub fn load_program(&mut self, data: &[u8]) -> Result<(), Fault> {
        self.bus.memory.load(data)
    }

    /// Performs one execution step: let the timers catch up to
    /// wall-clock time, then run one processor cycle.
    pub fn step(&mut self) -> Result<(), Fault> {
        self.bus.clock.update();
        self.processor.cycle(&mut self.bus)
    }

    /// Run the machine until `stop` is set or a fault occurs.
    ///
    /// Each iteration executes a bounded burst of instruction cycles,
    /// hands a display snapshot to `sink`, and sleeps to the next 60 Hz
    /// frame boundary. Timer decrements happen inside [`step`](Self::step)
    /// and so never stall on instruction throughput. A wait-for-key
    /// suspension keeps the loop spinning, which is what makes it
    /// cancellable through `stop`.
    pub fn run(&mut self, sink: &mut dyn FrameSink, stop: &AtomicBool) -> Result<(), Fault> {
        let mut next_frame = Instant::now() + FRAME_INTERVAL;
        while !stop.load(Ordering::Relaxed) {
            for _ in 0..self.cycles_per_frame {
                self.step().map_err(|fault| {
                    log::error!("executor fault: {fault}");
                    fault
                })?;
            }
            sink.present(self.bus.graphics.snapshot());

            let now = Instant::now();
            if next_frame > now {
                std::thread::sleep(next_frame - now);
            }
            next_frame += FRAME_INTERVAL;
        }
        Ok(())
    }

    /// How many instruction cycles [`run`](Self::run) executes per frame.
    pub fn set_cycles_per_frame(&mut self, cycles: u32) {
        self.cycles_per_frame = cycles;
    }

    /// Update the input state for the given key code. Called by the
    /// input collaborator on key-down and key-up events.
    pub fn update_key_state(&mut self, key_code: u8, pressed: bool) {
        self.bus.input.set_key(key_code, pressed);
    }

    /// Handle to the sound timer for the audio collaborator. Tone is
    /// active while the value is nonzero. The handle is replaced by
    /// [`reset`](Self::reset), so re-fetch it afterwards.
    pub fn sound_timer(&self) -> Arc<AtomicU8> {
        self.bus.clock.sound_timer.clone()
    }

    /// Whether the audio collaborator should be emitting a tone.
    pub fn tone_active(&self) -> bool {
        self.bus.clock.tone_active()
    }

    /// Return the machine to power-on state, keeping only the configured
    /// cycle rate.
    pub fn reset(&mut self) {
        self.processor = Processor::new();
        self.bus = Bus::default();
    }

    /// Convenience method for resetting the `Chip8` and loading the
    /// given program.
    pub fn reset_and_load(&mut self, data: &[u8]) -> Result<(), Fault> {
        self.reset();
        self.load_program(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSink;

    impl FrameSink for NullSink {
        fn present(&mut self, _frame: &[bool; graphics::PIXEL_COUNT]) {}
    }

    #[test]
    fn add_program_leaves_sum_in_v0() {
        let mut chip8 = Chip8::new();
        // V0 = 5, V1 = 3, V0 += V1
        chip8
            .load_program(&[0x60, 0x05, 0x61, 0x03, 0x80, 0x14])
            .unwrap();
        for _ in 0..3 {
            chip8.step().unwrap();
        }
        assert_eq!(chip8.processor.v[0], 8);
        assert_eq!(chip8.processor.v[1], 3);
        assert_eq!(chip8.processor.v[0xF], 0);
    }

    #[test]
    fn jump_skips_clear_without_touching_display() {
        let mut chip8 = Chip8::new();
        chip8.bus.graphics.draw_byte(0, 0, 0xFF);
        chip8.load_program(&[0x12, 0x04, 0x00, 0xE0]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.processor.pc, 0x204);
        assert!(chip8.bus.graphics.pixel(0, 0));
    }

    #[test]
    fn glyph_draw_program_renders_digit_zero() {
        let mut chip8 = Chip8::new();
        chip8
            .load_program(&[0x00, 0xE0, 0xA0, 0x50, 0x60, 0x00, 0x61, 0x00, 0xD0, 0x05])
            .unwrap();
        for _ in 0..5 {
            chip8.step().unwrap();
        }
        let glyph = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        for (y, row) in glyph.iter().enumerate() {
            for x in 0..8 {
                assert_eq!(chip8.bus.graphics.pixel(x, y), row & (0x80 >> x) != 0);
            }
        }
        assert_eq!(chip8.processor.v[0xF], 0);
    }

    #[test]
    fn oversized_program_is_rejected() {
        let mut chip8 = Chip8::new();
        let result = chip8.load_program(&[0; 3585]);
        assert!(matches!(result, Err(Fault::ProgramTooLarge { .. })));
    }

    #[test]
    fn run_honors_stop_flag() {
        let mut chip8 = Chip8::new();
        let stop = AtomicBool::new(true);
        assert_eq!(chip8.run(&mut NullSink, &stop), Ok(()));
    }

    #[test]
    fn run_surfaces_faults() {
        let mut chip8 = Chip8::new();
        // empty memory decodes as opcode 0x0000
        let stop = AtomicBool::new(false);
        assert!(matches!(
            chip8.run(&mut NullSink, &stop),
            Err(Fault::UnknownOpcode { opcode: 0, .. })
        ));
    }

    #[test]
    fn reset_returns_to_power_on_state() {
        let mut chip8 = Chip8::new();
        chip8.load_program(&[0x60, 0x05]).unwrap();
        chip8.step().unwrap();
        chip8.reset();
        assert_eq!(chip8.processor.pc, 0x200);
        assert_eq!(chip8.processor.v[0], 0);
        assert_eq!(chip8.bus.memory[0x200], 0);
    }
}
