//! Pure decoding of raw 16-bit opcodes into [`Instruction`] values.
//!
//! Opcodes are stored big-endian and are cased on some combination of
//! their four nibbles:
//!
//! - `n1` selects the opcode family
//! - `n2` (`x`) and `n3` (`y`) are register indices
//! - `n4`, `kk` (low byte) and `nnn` (low 12 bits) carry data

/// A fully decoded instruction, one variant per recognized family.
///
/// The executor matches on this exhaustively, so adding a variant without
/// handling it is a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0: clear the screen.
    Clear,
    /// 00EE: return from a subroutine.
    Return,
    /// 1nnn: jump to `nnn`.
    Jump { nnn: usize },
    /// 2nnn: call the subroutine at `nnn`.
    Call { nnn: usize },
    /// 3xkk: skip the next instruction if `Vx == kk`.
    SkipEqImm { x: usize, kk: u8 },
    /// 4xkk: skip the next instruction if `Vx != kk`.
    SkipNeImm { x: usize, kk: u8 },
    /// 5xy0: skip the next instruction if `Vx == Vy`.
    SkipEqReg { x: usize, y: usize },
    /// 6xkk: `Vx = kk`.
    LoadImm { x: usize, kk: u8 },
    /// 7xkk: `Vx += kk`, wrapping, VF untouched.
    AddImm { x: usize, kk: u8 },
    /// 8xy0: `Vx = Vy`.
    Move { x: usize, y: usize },
    /// 8xy1: `Vx |= Vy`.
    Or { x: usize, y: usize },
    /// 8xy2: `Vx &= Vy`.
    And { x: usize, y: usize },
    /// 8xy3: `Vx ^= Vy`.
    Xor { x: usize, y: usize },
    /// 8xy4: `Vx += Vy`, VF = carry.
    Add { x: usize, y: usize },
    /// 8xy5: `Vx -= Vy`, VF = no borrow.
    Sub { x: usize, y: usize },
    /// 8xy6: `Vx >>= 1`, VF = bit shifted out.
    ShiftRight { x: usize },
    /// 8xy7: `Vx = Vy - Vx`, VF = no borrow.
    SubNegate { x: usize, y: usize },
    /// 8xyE: `Vx <<= 1`, VF = bit shifted out.
    ShiftLeft { x: usize },
    /// 9xy0: skip the next instruction if `Vx != Vy`.
    SkipNeReg { x: usize, y: usize },
    /// Annn: `I = nnn`.
    LoadIndex { nnn: usize },
    /// Bnnn: jump to `nnn + V0`.
    JumpOffset { nnn: usize },
    /// Cxkk: `Vx = random byte AND kk`.
    Random { x: usize, kk: u8 },
    /// Dxyn: draw the `n`-row sprite at `I` at `(Vx, Vy)`, VF = collision.
    Draw { x: usize, y: usize, n: usize },
    /// Ex9E: skip the next instruction if key `Vx` is pressed.
    SkipKeyPressed { x: usize },
    /// ExA1: skip the next instruction if key `Vx` is released.
    SkipKeyReleased { x: usize },
    /// Fx07: `Vx = delay timer`.
    LoadDelay { x: usize },
    /// Fx0A: suspend until a key press, store the key in `Vx`.
    WaitKey { x: usize },
    /// Fx15: `delay timer = Vx`.
    SetDelay { x: usize },
    /// Fx18: `sound timer = Vx`.
    SetSound { x: usize },
    /// Fx1E: `I += Vx`, masked to 12 bits.
    AddIndex { x: usize },
    /// Fx29: `I` = address of the font glyph for digit `Vx`.
    LoadGlyph { x: usize },
    /// Fx33: store the BCD digits of `Vx` at `I`, `I+1`, `I+2`.
    StoreBcd { x: usize },
    /// Fx55: copy `V0..=Vx` to memory starting at `I`.
    StoreRegisters { x: usize },
    /// Fx65: copy memory starting at `I` into `V0..=Vx`.
    LoadRegisters { x: usize },
}

/// Decode a raw opcode, or `None` for an unrecognized nibble pattern.
pub fn decode(opcode: u16) -> Option<Instruction> {
    let x = usize::from((opcode & 0x0F00) >> 8);
    let y = usize::from((opcode & 0x00F0) >> 4);
    let n = usize::from(opcode & 0x000F);
    let kk = (opcode & 0x00FF) as u8;
    let nnn = usize::from(opcode & 0x0FFF);

    let instruction = match (opcode & 0xF000) >> 12 {
        0x0 => match opcode {
            0x00E0 => Instruction::Clear,
            0x00EE => Instruction::Return,
            _ => return None,
        },
        0x1 => Instruction::Jump { nnn },
        0x2 => Instruction::Call { nnn },
        0x3 => Instruction::SkipEqImm { x, kk },
        0x4 => Instruction::SkipNeImm { x, kk },
        0x5 if n == 0 => Instruction::SkipEqReg { x, y },
        0x6 => Instruction::LoadImm { x, kk },
        0x7 => Instruction::AddImm { x, kk },
        0x8 => match n {
            0x0 => Instruction::Move { x, y },
            0x1 => Instruction::Or { x, y },
            0x2 => Instruction::And { x, y },
            0x3 => Instruction::Xor { x, y },
            0x4 => Instruction::Add { x, y },
            0x5 => Instruction::Sub { x, y },
            0x6 => Instruction::ShiftRight { x },
            0x7 => Instruction::SubNegate { x, y },
            0xE => Instruction::ShiftLeft { x },
            _ => return None,
        },
        0x9 if n == 0 => Instruction::SkipNeReg { x, y },
        0xA => Instruction::LoadIndex { nnn },
        0xB => Instruction::JumpOffset { nnn },
        0xC => Instruction::Random { x, kk },
        0xD => Instruction::Draw { x, y, n },
        0xE => match kk {
            0x9E => Instruction::SkipKeyPressed { x },
            0xA1 => Instruction::SkipKeyReleased { x },
            _ => return None,
        },
        0xF => match kk {
            0x07 => Instruction::LoadDelay { x },
            0x0A => Instruction::WaitKey { x },
            0x15 => Instruction::SetDelay { x },
            0x18 => Instruction::SetSound { x },
            0x1E => Instruction::AddIndex { x },
            0x29 => Instruction::LoadGlyph { x },
            0x33 => Instruction::StoreBcd { x },
            0x55 => Instruction::StoreRegisters { x },
            0x65 => Instruction::LoadRegisters { x },
            _ => return None,
        },
        _ => return None,
    };
    Some(instruction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fields() {
        assert_eq!(
            decode(0x3A7F),
            Some(Instruction::SkipEqImm { x: 0xA, kk: 0x7F })
        );
        assert_eq!(decode(0x1BCD), Some(Instruction::Jump { nnn: 0xBCD }));
        assert_eq!(
            decode(0xD125),
            Some(Instruction::Draw { x: 1, y: 2, n: 5 })
        );
    }

    #[test]
    fn decodes_alu_sub_nibble() {
        assert_eq!(decode(0x8AB4), Some(Instruction::Add { x: 0xA, y: 0xB }));
        assert_eq!(decode(0x8A06), Some(Instruction::ShiftRight { x: 0xA }));
        assert_eq!(decode(0x8A0E), Some(Instruction::ShiftLeft { x: 0xA }));
    }

    #[test]
    fn decodes_low_byte_families() {
        assert_eq!(decode(0xE29E), Some(Instruction::SkipKeyPressed { x: 2 }));
        assert_eq!(decode(0xF533), Some(Instruction::StoreBcd { x: 5 }));
        assert_eq!(decode(0x00E0), Some(Instruction::Clear));
        assert_eq!(decode(0x00EE), Some(Instruction::Return));
    }

    #[test]
    fn rejects_unknown_patterns() {
        // system jump, bad ALU nibble, bad skip nibble, bad F sub-opcode
        assert_eq!(decode(0x0123), None);
        assert_eq!(decode(0x8AB8), None);
        assert_eq!(decode(0x5AB1), None);
        assert_eq!(decode(0x9AB2), None);
        assert_eq!(decode(0xE2A2), None);
        assert_eq!(decode(0xF500), None);
    }
}
