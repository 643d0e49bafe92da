use crate::decoder::{self, Instruction};
use crate::error::Fault;
use crate::memory::{self, FONT_ADDR, FONT_GLYPH_SIZE, MEMORY_SIZE};
use crate::Bus;

/// Default starting point for most Chip8 programs.
const STARTING_PC: usize = memory::PROGRAM_START;

/// Mask applied to the index register whenever it is recomputed. Values
/// above 12 bits wrap, matching common reference interpreters.
const ADDR_MASK: usize = 0xFFF;

/// Describes how the program counter should be updated after
/// executing an instruction.
enum PCUpdate {
    /// Go directly to the next instruction (pc + 2).
    Next,

    /// Skip the next instruction (pc + 4).
    SkipNext,

    /// Jump to the given address.
    Jump(usize),
}

/// The `Chip8` processor: registers, index register, program counter and
/// call stack, plus the fetch/decode/execute cycle that drives the rest
/// of the [`Bus`].
#[derive(Default)]
pub struct Processor {
    /// Vx registers
    pub v: [u8; 16],

    /// Index register
    pub i: usize,

    /// Program counter
    pub pc: usize,

    /// Stack pointer
    pub sp: usize,

    /// Stack memory
    pub stack: [usize; 16],
}

impl Processor {
    pub fn new() -> Self {
        Self {
            pc: STARTING_PC,
            ..Default::default()
        }
    }

    /// Run one instruction cycle: fetch the two bytes at `pc`, decode,
    /// execute, and update `pc`.
    ///
    /// While the input system is waiting for a key press this is a no-op,
    /// so timers keep running and the caller can shut down cleanly.
    pub fn cycle(&mut self, bus: &mut Bus) -> Result<(), Fault> {
        // if the input system is waiting for a key, don't process any opcodes
        if bus.input.waiting() {
            return Ok(());
        } else if let Some(response) = bus.input.request_response() {
            self.v[response.register] = response.key_code;
        }

        if self.pc + 1 >= MEMORY_SIZE {
            return Err(Fault::FetchOutOfBounds { addr: self.pc });
        }
        // the next two bytes combine big-endian into one instruction
        let opcode = (u16::from(bus.memory[self.pc]) << 8) | u16::from(bus.memory[self.pc + 1]);

        let instruction = decoder::decode(opcode).ok_or_else(|| {
            log::error!("unknown opcode {opcode:#06X} at {:#06X}", self.pc);
            Fault::UnknownOpcode {
                opcode,
                addr: self.pc,
            }
        })?;

        match self.execute(instruction, bus)? {
            PCUpdate::Next => self.pc += 2,
            PCUpdate::SkipNext => self.pc += 4,
            PCUpdate::Jump(addr) => self.pc = addr,
        }
        Ok(())
    }

    fn execute(&mut self, instruction: Instruction, bus: &mut Bus) -> Result<PCUpdate, Fault> {
        let update = match instruction {
            Instruction::Clear => {
                bus.graphics.clear();
                PCUpdate::Next
            }

            Instruction::Return => {
                if self.sp == 0 {
                    return Err(Fault::StackUnderflow { addr: self.pc });
                }
                self.sp -= 1;
                PCUpdate::Jump(self.stack[self.sp])
            }

            Instruction::Jump { nnn } => PCUpdate::Jump(nnn),

            Instruction::Call { nnn } => {
                if self.sp == self.stack.len() {
                    return Err(Fault::StackOverflow { addr: self.pc });
                }
                self.stack[self.sp] = self.pc + 2;
                self.sp += 1;
                PCUpdate::Jump(nnn)
            }

            Instruction::SkipEqImm { x, kk } => skip_if(self.v[x] == kk),
            Instruction::SkipNeImm { x, kk } => skip_if(self.v[x] != kk),
            Instruction::SkipEqReg { x, y } => skip_if(self.v[x] == self.v[y]),
            Instruction::SkipNeReg { x, y } => skip_if(self.v[x] != self.v[y]),

            Instruction::LoadImm { x, kk } => {
                self.v[x] = kk;
                PCUpdate::Next
            }

            Instruction::AddImm { x, kk } => {
                self.v[x] = self.v[x].wrapping_add(kk);
                PCUpdate::Next
            }

            Instruction::Move { x, y } => {
                self.v[x] = self.v[y];
                PCUpdate::Next
            }

            Instruction::Or { x, y } => {
                self.v[x] |= self.v[y];
                PCUpdate::Next
            }

            Instruction::And { x, y } => {
                self.v[x] &= self.v[y];
                PCUpdate::Next
            }

            Instruction::Xor { x, y } => {
                self.v[x] ^= self.v[y];
                PCUpdate::Next
            }

            Instruction::Add { x, y } => {
                let (result, carry) = self.v[x].overflowing_add(self.v[y]);
                self.v[x] = result;
                self.v[0xF] = u8::from(carry);
                PCUpdate::Next
            }

            Instruction::Sub { x, y } => {
                // strict comparison: equal operands leave VF = 0
                let no_borrow = u8::from(self.v[x] > self.v[y]);
                self.v[x] = self.v[x].wrapping_sub(self.v[y]);
                self.v[0xF] = no_borrow;
                PCUpdate::Next
            }

            Instruction::ShiftRight { x } => {
                let shifted_out = self.v[x] & 1;
                self.v[x] >>= 1;
                self.v[0xF] = shifted_out;
                PCUpdate::Next
            }

            Instruction::SubNegate { x, y } => {
                let no_borrow = u8::from(self.v[y] > self.v[x]);
                self.v[x] = self.v[y].wrapping_sub(self.v[x]);
                self.v[0xF] = no_borrow;
                PCUpdate::Next
            }

            Instruction::ShiftLeft { x } => {
                let shifted_out = (self.v[x] & 0x80) >> 7;
                self.v[x] <<= 1;
                self.v[0xF] = shifted_out;
                PCUpdate::Next
            }

            Instruction::LoadIndex { nnn } => {
                self.i = nnn;
                PCUpdate::Next
            }

            Instruction::JumpOffset { nnn } => PCUpdate::Jump(nnn + usize::from(self.v[0])),

            Instruction::Random { x, kk } => {
                let mut buf = [0u8; 1];
                getrandom::getrandom(&mut buf).unwrap();
                self.v[x] = buf[0] & kk;
                PCUpdate::Next
            }

            Instruction::Draw { x, y, n } => {
                let x = usize::from(self.v[x]);
                let y = usize::from(self.v[y]);
                let mut collision = false;
                for row in 0..n {
                    let data = bus.memory[(self.i + row) & ADDR_MASK];
                    collision |= bus.graphics.draw_byte(x, y + row, data);
                }
                self.v[0xF] = collision.into();
                PCUpdate::Next
            }

            Instruction::SkipKeyPressed { x } => skip_if(bus.input.is_key_pressed(self.v[x])),
            Instruction::SkipKeyReleased { x } => skip_if(!bus.input.is_key_pressed(self.v[x])),

            Instruction::LoadDelay { x } => {
                self.v[x] = bus.clock.delay_timer;
                PCUpdate::Next
            }

            Instruction::WaitKey { x } => {
                bus.input.request_key_press(x);
                PCUpdate::Next
            }

            Instruction::SetDelay { x } => {
                bus.clock.delay_timer = self.v[x];
                PCUpdate::Next
            }

            Instruction::SetSound { x } => {
                bus.clock
                    .sound_timer
                    .store(self.v[x], std::sync::atomic::Ordering::SeqCst);
                PCUpdate::Next
            }

            Instruction::AddIndex { x } => {
                self.i = (self.i + usize::from(self.v[x])) & ADDR_MASK;
                PCUpdate::Next
            }

            Instruction::LoadGlyph { x } => {
                self.i = FONT_ADDR + FONT_GLYPH_SIZE * usize::from(self.v[x]);
                PCUpdate::Next
            }

            Instruction::StoreBcd { x } => {
                bus.memory[self.i & ADDR_MASK] = self.v[x] / 100;
                bus.memory[(self.i + 1) & ADDR_MASK] = (self.v[x] / 10) % 10;
                bus.memory[(self.i + 2) & ADDR_MASK] = self.v[x] % 10;
                PCUpdate::Next
            }

            Instruction::StoreRegisters { x } => {
                for offset in 0..=x {
                    bus.memory[(self.i + offset) & ADDR_MASK] = self.v[offset];
                }
                PCUpdate::Next
            }

            Instruction::LoadRegisters { x } => {
                for offset in 0..=x {
                    self.v[offset] = bus.memory[(self.i + offset) & ADDR_MASK];
                }
                PCUpdate::Next
            }
        };
        Ok(update)
    }
}

fn skip_if(condition: bool) -> PCUpdate {
    if condition {
        PCUpdate::SkipNext
    } else {
        PCUpdate::Next
    }
}
