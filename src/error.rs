/// A fatal condition raised while loading or executing a program.
///
/// Every fault stops the executor; none are retried. Addresses and raw
/// opcodes are carried so the embedding frontend can print a useful
/// diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    #[error("program is {size} bytes, maximum is {max} bytes")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("unknown opcode {opcode:#06X} at {addr:#06X}")]
    UnknownOpcode { opcode: u16, addr: usize },

    #[error("instruction fetch out of bounds at {addr:#06X}")]
    FetchOutOfBounds { addr: usize },

    #[error("call stack overflow at {addr:#06X}")]
    StackOverflow { addr: usize },

    #[error("return with an empty call stack at {addr:#06X}")]
    StackUnderflow { addr: usize },
}
