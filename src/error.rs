use crate::memory::TypeAddr;

pub type Result<T> = std::result::Result<T, Chip8Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Chip8Error {
    #[error("illegal memory access at address {address:#06X}")]
    IllegalAccess { address: TypeAddr },

    #[error("stack overflow: call depth exceeds 16")]
    StackOverflow,

    #[error("stack underflow: return with empty call stack")]
    StackUnderflow,

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    InvalidRom { size: usize, max_size: usize },

    #[error("invalid opcode: {opcode:#06X}")]
    InvalidOpcode { opcode: u16 },

    #[error("key index {key:#X} is outside the keypad")]
    InvalidKey { key: u8 },

    #[error("machine halted after a fatal error, reset required")]
    Halted,
}
