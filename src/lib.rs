// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits)
//
// Delay timer & Sound timer: Count down at 60 times / s until 0,
// driven by the caller separately from instruction execution
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod execute;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;

pub use decode::Instruction;
pub use emulator::{Emulator, Machine, RunState, DEFAULT_CPU_HZ};
pub use error::{Chip8Error, Result};
pub use timer::TIMER_HZ;
