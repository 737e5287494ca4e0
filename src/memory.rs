use crate::error::{Chip8Error, Result};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; FONT_GLYPH_LEN * 16];

pub const MEMORY_SIZE: usize = 4096;
/// First byte of program RAM; everything below belongs to the interpreter.
pub const PROGRAM_START: TypeAddr = 0x200;
pub const RAM_CAPACITY: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const FONT_BASE: TypeAddr = 0x050;
pub const FONT_GLYPH_LEN: usize = 5;
pub const STACK_DEPTH: usize = 16;

const DEFAULT_FONT: FontBytes = [
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

/// Address of the built-in glyph for hex digit `digit` (low nibble only).
pub fn glyph_addr(digit: u8) -> TypeAddr {
    FONT_BASE + (digit & 0xF) as TypeAddr * FONT_GLYPH_LEN as TypeAddr
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Interpreter,
    Font,
    Ram,
}

impl Region {
    // font sits inside the interpreter area, so it has to be checked first
    pub fn of(addr: TypeAddr) -> Option<Region> {
        let font_end = FONT_BASE + DEFAULT_FONT.len() as TypeAddr;
        match addr {
            a if (FONT_BASE..font_end).contains(&a) => Some(Region::Font),
            a if a < PROGRAM_START => Some(Region::Interpreter),
            a if (a as usize) < MEMORY_SIZE => Some(Region::Ram),
            _ => None,
        }
    }

    pub fn is_writable(self) -> bool {
        self == Region::Ram
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    // 4k bytes
    // font data stored from 050 -> 09F (000 -> 04F is empty by convention)
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut mem = Self {
            bytes: [0; MEMORY_SIZE],
        };
        mem.reset();
        mem
    }

    /// Reloads the font and zero-fills program RAM.
    pub fn reset(&mut self) {
        self.bytes.fill(0);
        let start_index = FONT_BASE as usize;
        self.bytes[start_index..start_index + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
    }

    pub fn get(&self, addr: TypeAddr) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Chip8Error::IllegalAccess { address: addr })
    }

    pub fn set(&mut self, addr: TypeAddr, val: u8) -> Result<()> {
        self.check_writable(addr, 1)?;
        self.bytes[addr as usize] = val;
        Ok(())
    }

    /// Big-endian word at `addr`, `addr + 1`.
    pub fn get_word(&self, addr: TypeAddr) -> Result<u16> {
        let hi = self.get(addr)?;
        let lo = self.get(addr + 1)?;
        Ok(((hi as u16) << 8) | lo as u16)
    }

    /// Borrows `len` bytes starting at `addr`, failing if any of them is out of range.
    pub fn slice(&self, addr: TypeAddr, len: usize) -> Result<&[u8]> {
        let start = addr as usize;
        if start + len > MEMORY_SIZE {
            return Err(Chip8Error::IllegalAccess {
                address: start.max(MEMORY_SIZE) as TypeAddr,
            });
        }
        Ok(&self.bytes[start..start + len])
    }

    /// Writes `data` at `addr` only if every target byte lies in program RAM.
    pub fn write_block(&mut self, addr: TypeAddr, data: &[u8]) -> Result<()> {
        self.check_writable(addr, data.len())?;
        let start = addr as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Fails with the first address in `addr..addr + len` that a program may not write.
    pub fn check_writable(&self, addr: TypeAddr, len: usize) -> Result<()> {
        for offset in 0..len {
            let target = addr as usize + offset;
            let writable = target < MEMORY_SIZE
                && Region::of(target as TypeAddr).map_or(false, Region::is_writable);
            if !writable {
                return Err(Chip8Error::IllegalAccess {
                    address: target.min(u16::MAX as usize) as TypeAddr,
                });
            }
        }
        Ok(())
    }

    // loads program bytes starting at address 0x200
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > RAM_CAPACITY {
            return Err(Chip8Error::InvalidRom {
                size: bytes.len(),
                max_size: RAM_CAPACITY,
            });
        }
        self.write_block(PROGRAM_START, bytes)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").field("size", &self.bytes.len()).finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    addresses: [TypeAddr; STACK_DEPTH],
    depth: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<()> {
        if self.depth == STACK_DEPTH {
            return Err(Chip8Error::StackOverflow);
        }
        self.addresses[self.depth] = addr;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr> {
        if self.depth == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.depth -= 1;
        Ok(std::mem::take(&mut self.addresses[self.depth]))
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_full(&self) -> bool {
        self.depth == STACK_DEPTH
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
