use crate::memory::{TypeAddr, PROGRAM_START};

pub const REG_COUNT: usize = 16;
/// VF doubles as the carry/borrow/collision flag.
pub const FLAG: u8 = 0xF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    registers: [u8; REG_COUNT],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; REG_COUNT],
            pc: ProgramCounter(PROGRAM_START),
            index: IndexRegister(0),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // register numbers come from a nibble, so only the low 4 bits count
    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn set_flag(&mut self, value: bool) {
        self.set_register(FLAG, value as u8);
    }

    pub fn all(&self) -> &[u8; REG_COUNT] {
        &self.registers
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    /// Steps over one instruction word.
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}
