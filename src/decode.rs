use std::fmt;

use crate::error::{Chip8Error, Result};
use crate::memory::TypeAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    // n is starting digit (1 = most significant), m is length
    pub fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        //      1111 1111 1111   n = 2, m = 3
        //           1111        n = 3, m = 1
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask = (1u32 << (m * 4)) - 1;
        (self.code >> shift_places) & mask as u16
    }

    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn kk(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // 0NNN
    // machine code routine, ignored
    Sys(TypeAddr),
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    // set register VX to value NN
    SetRegister(u8, u8),
    // 7XNN
    // add value NN to VX, VF untouched
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    // 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8),

    // ANNN
    // set index register I to address NNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I
    // at Coordinates (VX, VY)
    // XOR pixels on screen using sprite data
    // if pixels on screen were switched OFF: VF set to 1
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),
}

/// One row of the instruction table: `opcode & mask == pattern` selects it.
pub struct Pattern {
    pub mask: u16,
    pub pattern: u16,
    pub name: &'static str,
    build: fn(RawInstruction) -> Instruction,
}

impl Pattern {
    pub fn matches(&self, opcode: u16) -> bool {
        opcode & self.mask == self.pattern
    }
}

macro_rules! pattern {
    ($mask:expr, $pattern:expr, $name:expr, $build:expr) => {
        Pattern {
            mask: $mask,
            pattern: $pattern,
            name: $name,
            build: $build,
        }
    };
}

use Instruction::*;

/// The canonical CHIP-8 instruction set, most specific masks first.
pub static INSTRUCTION_TABLE: [Pattern; 35] = [
    pattern!(0xFFFF, 0x00E0, "CLS", |_| ClearScreen),
    pattern!(0xFFFF, 0x00EE, "RET", |_| PopSubroutine),
    pattern!(0xF000, 0x0000, "SYS", |r| Sys(r.nnn())),
    pattern!(0xF000, 0x1000, "JP", |r| Jump(r.nnn())),
    pattern!(0xF000, 0x2000, "CALL", |r| PushSubroutine(r.nnn())),
    pattern!(0xF000, 0x3000, "SE", |r| SkipEqualConstant(r.x(), r.kk())),
    pattern!(0xF000, 0x4000, "SNE", |r| SkipNotEqualConstant(r.x(), r.kk())),
    pattern!(0xF00F, 0x5000, "SE", |r| SkipEqualRegister(r.x(), r.y())),
    pattern!(0xF000, 0x6000, "LD", |r| SetRegister(r.x(), r.kk())),
    pattern!(0xF000, 0x7000, "ADD", |r| AddToRegister(r.x(), r.kk())),
    pattern!(0xF00F, 0x8000, "LD", |r| CopyRegister(r.x(), r.y())),
    pattern!(0xF00F, 0x8001, "OR", |r| Or(r.x(), r.y())),
    pattern!(0xF00F, 0x8002, "AND", |r| And(r.x(), r.y())),
    pattern!(0xF00F, 0x8003, "XOR", |r| XOr(r.x(), r.y())),
    pattern!(0xF00F, 0x8004, "ADD", |r| Add(r.x(), r.y())),
    pattern!(0xF00F, 0x8005, "SUB", |r| SubtractForward(r.x(), r.y())),
    pattern!(0xF00F, 0x8006, "SHR", |r| RightShift(r.x())),
    pattern!(0xF00F, 0x8007, "SUBN", |r| SubtractBackward(r.x(), r.y())),
    pattern!(0xF00F, 0x800E, "SHL", |r| LeftShift(r.x())),
    pattern!(0xF00F, 0x9000, "SNE", |r| SkipNotEqualRegister(r.x(), r.y())),
    pattern!(0xF000, 0xA000, "LD", |r| SetIndexRegister(r.nnn())),
    pattern!(0xF000, 0xB000, "JP", |r| JumpWithOffset(r.nnn())),
    pattern!(0xF000, 0xC000, "RND", |r| Random(r.x(), r.kk())),
    pattern!(0xF000, 0xD000, "DRW", |r| Display(r.x(), r.y(), r.n())),
    pattern!(0xF0FF, 0xE09E, "SKP", |r| SkipIfPressed(r.x())),
    pattern!(0xF0FF, 0xE0A1, "SKNP", |r| SkipIfNotPressed(r.x())),
    pattern!(0xF0FF, 0xF007, "LD", |r| CopyDelayToRegister(r.x())),
    pattern!(0xF0FF, 0xF00A, "LD", |r| GetKey(r.x())),
    pattern!(0xF0FF, 0xF015, "LD", |r| CopyRegisterToDelay(r.x())),
    pattern!(0xF0FF, 0xF018, "LD", |r| CopyRegisterToSound(r.x())),
    pattern!(0xF0FF, 0xF01E, "ADD", |r| AddToIndex(r.x())),
    pattern!(0xF0FF, 0xF029, "LD", |r| PointChar(r.x())),
    pattern!(0xF0FF, 0xF033, "LD", |r| ToDecimal(r.x())),
    pattern!(0xF0FF, 0xF055, "LD", |r| StoreRegisterToMemory(r.x())),
    pattern!(0xF0FF, 0xF065, "LD", |r| LoadRegisterFromMemory(r.x())),
];

impl Instruction {
    pub fn decode(opcode: u16) -> Result<Self> {
        INSTRUCTION_TABLE
            .iter()
            .find(|p| p.matches(opcode))
            .map(|p| (p.build)(RawInstruction::new(opcode)))
            .ok_or(Chip8Error::InvalidOpcode { opcode })
    }

    /// True for the instructions that change the framebuffer.
    pub fn draws(&self) -> bool {
        matches!(self, ClearScreen | Display(..))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Sys(addr) => write!(f, "SYS {addr:#05X}"),
            ClearScreen => write!(f, "CLS"),
            PopSubroutine => write!(f, "RET"),
            Jump(addr) => write!(f, "JP {addr:#05X}"),
            PushSubroutine(addr) => write!(f, "CALL {addr:#05X}"),
            SkipEqualConstant(x, kk) => write!(f, "SE V{x:X}, {kk:#04X}"),
            SkipNotEqualConstant(x, kk) => write!(f, "SNE V{x:X}, {kk:#04X}"),
            SkipEqualRegister(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            SkipNotEqualRegister(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            SetRegister(x, kk) => write!(f, "LD V{x:X}, {kk:#04X}"),
            AddToRegister(x, kk) => write!(f, "ADD V{x:X}, {kk:#04X}"),
            CopyRegister(x, y) => write!(f, "LD V{x:X}, V{y:X}"),
            Or(x, y) => write!(f, "OR V{x:X}, V{y:X}"),
            And(x, y) => write!(f, "AND V{x:X}, V{y:X}"),
            XOr(x, y) => write!(f, "XOR V{x:X}, V{y:X}"),
            Add(x, y) => write!(f, "ADD V{x:X}, V{y:X}"),
            SubtractForward(x, y) => write!(f, "SUB V{x:X}, V{y:X}"),
            RightShift(x) => write!(f, "SHR V{x:X}"),
            SubtractBackward(x, y) => write!(f, "SUBN V{x:X}, V{y:X}"),
            LeftShift(x) => write!(f, "SHL V{x:X}"),
            SetIndexRegister(addr) => write!(f, "LD I, {addr:#05X}"),
            JumpWithOffset(addr) => write!(f, "JP V0, {addr:#05X}"),
            Random(x, kk) => write!(f, "RND V{x:X}, {kk:#04X}"),
            Display(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            SkipIfPressed(x) => write!(f, "SKP V{x:X}"),
            SkipIfNotPressed(x) => write!(f, "SKNP V{x:X}"),
            CopyDelayToRegister(x) => write!(f, "LD V{x:X}, DT"),
            GetKey(x) => write!(f, "LD V{x:X}, K"),
            CopyRegisterToDelay(x) => write!(f, "LD DT, V{x:X}"),
            CopyRegisterToSound(x) => write!(f, "LD ST, V{x:X}"),
            AddToIndex(x) => write!(f, "ADD I, V{x:X}"),
            PointChar(x) => write!(f, "LD F, V{x:X}"),
            ToDecimal(x) => write!(f, "LD B, V{x:X}"),
            StoreRegisterToMemory(x) => write!(f, "LD [I], V{x:X}"),
            LoadRegisterFromMemory(x) => write!(f, "LD V{x:X}, [I]"),
        }
    }
}
