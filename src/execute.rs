use rand::Rng;

use crate::{
    decode::Instruction::{self, *},
    emulator::Machine,
    error::Result,
    memory::glyph_addr,
    registers::FLAG,
};

/// What the engine should do after an instruction ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Next,
    /// The framebuffer changed.
    Redraw,
    /// Suspend until a key press is stored in the given register.
    AwaitKey(u8),
}

impl Instruction {
    /// Applies the instruction to `m`. PC already points past it.
    ///
    /// Operands are validated before anything is written, so an `Err` leaves
    /// registers, memory, stack and display as they were.
    pub fn execute(&self, m: &mut Machine) -> Result<Flow> {
        match *self {
            Sys(_) => {}
            ClearScreen => {
                m.fb.clear_buffer();
                return Ok(Flow::Redraw);
            }
            PopSubroutine => {
                let addr = m.stack.pop()?;
                m.regs.pc.set_addr(addr);
            }
            Jump(addr) => m.regs.pc.set_addr(addr),
            PushSubroutine(addr) => {
                m.stack.push(m.regs.pc.0)?; // already points at the next instruction
                m.regs.pc.set_addr(addr);
            }
            SkipEqualConstant(vx, nn) => {
                let skip = m.regs.get(vx) == nn;
                skip_if(m, skip);
            }
            SkipNotEqualConstant(vx, nn) => {
                let skip = m.regs.get(vx) != nn;
                skip_if(m, skip);
            }
            SkipEqualRegister(vx, vy) => {
                let skip = m.regs.get(vx) == m.regs.get(vy);
                skip_if(m, skip);
            }
            SkipNotEqualRegister(vx, vy) => {
                let skip = m.regs.get(vx) != m.regs.get(vy);
                skip_if(m, skip);
            }
            SetRegister(vx, nn) => m.regs.set_register(vx, nn),
            AddToRegister(vx, nn) => m.regs.add_to_register(vx, nn),
            CopyRegister(vx, vy) => m.regs.set_register(vx, m.regs.get(vy)),
            Or(vx, vy) => m.regs.set_register(vx, m.regs.get(vx) | m.regs.get(vy)),
            And(vx, vy) => m.regs.set_register(vx, m.regs.get(vx) & m.regs.get(vy)),
            XOr(vx, vy) => m.regs.set_register(vx, m.regs.get(vx) ^ m.regs.get(vy)),
            // flag is written last so it wins when vx is VF
            Add(vx, vy) => {
                let (z, carry) = m.regs.get(vx).overflowing_add(m.regs.get(vy));
                m.regs.set_register(vx, z);
                m.regs.set_flag(carry);
            }
            SubtractForward(vx, vy) => {
                let (x, y) = (m.regs.get(vx), m.regs.get(vy));
                m.regs.set_register(vx, x.wrapping_sub(y));
                m.regs.set_flag(x >= y); // no borrow
            }
            SubtractBackward(vx, vy) => {
                let (x, y) = (m.regs.get(vx), m.regs.get(vy));
                m.regs.set_register(vx, y.wrapping_sub(x));
                m.regs.set_flag(y >= x);
            }
            RightShift(vx) => {
                let vx_value = m.regs.get(vx);
                m.regs.set_register(vx, vx_value >> 1);
                m.regs.set_register(FLAG, vx_value & 1);
            }
            LeftShift(vx) => {
                let vx_value = m.regs.get(vx);
                m.regs.set_register(vx, vx_value << 1);
                m.regs.set_register(FLAG, (vx_value >> 7) & 1);
            }
            SetIndexRegister(addr) => m.regs.index.set_addr(addr),
            JumpWithOffset(addr) => {
                m.regs.pc.set_addr(addr + m.regs.get(0) as u16);
            }
            Random(vx, nn) => {
                let ransuu: u8 = m.rng.gen();
                m.regs.set_register(vx, nn & ransuu);
            }
            Display(reg_x, reg_y, height) => {
                let (x, y) = (m.regs.get(reg_x), m.regs.get(reg_y));
                let sprite = m.mem.slice(m.regs.index.0, height as usize)?;
                let vf = m.fb.paint(x, y, sprite);
                m.regs.set_flag(vf);
                return Ok(Flow::Redraw);
            }
            SkipIfPressed(vx) => {
                let down = m.keyboard.get_key_status_from_num(m.regs.get(vx));
                skip_if(m, down);
            }
            SkipIfNotPressed(vx) => {
                let down = m.keyboard.get_key_status_from_num(m.regs.get(vx));
                skip_if(m, !down);
            }
            CopyDelayToRegister(vx) => m.regs.set_register(vx, m.timers.delay),
            GetKey(vx) => return Ok(Flow::AwaitKey(vx)),
            CopyRegisterToDelay(vx) => m.timers.delay = m.regs.get(vx),
            CopyRegisterToSound(vx) => m.timers.sound = m.regs.get(vx),
            AddToIndex(vx) => {
                let index = m.regs.index.0.wrapping_add(m.regs.get(vx) as u16);
                m.regs.index.set_addr(index);
            }
            PointChar(vx) => m.regs.index.set_addr(glyph_addr(m.regs.get(vx))),
            ToDecimal(vx) => {
                let value = m.regs.get(vx);
                let digits = [value / 100, value / 10 % 10, value % 10];
                m.mem.write_block(m.regs.index.0, &digits)?;
            }
            StoreRegisterToMemory(vx) => {
                let count = vx as usize + 1;
                m.mem.write_block(m.regs.index.0, &m.regs.all()[..count])?;
            }
            LoadRegisterFromMemory(vx) => {
                let count = vx as usize + 1;
                let values = m.mem.slice(m.regs.index.0, count)?;
                for (reg, value) in values.iter().enumerate() {
                    m.regs.set_register(reg as u8, *value);
                }
            }
        }
        Ok(Flow::Next)
    }
}

fn skip_if(m: &mut Machine, condition: bool) {
    if condition {
        m.regs.pc.increment();
    }
}
