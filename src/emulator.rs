use rand::{rngs::StdRng, SeedableRng};

use crate::{
    decode::Instruction,
    display::FrameBuffer,
    error::{Chip8Error, Result},
    execute::Flow,
    keyboard::Keyboard,
    memory::{Memory, Stack, TypeAddr},
    registers::{Registers, REG_COUNT},
    timer::Timers,
};

/// Instructions per second a frontend should aim for.
pub const DEFAULT_CPU_HZ: u32 = 500;

/// Every piece of state an instruction can touch.
#[derive(Debug, Clone)]
pub struct Machine {
    pub mem: Memory,
    pub regs: Registers,
    pub stack: Stack,
    pub fb: FrameBuffer,
    pub timers: Timers,
    pub keyboard: Keyboard,
    pub rng: StdRng,
}

impl Machine {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            mem: Memory::new(),
            regs: Registers::new(),
            stack: Stack::new(),
            fb: FrameBuffer::new(),
            timers: Timers::new(),
            keyboard: Keyboard::new(),
            rng,
        }
    }

    /// Restores every component in place. The RNG stream is left alone.
    pub fn reset(&mut self) {
        self.mem.reset();
        self.regs.reset();
        self.stack.reset();
        self.fb.clear_buffer();
        self.timers.reset();
        self.keyboard.reset();
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

// rng position is not observable machine state
impl PartialEq for Machine {
    fn eq(&self, other: &Self) -> bool {
        self.mem == other.mem
            && self.regs == other.regs
            && self.stack == other.stack
            && self.fb == other.fb
            && self.timers == other.timers
            && self.keyboard == other.keyboard
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No program loaded since construction or the last reset.
    Idle,
    Running,
    /// Suspended by `LD Vx, K` until a key press lands in `register`.
    AwaitingKey { register: u8 },
    /// A cycle failed; only `reset` leaves this state.
    Halted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Emulator {
    machine: Machine,
    state: RunState,
    draw_flag: bool,
}

impl Emulator {
    pub fn new() -> Self {
        Self::from_machine(Machine::new())
    }

    /// Emulator whose `RND` sequence is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_machine(Machine::with_seed(seed))
    }

    fn from_machine(machine: Machine) -> Self {
        Self {
            machine,
            state: RunState::Idle,
            draw_flag: false,
        }
    }

    /// Copies a ROM image into RAM at 0x200. Nothing is written if it doesn't fit.
    pub fn load_game(&mut self, rom: &[u8]) -> Result<()> {
        self.machine.mem.load_rom(rom)?;
        log::debug!("loaded {} byte ROM", rom.len());
        if self.state == RunState::Idle {
            self.state = RunState::Running;
        }
        Ok(())
    }

    /// Decodes the instruction at PC without executing it.
    pub fn fetch_decode(&self) -> Result<Instruction> {
        let opcode = self.machine.mem.get_word(self.machine.regs.pc.0)?;
        Instruction::decode(opcode)
    }

    /// One fetch-decode-execute cycle. A no-op while idle or waiting for a key.
    pub fn tick(&mut self) -> Result<()> {
        match self.state {
            RunState::Idle | RunState::AwaitingKey { .. } => return Ok(()),
            RunState::Halted => return Err(Chip8Error::Halted),
            RunState::Running => {}
        }
        self.cycle().map_err(|err| {
            log::error!("halting at pc {:#05X}: {}", self.machine.regs.pc.0, err);
            self.state = RunState::Halted;
            err
        })
    }

    fn cycle(&mut self) -> Result<()> {
        let pc = self.machine.regs.pc;
        let opcode = self.machine.mem.get_word(pc.0)?;
        let operation = Instruction::decode(opcode)?;
        log::trace!("pc: {:#05X}, opcode: {:#06X}, {}", pc.0, opcode, operation);

        self.machine.regs.pc.increment();
        match operation.execute(&mut self.machine) {
            Ok(Flow::Next) => {}
            Ok(Flow::Redraw) => self.draw_flag = true,
            Ok(Flow::AwaitKey(register)) => {
                log::debug!("waiting for key press into V{:X}", register);
                self.state = RunState::AwaitingKey { register };
            }
            Err(err) => {
                self.machine.regs.pc = pc;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Counts both timers down by one. Call at 60 Hz, independently of `tick`.
    pub fn tick_timers(&mut self) {
        self.machine.timers.tick();
    }

    /// Records a key event. A press resumes a pending `LD Vx, K`.
    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<()> {
        if let Err(err) = self.machine.keyboard.update_key(key, pressed) {
            log::warn!("ignoring key event: {}", err);
            return Err(err);
        }
        if let (true, RunState::AwaitingKey { register }) = (pressed, self.state) {
            self.machine.regs.set_register(register, key);
            self.state = RunState::Running;
            log::debug!("key {:X} pressed, resuming", key);
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.machine.reset();
        self.state = RunState::Idle;
        self.draw_flag = false;
        log::debug!("machine reset");
    }

    pub fn draw_flag(&self) -> bool {
        self.draw_flag
    }

    /// Returns the redraw request and clears it.
    pub fn take_draw_flag(&mut self) -> bool {
        std::mem::take(&mut self.draw_flag)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn display(&self) -> &FrameBuffer {
        &self.machine.fb
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.machine.fb.get(x, y)
    }

    pub fn registers(&self) -> &[u8; REG_COUNT] {
        self.machine.regs.all()
    }

    pub fn index(&self) -> TypeAddr {
        self.machine.regs.index.0
    }

    pub fn pc(&self) -> TypeAddr {
        self.machine.regs.pc.0
    }

    pub fn stack_depth(&self) -> usize {
        self.machine.stack.depth()
    }

    pub fn delay_timer(&self) -> u8 {
        self.machine.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.machine.timers.sound
    }

    pub fn sound_active(&self) -> bool {
        self.machine.timers.sound_active()
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::RAM_CAPACITY;

    fn running(rom: &[u8]) -> Emulator {
        let mut emu = Emulator::with_seed(7);
        emu.load_game(rom).unwrap();
        emu
    }

    #[test]
    fn fresh_emulator() {
        let emu = Emulator::new();
        assert_eq!(emu.state(), RunState::Idle);
        assert_eq!(emu.pc(), 0x200);
        assert_eq!(emu.index(), 0);
        assert_eq!(emu.registers(), &[0; 16]);
        assert_eq!(emu.stack_depth(), 0);
        assert!(!emu.draw_flag());
    }

    #[test]
    fn tick_is_noop_while_idle() {
        let mut emu = Emulator::new();
        emu.tick().unwrap();
        assert_eq!(emu.pc(), 0x200);
    }

    #[test]
    fn fetch_is_big_endian_and_pc_advances() {
        let mut emu = running(&[0x62, 0xC5, 0x74, 0xC3]);
        assert_eq!(emu.fetch_decode(), Ok(Instruction::SetRegister(2, 0xC5)));
        emu.tick().unwrap();
        assert_eq!(emu.registers()[2], 0xC5);
        assert_eq!(emu.pc(), 0x202);
        emu.tick().unwrap();
        assert_eq!(emu.registers()[4], 0xC3);
        assert_eq!(emu.pc(), 0x204);
    }

    #[test]
    fn jump_lands_exactly() {
        let mut emu = running(&[0x1A, 0x5F]);
        emu.tick().unwrap();
        assert_eq!(emu.pc(), 0xA5F);
    }

    #[test]
    fn call_pushes_return_address() {
        // 0x200: CALL 0x206, 0x206: RET
        let mut emu = running(&[0x22, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0xEE]);
        emu.tick().unwrap();
        assert_eq!(emu.pc(), 0x206);
        assert_eq!(emu.stack_depth(), 1);
        emu.tick().unwrap();
        assert_eq!(emu.pc(), 0x202);
        assert_eq!(emu.stack_depth(), 0);
    }

    #[test]
    fn draw_flag_only_for_cls_and_drw() {
        let mut emu = running(&[0x60, 0x01, 0x00, 0xE0, 0xD0, 0x05]);
        emu.tick().unwrap();
        assert!(!emu.draw_flag());
        emu.tick().unwrap();
        assert!(emu.take_draw_flag());
        assert!(!emu.draw_flag());
        emu.tick().unwrap();
        assert!(emu.draw_flag());
        // the engine never clears it on its own
        assert!(emu.take_draw_flag());
        assert!(!emu.take_draw_flag());
    }

    #[test]
    fn key_wait_suspends_until_press() {
        // LD V5, K ; LD V6, 0x01
        let mut emu = running(&[0xF5, 0x0A, 0x66, 0x01]);
        emu.tick().unwrap();
        assert_eq!(emu.state(), RunState::AwaitingKey { register: 5 });
        assert_eq!(emu.pc(), 0x202);

        for _ in 0..10 {
            emu.tick().unwrap();
        }
        assert_eq!(emu.pc(), 0x202);
        assert_eq!(emu.registers()[6], 0);

        // releases don't resume
        emu.set_key(0xB, false).unwrap();
        assert_eq!(emu.state(), RunState::AwaitingKey { register: 5 });

        emu.set_key(0xB, true).unwrap();
        assert_eq!(emu.state(), RunState::Running);
        assert_eq!(emu.registers()[5], 0xB);
        emu.tick().unwrap();
        assert_eq!(emu.registers()[6], 1);
    }

    #[test]
    fn timers_only_move_with_their_own_clock() {
        // LD V0, 0x05 ; LD DT, V0 ; LD ST, V0 ; JP 0x206
        let mut emu = running(&[0x60, 0x05, 0xF0, 0x15, 0xF0, 0x18, 0x12, 0x06]);
        for _ in 0..20 {
            emu.tick().unwrap();
        }
        assert_eq!(emu.delay_timer(), 5);
        assert_eq!(emu.sound_timer(), 5);
        assert!(emu.sound_active());
        for _ in 0..3 {
            emu.tick_timers();
        }
        assert_eq!(emu.delay_timer(), 2);
        for _ in 0..10 {
            emu.tick_timers();
        }
        assert_eq!(emu.delay_timer(), 0);
        assert!(!emu.sound_active());
    }

    #[test]
    fn invalid_opcode_halts_without_mutation() {
        let mut emu = running(&[0x60, 0x11, 0xFF, 0xFF]);
        emu.tick().unwrap();
        let before = emu.machine().clone();
        assert_eq!(emu.tick(), Err(Chip8Error::InvalidOpcode { opcode: 0xFFFF }));
        assert_eq!(emu.state(), RunState::Halted);
        assert_eq!(emu.pc(), 0x202);
        assert!(*emu.machine() == before);
        assert_eq!(emu.tick(), Err(Chip8Error::Halted));

        emu.reset();
        assert_eq!(emu.state(), RunState::Idle);
        emu.tick().unwrap();
    }

    #[test]
    fn failed_execute_restores_pc() {
        // RET with an empty stack
        let mut emu = running(&[0x00, 0xEE]);
        assert_eq!(emu.tick(), Err(Chip8Error::StackUnderflow));
        assert_eq!(emu.pc(), 0x200);
    }

    #[test]
    fn fetch_past_end_of_memory() {
        let mut emu = running(&[0x1F, 0xFF]);
        emu.tick().unwrap();
        assert_eq!(emu.tick(), Err(Chip8Error::IllegalAccess { address: 0x1000 }));
        assert_eq!(emu.pc(), 0xFFF);
    }

    #[test]
    fn oversized_rom_leaves_memory_untouched() {
        let mut emu = Emulator::with_seed(1);
        let fresh = emu.clone();
        assert_eq!(
            emu.load_game(&vec![0x12; RAM_CAPACITY + 1]),
            Err(Chip8Error::InvalidRom {
                size: RAM_CAPACITY + 1,
                max_size: RAM_CAPACITY
            })
        );
        assert_eq!(emu, fresh);
        assert_eq!(emu.state(), RunState::Idle);
    }

    #[test]
    fn reset_is_idempotent_and_matches_fresh() {
        let mut emu = running(&[0x60, 0xFF, 0xA3, 0x00, 0xD0, 0x05, 0x22, 0x00]);
        emu.set_key(3, true).unwrap();
        for _ in 0..4 {
            emu.tick().unwrap();
        }
        emu.reset();
        let once = emu.clone();
        emu.reset();
        assert_eq!(emu, once);
        assert_eq!(emu, Emulator::with_seed(99));
    }

    #[test]
    fn bad_key_index() {
        let mut emu = Emulator::new();
        assert_eq!(emu.set_key(0x10, true), Err(Chip8Error::InvalidKey { key: 0x10 }));
    }
}
