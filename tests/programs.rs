use chip8_vm::{Chip8Error, Emulator, RunState};

fn rom(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn boot(words: &[u16]) -> Emulator {
    let mut emu = Emulator::with_seed(0);
    emu.load_game(&rom(words)).unwrap();
    emu
}

fn run(emu: &mut Emulator, ticks: usize) {
    for _ in 0..ticks {
        emu.tick().unwrap();
    }
}

#[test]
fn draws_a_font_glyph() {
    let mut emu = boot(&[
        0x600A, // LD V0, 0x0A
        0xF029, // LD F, V0
        0x6104, // LD V1, 4
        0x6202, // LD V2, 2
        0xD125, // DRW V1, V2, 5
        0x120A, // JP 0x20A
    ]);
    run(&mut emu, 5);
    assert!(emu.take_draw_flag());
    assert_eq!(emu.registers()[0xF], 0);

    // "A" is F0 90 F0 90 90
    let rows: Vec<String> = (2..7)
        .map(|y| {
            (4..8)
                .map(|x| if emu.pixel(x, y) { '#' } else { '.' })
                .collect()
        })
        .collect();
    assert_eq!(rows, ["####", "#..#", "####", "#..#", "#..#"]);
    assert_eq!(emu.display().lit_count(), 14);
}

#[test]
fn drawing_twice_erases_and_reports_collision() {
    let mut emu = boot(&[
        0xF029, // LD F, V0
        0xD005, // DRW V0, V0, 5
        0xD005, // DRW V0, V0, 5
    ]);
    run(&mut emu, 2);
    assert_eq!(emu.registers()[0xF], 0);
    run(&mut emu, 1);
    assert_eq!(emu.registers()[0xF], 1);
    assert_eq!(emu.display().lit_count(), 0);
}

#[test]
fn bcd_then_register_load() {
    let mut emu = boot(&[
        0x609D, // LD V0, 157
        0xA300, // LD I, 0x300
        0xF033, // LD B, V0
        0xF265, // LD V2, [I]
    ]);
    run(&mut emu, 4);
    assert_eq!(&emu.registers()[..3], &[1, 5, 7]);
    assert_eq!(emu.index(), 0x300);
}

#[test]
fn subroutine_counter() {
    let mut emu = boot(&[
        0x6000, // 200: LD V0, 0
        0x220A, // 202: CALL 0x20A
        0x3005, // 204: SE V0, 5
        0x1202, // 206: JP 0x202
        0x1208, // 208: JP 0x208
        0x7001, // 20A: ADD V0, 1
        0x00EE, // 20C: RET
    ]);
    run(&mut emu, 40);
    assert_eq!(emu.registers()[0], 5);
    assert_eq!(emu.pc(), 0x208);
    assert_eq!(emu.stack_depth(), 0);
}

#[test]
fn delay_timer_busy_wait() {
    let mut emu = boot(&[
        0x6003, // 200: LD V0, 3
        0xF015, // 202: LD DT, V0
        0xF107, // 204: LD V1, DT
        0x3100, // 206: SE V1, 0
        0x1204, // 208: JP 0x204
        0x62FF, // 20A: LD V2, 0xFF
        0x120C, // 20C: JP 0x20C
    ]);
    run(&mut emu, 100);
    assert_eq!(emu.registers()[2], 0);
    assert_eq!(emu.delay_timer(), 3);

    for _ in 0..3 {
        emu.tick_timers();
    }
    run(&mut emu, 10);
    assert_eq!(emu.registers()[2], 0xFF);
}

#[test]
fn waits_for_a_key_then_tests_it() {
    let mut emu = boot(&[
        0xF30A, // 200: LD V3, K
        0xE39E, // 202: SKP V3
        0x6401, // 204: LD V4, 1
        0x6502, // 206: LD V5, 2
    ]);
    emu.tick().unwrap();
    assert_eq!(emu.state(), RunState::AwaitingKey { register: 3 });
    run(&mut emu, 5);
    assert_eq!(emu.pc(), 0x202);

    emu.set_key(0x7, true).unwrap();
    assert_eq!(emu.state(), RunState::Running);
    run(&mut emu, 2);
    assert_eq!(emu.registers()[3], 0x7);
    // key still held, so LD V4 was skipped
    assert_eq!(emu.registers()[4], 0);
    assert_eq!(emu.registers()[5], 2);
}

#[test]
fn runaway_program_halts_until_reset() {
    let mut emu = boot(&[
        0x00EE, // RET with nothing on the stack
    ]);
    assert_eq!(emu.tick(), Err(Chip8Error::StackUnderflow));
    assert_eq!(emu.state(), RunState::Halted);
    assert_eq!(emu.tick(), Err(Chip8Error::Halted));

    emu.reset();
    emu.load_game(&rom(&[0x6042])).unwrap();
    emu.tick().unwrap();
    assert_eq!(emu.registers()[0], 0x42);
}

#[test]
fn writing_into_interpreter_area_fails() {
    let mut emu = boot(&[
        0xA100, // LD I, 0x100
        0xF055, // LD [I], V0
    ]);
    emu.tick().unwrap();
    assert_eq!(emu.tick(), Err(Chip8Error::IllegalAccess { address: 0x100 }));
    assert_eq!(emu.pc(), 0x202);
}
