use std::{fs, path::PathBuf};

use anyhow::Context;
use chip8_vm::{Emulator, DEFAULT_CPU_HZ, TIMER_HZ};
use clap::Parser;
use clock::Clock;
use frontend::Frontend;

mod clock;
mod frontend;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 virtual machine", long_about = None)]
struct Args {
    #[arg(help = "Path to the ROM file to run")]
    rom: PathBuf,

    #[arg(long, default_value_t = DEFAULT_CPU_HZ, help = "Instructions per second")]
    cpu_hz: u32,

    #[arg(long, default_value = "16", value_parser = frontend::parse_scale, help = "Window scale (1, 2, 4, 8, 16 or 32)")]
    scale: minifb::Scale,

    #[arg(long, help = "Seed for the RND instruction")]
    seed: Option<u64>,
}

// Separately:
// CPU: --cpu-hz times per second
// Timer: 60 times per second
// Display: whenever the draw flag is up, presented at most 60 times per second
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let rom = fs::read(&args.rom)
        .with_context(|| format!("reading ROM {}", args.rom.display()))?;
    let mut emu = match args.seed {
        Some(seed) => Emulator::with_seed(seed),
        None => Emulator::new(),
    };
    emu.load_game(&rom)?;
    log::info!(
        "running {} ({} bytes) at {} Hz",
        args.rom.display(),
        rom.len(),
        args.cpu_hz
    );

    let name = args
        .rom
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut frontend = Frontend::new(&format!("{name} - ESC to exit"), args.scale)?;
    let mut cpu_clock = Clock::new(args.cpu_hz);
    let mut timer_clock = Clock::new(TIMER_HZ);

    while frontend.is_running() {
        for (key, pressed) in frontend.key_events() {
            emu.set_key(key, pressed)?;
        }
        for _ in 0..cpu_clock.due() {
            emu.tick()?;
        }
        for _ in 0..timer_clock.due() {
            emu.tick_timers();
        }
        if emu.take_draw_flag() {
            frontend.render(emu.display());
        }
        frontend.sync()?;
    }
    Ok(())
}
