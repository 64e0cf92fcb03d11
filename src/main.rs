use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use minifb::{Key, Scale, Window, WindowOptions};

use display::{HEIGHT, WIDTH};
use emulator::{Emulator, Step};
use sound::Sound;
use timer::{Cadence, TIMER_HZ};

mod decode;
mod disasm;
mod display;
mod emulator;
mod errors;
mod keyboard;
mod memory;
mod registers;
mod sound;
mod timer;

// Two independent schedules, both driven by wall time: instructions at
// --ips (700 by default), timer decay at a fixed 60 Hz.

const PIXEL_ON: u32 = 0x007FFF;
const PIXEL_OFF: u32 = 0x000000;

// hex pad on the left half of a qwerty layout
const KEYMAP: [(Key, u8); 16] = [
    (Key::Key1, 0x1),
    (Key::Key2, 0x2),
    (Key::Key3, 0x3),
    (Key::Key4, 0xC),
    (Key::Q, 0x4),
    (Key::W, 0x5),
    (Key::E, 0x6),
    (Key::R, 0xD),
    (Key::A, 0x7),
    (Key::S, 0x8),
    (Key::D, 0x9),
    (Key::F, 0xE),
    (Key::Z, 0xA),
    (Key::X, 0x0),
    (Key::C, 0xB),
    (Key::V, 0xF),
];

#[derive(Parser)]
#[command(version, about = "CHIP-8 virtual machine")]
struct Args {
    /// Rom image, loaded at 0x200
    rom: PathBuf,

    /// Instruction steps per second
    #[arg(long, default_value_t = 700)]
    ips: u32,

    /// Seed for the CXNN random source
    #[arg(long)]
    seed: Option<u64>,

    /// Print a disassembly listing and exit
    #[arg(long)]
    disassemble: bool,

    /// Run without audio
    #[arg(long)]
    mute: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = fs::read(&args.rom)
        .with_context(|| format!("reading rom {}", args.rom.display()))?;

    if args.disassemble {
        print!("{}", disasm::dump(&rom));
        return Ok(());
    }

    let mut emu = match args.seed {
        Some(seed) => Emulator::with_seed(seed),
        None => Emulator::new(),
    };
    let loaded = emu.load_rom(&rom);
    info!(
        "loaded {loaded} bytes from {}, running at {} steps/sec",
        args.rom.display(),
        args.ips
    );

    let mut window = Window::new(
        "chipvm - ESC to exit",
        WIDTH,
        HEIGHT,
        WindowOptions {
            scale: Scale::X16,
            ..WindowOptions::default()
        },
    )?;
    // Limit to max ~60 fps update rate
    window.limit_update_rate(Some(Duration::from_micros(16600)));

    let mut beeper = (!args.mute).then(Sound::new);
    let mut pixel_buffer = vec![PIXEL_OFF; WIDTH * HEIGHT];

    let start = Instant::now();
    let mut instruction_clock = Cadence::new(args.ips.max(1), start);
    let mut timer_clock = Cadence::new(TIMER_HZ, start);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        pump_keys(&window, &mut emu);

        let now = Instant::now();
        for _ in 0..instruction_clock.due(now) {
            match emu.step() {
                Ok(Step::Ran) => {}
                // parked on FX0A, nothing more runs until a key
                // arrives, so hand the rest of this batch back
                Ok(Step::AwaitingKey) => break,
                Err(fault) => {
                    error!("machine halted: {fault}");
                    return Err(fault.into());
                }
            }
        }
        for _ in 0..timer_clock.due(now) {
            emu.timers.tick();
        }

        if let Some(beeper) = &mut beeper {
            beeper.set_active(emu.timers.sound_active());
        }

        if emu.fb.take_dirty() {
            render(&emu, &mut pixel_buffer);
        }
        window.update_with_buffer(&pixel_buffer, WIDTH, HEIGHT)?;
    }
    Ok(())
}

fn pump_keys(window: &Window, emu: &mut Emulator) {
    for (key, code) in KEYMAP {
        emu.keys.set_key(code, window.is_key_down(key));
    }
}

fn render(emu: &Emulator, pixel_buffer: &mut [u32]) {
    for (y, row) in emu.fb.pixels().iter().enumerate() {
        for (x, on) in row.iter().enumerate() {
            pixel_buffer[y * WIDTH + x] = if *on { PIXEL_ON } else { PIXEL_OFF };
        }
    }
}
