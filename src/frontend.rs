use anyhow::Context;
use chip8_vm::{
    display::{FrameBuffer, HEIGHT, WIDTH},
    keyboard::KEY_COUNT,
};
use minifb::{Key, Scale, Window, WindowOptions};

// QWERTY block on the left of the keyboard, laid out like the hex keypad:
// 1 2 3 C      1 2 3 4
// 4 5 6 D      Q W E R
// 7 8 9 E      A S D F
// A 0 B F      Z X C V
const KEYMAP: [(Key, u8); KEY_COUNT] = [
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

const PIXEL_ON: u32 = from_u8_rgb(0, 127, 255);
const PIXEL_OFF: u32 = from_u8_rgb(0, 0, 0);

const fn from_u8_rgb(r: u8, g: u8, b: u8) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

pub fn parse_scale(s: &str) -> Result<Scale, String> {
    match s {
        "1" => Ok(Scale::X1),
        "2" => Ok(Scale::X2),
        "4" => Ok(Scale::X4),
        "8" => Ok(Scale::X8),
        "16" => Ok(Scale::X16),
        "32" => Ok(Scale::X32),
        _ => Err(format!("unsupported scale {s}, expected 1, 2, 4, 8, 16 or 32")),
    }
}

pub struct Frontend {
    window: Window,
    pixel_buffer: Vec<u32>,
    held: [bool; KEY_COUNT],
}

impl Frontend {
    pub fn new(title: &str, scale: Scale) -> anyhow::Result<Self> {
        let mut window = Window::new(
            title,
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )
        .context("opening window")?;
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self {
            window,
            pixel_buffer: vec![PIXEL_OFF; WIDTH * HEIGHT],
            held: [false; KEY_COUNT],
        })
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Keypad indices whose state changed since the last call, with the new state.
    pub fn key_events(&mut self) -> Vec<(u8, bool)> {
        let mut events = vec![];
        for (key, index) in KEYMAP {
            let down = self.window.is_key_down(key);
            let held = &mut self.held[index as usize];
            if *held != down {
                *held = down;
                events.push((index, down));
            }
        }
        events
    }

    pub fn render(&mut self, fb: &FrameBuffer) {
        for (pixel, lit) in self.pixel_buffer.iter_mut().zip(fb.pixels()) {
            *pixel = if *lit { PIXEL_ON } else { PIXEL_OFF };
        }
    }

    pub fn sync(&mut self) -> anyhow::Result<()> {
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
            .context("presenting frame")
    }
}
