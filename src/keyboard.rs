use crate::error::{Chip8Error, Result};

pub const KEY_COUNT: usize = 16;

/// The 16-key hex keypad. Only external key events change it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn update_key(&mut self, key: u8, pressed: bool) -> Result<()> {
        let slot = self
            .keys
            .get_mut(key as usize)
            .ok_or(Chip8Error::InvalidKey { key })?;
        *slot = pressed;
        Ok(())
    }

    /// Key status for a register value; only the low nibble selects the key.
    pub fn get_key_status_from_num(&self, n: u8) -> bool {
        self.keys[(n & 0xF) as usize]
    }

    pub fn pressed(&self) -> impl Iterator<Item = u8> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter(|(_, down)| **down)
            .map(|(i, _)| i as u8)
    }
}
