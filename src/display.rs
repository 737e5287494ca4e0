pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Monochrome 64x32 framebuffer. Coordinates wrap around both edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bit_buffer: Vec<bool>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: vec![false; WIDTH * HEIGHT],
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer.fill(false);
    }

    fn index(x: usize, y: usize) -> usize {
        (y % HEIGHT) * WIDTH + (x % WIDTH)
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[Self::index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, state: bool) {
        self.bit_buffer[Self::index(x, y)] = state;
    }

    /// XORs `sprite` rows (MSB leftmost) onto the screen at (`x`, `y`).
    /// Returns true if any lit pixel was switched off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            for j in 0..8 {
                let bit = (row >> (7 - j)) & 1 == 1;
                if !bit {
                    continue;
                }
                let index = Self::index(x as usize + j, y as usize + i);
                let previous = self.bit_buffer[index];
                self.bit_buffer[index] = !previous;
                if previous {
                    vf = true;
                }
            }
        }
        vf
    }

    /// Row-major pixel states, `WIDTH * HEIGHT` long.
    pub fn pixels(&self) -> &[bool] {
        &self.bit_buffer
    }

    pub fn lit_count(&self) -> usize {
        self.bit_buffer.iter().filter(|p| **p).count()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
