pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// 64x32 grid of 1-bit pixels. Only `paint` and `clear` may touch it,
/// and both leave a dirty mark for the presentation layer to consume.
pub struct FrameBuffer {
    pixels: [[bool; WIDTH]; HEIGHT],
    dirty: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: [[false; WIDTH]; HEIGHT],
            dirty: false,
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; WIDTH]; HEIGHT];
        self.dirty = true;
    }

    /// XORs the sprite rows onto the grid starting at (x, y). Every
    /// pixel wraps at the screen edge on its own, not just the origin.
    /// Returns true if any pixel flipped from set to unset.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut collided = false;
        for (r, row) in sprite.iter().enumerate() {
            let py = (y as usize + r) % HEIGHT;
            for c in 0..8 {
                if (row >> (7 - c)) & 1 == 0 {
                    continue;
                }
                let px = (x as usize + c) % WIDTH;
                if self.pixels[py][px] {
                    collided = true;
                }
                self.pixels[py][px] ^= true;
            }
        }
        self.dirty = true;
        collided
    }

    pub fn pixels(&self) -> &[[bool; WIDTH]; HEIGHT] {
        &self.pixels
    }

    pub fn take_dirty(&mut self) -> bool {
        let dirty = self.dirty;
        self.dirty = false;
        dirty
    }
}
