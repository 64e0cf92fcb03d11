pub const NUM_KEYS: usize = 16;

/// Latch for the 16-key hex pad. The frontend writes key transitions
/// in, the engine only ever reads.
pub struct Keyboard {
    keys: [bool; NUM_KEYS],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [false; NUM_KEYS],
        }
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.keys[(key & 0xF) as usize] = pressed;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    pub fn snapshot(&self) -> [bool; NUM_KEYS] {
        self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_press_and_release() {
        let mut keys = Keyboard::new();
        assert!(!keys.is_pressed(0xA));
        keys.set_key(0xA, true);
        assert!(keys.is_pressed(0xA));
        keys.set_key(0xA, false);
        assert!(!keys.is_pressed(0xA));
    }

    #[test]
    fn key_codes_are_masked_to_a_nibble() {
        let mut keys = Keyboard::new();
        keys.set_key(0x13, true);
        assert!(keys.is_pressed(0x3));
    }
}
