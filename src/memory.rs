use log::warn;

pub type TypeAddr = u16; // in reality u12

pub const MEM_SIZE: usize = 4096;
pub const ROM_START: TypeAddr = 0x200;
// each glyph is 5 bytes tall, 16 glyphs from address 0x000
pub const GLYPH_BYTES: TypeAddr = 5;

type FontBytes = [u8; 5 * 16];

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// 4k of addressable bytes. The font table sits at 0x000..0x050,
/// program code from 0x200. Accessors return None past the last byte
/// so the engine can attach fault context.
pub struct Memory {
    bytes: [u8; MEM_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEM_SIZE];
        bytes[..DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
        Self { bytes }
    }

    pub fn get(&self, addr: TypeAddr) -> Option<u8> {
        self.bytes.get(addr as usize).copied()
    }

    // big-endian instruction word at addr, addr + 1
    pub fn get_word(&self, addr: TypeAddr) -> Option<u16> {
        let hi = self.get(addr)?;
        let lo = self.get(addr.checked_add(1)?)?;
        Some(u16::from_be_bytes([hi, lo]))
    }

    pub fn get_slice(&self, addr: TypeAddr, len: usize) -> Option<&[u8]> {
        let start = addr as usize;
        self.bytes.get(start..start.checked_add(len)?)
    }

    // whole span is checked before anything is written
    pub fn set_slice(&mut self, addr: TypeAddr, data: &[u8]) -> Option<()> {
        let start = addr as usize;
        let dst = self.bytes.get_mut(start..start.checked_add(data.len())?)?;
        dst.copy_from_slice(data);
        Some(())
    }

    /// Copies program bytes in verbatim at 0x200, truncating whatever
    /// does not fit. Returns the number of bytes actually loaded.
    pub fn load_rom(&mut self, rom: &[u8]) -> usize {
        let start = ROM_START as usize;
        let len = rom.len().min(MEM_SIZE - start);
        if len < rom.len() {
            warn!("rom is {} bytes, only {} fit in memory", rom.len(), len);
        }
        self.bytes[start..start + len].copy_from_slice(&rom[..len]);
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_sits_at_address_zero() {
        let mem = Memory::new();
        // glyph 0 starts the table, glyph F ends it at 0x4F
        assert_eq!(mem.get(0x000), Some(0xF0));
        assert_eq!(mem.get(0x004), Some(0xF0));
        assert_eq!(mem.get(0x04F), Some(0x80));
        assert_eq!(mem.get(0x050), Some(0x00));
    }

    #[test]
    fn rom_loads_at_0x200() {
        let mut mem = Memory::new();
        let loaded = mem.load_rom(&[0x60, 0x0A]);
        assert_eq!(loaded, 2);
        assert_eq!(mem.get(0x200), Some(0x60));
        assert_eq!(mem.get(0x201), Some(0x0A));
        assert_eq!(mem.get(0x202), Some(0x00));
    }

    #[test]
    fn oversized_rom_is_truncated() {
        let mut mem = Memory::new();
        let rom = vec![0xAB; 5000];
        let loaded = mem.load_rom(&rom);
        assert_eq!(loaded, MEM_SIZE - ROM_START as usize);
        assert_eq!(mem.get(0xFFF), Some(0xAB));
    }

    #[test]
    fn access_past_end_is_none() {
        let mem = Memory::new();
        assert_eq!(mem.get(0xFFF), Some(0x00));
        assert_eq!(mem.get(0x1000), None);
        assert_eq!(mem.get_word(0xFFE), Some(0x0000));
        assert_eq!(mem.get_word(0xFFF), None);
    }

    #[test]
    fn word_is_big_endian() {
        let mut mem = Memory::new();
        mem.load_rom(&[0x12, 0x34]);
        assert_eq!(mem.get_word(0x200), Some(0x1234));
    }

    #[test]
    fn slice_access_is_all_or_nothing() {
        let mut mem = Memory::new();
        assert_eq!(mem.set_slice(0xFFD, &[1, 2, 3]), Some(()));
        assert_eq!(mem.set_slice(0xFFE, &[1, 2, 3]), None);
        // the failed write must not have touched the bytes that fit
        assert_eq!(mem.get_slice(0xFFD, 3), Some(&[1, 2, 3][..]));
        assert_eq!(mem.get_slice(0xFFE, 3), None);
    }
}
