use std::fmt::{self, Write};

use crate::decode::OpCodes;
use crate::memory::ROM_START;

// conventional assembler mnemonics, display only
impl fmt::Display for OpCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpCodes::ClearScreen => write!(f, "CLS"),
            OpCodes::Jump(nnn) => write!(f, "JP {nnn:#05X}"),
            OpCodes::PushSubroutine(nnn) => write!(f, "CALL {nnn:#05X}"),
            OpCodes::PopSubroutine => write!(f, "RET"),
            OpCodes::SkipEqualConstant(x, kk) => write!(f, "SE V{x:X}, {kk:#04X}"),
            OpCodes::SkipNotEqualConstant(x, kk) => write!(f, "SNE V{x:X}, {kk:#04X}"),
            OpCodes::SkipEqualRegister(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            OpCodes::SkipNotEqualRegister(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            OpCodes::SetRegister(x, kk) => write!(f, "LD V{x:X}, {kk:#04X}"),
            OpCodes::AddToRegister(x, kk) => write!(f, "ADD V{x:X}, {kk:#04X}"),
            OpCodes::CopyRegister(x, y) => write!(f, "LD V{x:X}, V{y:X}"),
            OpCodes::Or(x, y) => write!(f, "OR V{x:X}, V{y:X}"),
            OpCodes::And(x, y) => write!(f, "AND V{x:X}, V{y:X}"),
            OpCodes::XOr(x, y) => write!(f, "XOR V{x:X}, V{y:X}"),
            OpCodes::Add(x, y) => write!(f, "ADD V{x:X}, V{y:X}"),
            OpCodes::SubtractForward(x, y) => write!(f, "SUB V{x:X}, V{y:X}"),
            OpCodes::SubtractBackward(x, y) => write!(f, "SUBN V{x:X}, V{y:X}"),
            OpCodes::RightShift(x) => write!(f, "SHR V{x:X}"),
            OpCodes::LeftShift(x) => write!(f, "SHL V{x:X}"),
            OpCodes::SetIndexRegister(nnn) => write!(f, "LD I, {nnn:#05X}"),
            OpCodes::JumpWithOffset(nnn) => write!(f, "JP V0, {nnn:#05X}"),
            OpCodes::Random(x, kk) => write!(f, "RND V{x:X}, {kk:#04X}"),
            OpCodes::Display(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n:#X}"),
            OpCodes::SkipIfPressed(x) => write!(f, "SKP V{x:X}"),
            OpCodes::SkipIfNotPressed(x) => write!(f, "SKNP V{x:X}"),
            OpCodes::CopyDelayToRegister(x) => write!(f, "LD V{x:X}, DT"),
            OpCodes::CopyRegisterToDelay(x) => write!(f, "LD DT, V{x:X}"),
            OpCodes::CopyRegisterToSound(x) => write!(f, "LD ST, V{x:X}"),
            OpCodes::GetKey(x) => write!(f, "LD V{x:X}, K"),
            OpCodes::AddToIndex(x) => write!(f, "ADD I, V{x:X}"),
            OpCodes::PointChar(x) => write!(f, "LD F, V{x:X}"),
            OpCodes::ToDecimal(x) => write!(f, "LD B, V{x:X}"),
            OpCodes::StoreRegisterToMemory(x) => write!(f, "LD [I], V{x:X}"),
            OpCodes::LoadRegisterFromMemory(x) => write!(f, "LD V{x:X}, [I]"),
        }
    }
}

/// Address, word and mnemonic listing of a rom image as it would sit
/// in memory from 0x200. Words outside the instruction set print as
/// raw data, which is common in roms that mix sprites with code.
pub fn dump(rom: &[u8]) -> String {
    let mut out = String::new();
    for (i, chunk) in rom.chunks(2).enumerate() {
        let addr = ROM_START as usize + i * 2;
        let word = if chunk.len() == 2 {
            u16::from_be_bytes([chunk[0], chunk[1]])
        } else {
            // odd rom length, pad the tail
            (chunk[0] as u16) << 8
        };
        let _ = match OpCodes::decode_raw(word) {
            Some(op) => writeln!(out, "{addr:#05X}: {word:04X}  {op}"),
            None => writeln!(out, "{addr:#05X}: {word:04X}  .word {word:#06X}"),
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(word: u16) -> String {
        OpCodes::decode_raw(word).unwrap().to_string()
    }

    #[test]
    fn renders_the_conventional_mnemonics() {
        assert_eq!(render(0x00E0), "CLS");
        assert_eq!(render(0x1ABC), "JP 0xABC");
        assert_eq!(render(0x6A02), "LD VA, 0x02");
        assert_eq!(render(0x8125), "SUB V1, V2");
        assert_eq!(render(0x8126), "SHR V1");
        assert_eq!(render(0xD125), "DRW V1, V2, 0x5");
        assert_eq!(render(0xF829), "LD F, V8");
        assert_eq!(render(0xF655), "LD [I], V6");
        assert_eq!(render(0xE2A1), "SKNP V2");
    }

    #[test]
    fn dump_lists_addresses_from_0x200() {
        let listing = dump(&[0x60, 0x0A, 0x50, 0x01]);
        let mut lines = listing.lines();
        assert_eq!(lines.next(), Some("0x200: 600A  LD V0, 0x0A"));
        assert_eq!(lines.next(), Some("0x202: 5001  .word 0x5001"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn dump_pads_an_odd_tail_byte() {
        let listing = dump(&[0x00, 0xE0, 0x80]);
        assert!(listing.contains("0x202: 8000"));
    }
}
