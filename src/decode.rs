use crate::memory::TypeAddr;

/// A fetched 2-byte word. Operand fields sit at fixed nibble positions
/// and go by their conventional names: x, y, n, kk, nnn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction(u16);

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn code(self) -> u16 {
        self.0
    }

    fn family(self) -> u8 {
        (self.0 >> 12) as u8
    }

    fn x(self) -> u8 {
        ((self.0 >> 8) & 0xF) as u8
    }

    fn y(self) -> u8 {
        ((self.0 >> 4) & 0xF) as u8
    }

    fn n(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    fn kk(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    fn nnn(self) -> TypeAddr {
        self.0 & 0xFFF
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 00E0
    // turn all pixels off
    ClearScreen,
    // 1NNN
    // set PC to NNN
    Jump(TypeAddr),
    // 2NNN / 00EE
    PushSubroutine(TypeAddr),
    PopSubroutine,

    // 3XNN / 4XNN / 5XY0 / 9XY0
    SkipEqualConstant(u8, u8),
    SkipNotEqualConstant(u8, u8),
    SkipEqualRegister(u8, u8),
    SkipNotEqualRegister(u8, u8),

    // 6XNN / 7XNN
    SetRegister(u8, u8),
    AddToRegister(u8, u8),

    // 8XY0..8XYE, the ALU block
    CopyRegister(u8, u8),
    Or(u8, u8),
    And(u8, u8),
    XOr(u8, u8),
    Add(u8, u8),
    SubtractForward(u8, u8),
    SubtractBackward(u8, u8),
    // shifts read Vx only, the VY-sourced variant is a compatibility
    // mode this machine does not carry
    RightShift(u8),
    LeftShift(u8),

    // ANNN / BNNN / CXNN
    SetIndexRegister(TypeAddr),
    JumpWithOffset(TypeAddr),
    Random(u8, u8),

    // DXYN
    // XOR an N pixel tall sprite from I onto the screen at (VX, VY),
    // VF reports collisions
    Display(u8, u8, u8),

    // EX9E / EXA1
    SkipIfPressed(u8),
    SkipIfNotPressed(u8),

    // FX07 / FX15 / FX18
    CopyDelayToRegister(u8),
    CopyRegisterToDelay(u8),
    CopyRegisterToSound(u8),

    // FX0A / FX1E / FX29 / FX33
    GetKey(u8),
    AddToIndex(u8),
    PointChar(u8),
    ToDecimal(u8),

    // FX55 / FX65
    StoreRegisterToMemory(u8),
    LoadRegisterFromMemory(u8),
}

impl OpCodes {
    /// None when the word matches nothing in the closed set, including
    /// a bad secondary code inside the 0x0, 0x8, 0xE and 0xF families
    /// and a nonzero trailing nibble on 5XY0 / 9XY0.
    pub fn decode_raw(ins: u16) -> Option<Self> {
        let raw = RawInstruction::new(ins);
        let op = match raw.family() {
            0x0 => match raw.code() {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                // 0NNN trapped into host machine code on the original
                // hardware, there is nothing to run here
                _ => return None,
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::PushSubroutine(raw.nnn()),
            0x3 => Self::SkipEqualConstant(raw.x(), raw.kk()),
            0x4 => Self::SkipNotEqualConstant(raw.x(), raw.kk()),
            0x5 if raw.n() == 0 => Self::SkipEqualRegister(raw.x(), raw.y()),
            0x6 => Self::SetRegister(raw.x(), raw.kk()),
            0x7 => Self::AddToRegister(raw.x(), raw.kk()),
            0x8 => match raw.n() {
                0x0 => Self::CopyRegister(raw.x(), raw.y()),
                0x1 => Self::Or(raw.x(), raw.y()),
                0x2 => Self::And(raw.x(), raw.y()),
                0x3 => Self::XOr(raw.x(), raw.y()),
                0x4 => Self::Add(raw.x(), raw.y()),
                0x5 => Self::SubtractForward(raw.x(), raw.y()),
                0x6 => Self::RightShift(raw.x()),
                0x7 => Self::SubtractBackward(raw.x(), raw.y()),
                0xE => Self::LeftShift(raw.x()),
                _ => return None,
            },
            0x9 if raw.n() == 0 => Self::SkipNotEqualRegister(raw.x(), raw.y()),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(raw.nnn()),
            0xC => Self::Random(raw.x(), raw.kk()),
            0xD => Self::Display(raw.x(), raw.y(), raw.n()),
            0xE => match raw.kk() {
                0x9E => Self::SkipIfPressed(raw.x()),
                0xA1 => Self::SkipIfNotPressed(raw.x()),
                _ => return None,
            },
            0xF => match raw.kk() {
                0x07 => Self::CopyDelayToRegister(raw.x()),
                0x0A => Self::GetKey(raw.x()),
                0x15 => Self::CopyRegisterToDelay(raw.x()),
                0x18 => Self::CopyRegisterToSound(raw.x()),
                0x1E => Self::AddToIndex(raw.x()),
                0x29 => Self::PointChar(raw.x()),
                0x33 => Self::ToDecimal(raw.x()),
                0x55 => Self::StoreRegisterToMemory(raw.x()),
                0x65 => Self::LoadRegisterFromMemory(raw.x()),
                _ => return None,
            },
            _ => return None,
        };
        Some(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_come_out_of_their_nibbles() {
        let raw = RawInstruction::new(0x4CEE);
        assert_eq!(raw.family(), 0x4);
        assert_eq!(raw.x(), 0xC);
        assert_eq!(raw.y(), 0xE);
        assert_eq!(raw.n(), 0xE);
        assert_eq!(raw.kk(), 0xEE);
        assert_eq!(raw.nnn(), 0xCEE);
    }

    #[test]
    fn decodes_every_alu_subcode() {
        assert_eq!(OpCodes::decode_raw(0x8120), Some(OpCodes::CopyRegister(1, 2)));
        assert_eq!(OpCodes::decode_raw(0x8121), Some(OpCodes::Or(1, 2)));
        assert_eq!(OpCodes::decode_raw(0x8122), Some(OpCodes::And(1, 2)));
        assert_eq!(OpCodes::decode_raw(0x8123), Some(OpCodes::XOr(1, 2)));
        assert_eq!(OpCodes::decode_raw(0x8124), Some(OpCodes::Add(1, 2)));
        assert_eq!(
            OpCodes::decode_raw(0x8125),
            Some(OpCodes::SubtractForward(1, 2))
        );
        assert_eq!(OpCodes::decode_raw(0x8126), Some(OpCodes::RightShift(1)));
        assert_eq!(
            OpCodes::decode_raw(0x8127),
            Some(OpCodes::SubtractBackward(1, 2))
        );
        assert_eq!(OpCodes::decode_raw(0x812E), Some(OpCodes::LeftShift(1)));
    }

    #[test]
    fn decodes_the_zero_family_exactly() {
        assert_eq!(OpCodes::decode_raw(0x00E0), Some(OpCodes::ClearScreen));
        assert_eq!(OpCodes::decode_raw(0x00EE), Some(OpCodes::PopSubroutine));
        assert_eq!(OpCodes::decode_raw(0x0000), None);
        assert_eq!(OpCodes::decode_raw(0x0123), None);
        assert_eq!(OpCodes::decode_raw(0x00E1), None);
    }

    #[test]
    fn register_skips_require_a_zero_tail() {
        assert_eq!(
            OpCodes::decode_raw(0x5120),
            Some(OpCodes::SkipEqualRegister(1, 2))
        );
        assert_eq!(OpCodes::decode_raw(0x5001), None);
        assert_eq!(
            OpCodes::decode_raw(0x9120),
            Some(OpCodes::SkipNotEqualRegister(1, 2))
        );
        assert_eq!(OpCodes::decode_raw(0x9121), None);
    }

    #[test]
    fn rejects_bad_secondary_codes() {
        assert_eq!(OpCodes::decode_raw(0x8128), None);
        assert_eq!(OpCodes::decode_raw(0xE19F), None);
        assert_eq!(OpCodes::decode_raw(0xE1A2), None);
        assert_eq!(OpCodes::decode_raw(0xF130), None);
        assert_eq!(OpCodes::decode_raw(0xFFFF), None);
    }

    #[test]
    fn operands_land_in_the_right_fields() {
        assert_eq!(OpCodes::decode_raw(0x1ABC), Some(OpCodes::Jump(0xABC)));
        assert_eq!(OpCodes::decode_raw(0x6A02), Some(OpCodes::SetRegister(0xA, 0x02)));
        assert_eq!(OpCodes::decode_raw(0xD12F), Some(OpCodes::Display(1, 2, 0xF)));
        assert_eq!(OpCodes::decode_raw(0xA2F0), Some(OpCodes::SetIndexRegister(0x2F0)));
        assert_eq!(OpCodes::decode_raw(0xC344), Some(OpCodes::Random(3, 0x44)));
    }
}
