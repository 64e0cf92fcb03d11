use crate::memory::{ROM_START, TypeAddr};

pub const STACK_DEPTH: usize = 16;

/// V0..VF, the index register, the program counter and the call stack.
/// VF doubles as the flag register, instructions overwrite it freely.
pub struct Registers {
    registers: [u8; 16],
    pub i: TypeAddr,
    pub pc: TypeAddr,
    pub sp: u8,
    stack: [TypeAddr; STACK_DEPTH],
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; 16],
            i: 0,
            pc: ROM_START,
            sp: 0,
            stack: [0; STACK_DEPTH],
        }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[reg_num as usize] = value;
    }

    // 7XNN wraps and leaves VF alone
    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let reg = &mut self.registers[reg_num as usize];
        *reg = reg.wrapping_add(value);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[reg_num as usize]
    }

    // None means the 16 return slots are full
    pub fn push(&mut self, addr: TypeAddr) -> Option<()> {
        let slot = self.stack.get_mut(self.sp as usize)?;
        *slot = addr;
        self.sp += 1;
        Some(())
    }

    // None means there is nothing to return to
    pub fn pop(&mut self) -> Option<TypeAddr> {
        self.sp = self.sp.checked_sub(1)?;
        Some(self.stack[self.sp as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boots_with_pc_at_rom_start() {
        let regs = Registers::new();
        assert_eq!(regs.pc, 0x200);
        assert_eq!(regs.i, 0);
        assert_eq!(regs.sp, 0);
    }

    #[test]
    fn add_wraps_modulo_256() {
        let mut regs = Registers::new();
        regs.set_register(0, 0xFF);
        regs.add_to_register(0, 0x02);
        assert_eq!(regs.get(0), 0x01);
        // the flag register is untouched by the wrap
        assert_eq!(regs.get(0xF), 0x00);
    }

    #[test]
    fn stack_round_trips_in_lifo_order() {
        let mut regs = Registers::new();
        regs.push(0x202).unwrap();
        regs.push(0x404).unwrap();
        assert_eq!(regs.sp, 2);
        assert_eq!(regs.pop(), Some(0x404));
        assert_eq!(regs.pop(), Some(0x202));
        assert_eq!(regs.sp, 0);
    }

    #[test]
    fn push_past_sixteen_frames_fails() {
        let mut regs = Registers::new();
        for n in 0..STACK_DEPTH {
            assert_eq!(regs.push(0x200 + n as TypeAddr), Some(()));
        }
        assert_eq!(regs.push(0xBEE), None);
        assert_eq!(regs.sp, STACK_DEPTH as u8);
    }

    #[test]
    fn pop_on_empty_stack_fails() {
        let mut regs = Registers::new();
        assert_eq!(regs.pop(), None);
        assert_eq!(regs.sp, 0);
    }
}
