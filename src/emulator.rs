use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    decode::OpCodes,
    display::FrameBuffer,
    errors::{ChipError, Result},
    keyboard::{Keyboard, NUM_KEYS},
    memory::{GLYPH_BYTES, Memory, TypeAddr},
    registers::Registers,
    timer::Timers,
};

/// What a call to `step` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One instruction ran to completion.
    Ran,
    /// The machine is parked on FX0A and nothing was fetched. Timer
    /// ticks and key updates still apply while parked.
    AwaitingKey,
}

// FX0A in flight: where the key lands, and which keys were already
// down when the wait began
struct KeyWait {
    dest: u8,
    seen: [bool; NUM_KEYS],
}

pub struct Emulator {
    pub mem: Memory,
    pub regs: Registers,
    pub fb: FrameBuffer,
    pub keys: Keyboard,
    pub timers: Timers,
    waiting: Option<KeyWait>,
    rng: StdRng,
}

impl Emulator {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Fixed seed gives a reproducible CXNN stream.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            mem: Memory::new(),
            regs: Registers::new(),
            fb: FrameBuffer::new(),
            keys: Keyboard::new(),
            timers: Timers::new(),
            waiting: None,
            rng,
        }
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> usize {
        self.mem.load_rom(rom)
    }

    /// Fetches, decodes and executes one instruction, or polls the key
    /// wait if FX0A parked the machine. A fault halts everything: the
    /// caller is expected to stop stepping, and the reported pc points
    /// at the instruction that faulted.
    pub fn step(&mut self) -> Result<Step> {
        if let Some(wait) = self.waiting.take() {
            return Ok(self.poll_key_wait(wait));
        }

        let pc = self.regs.pc;
        let word = self
            .mem
            .get_word(pc)
            .ok_or(ChipError::OutOfBounds { addr: pc, pc })?;
        self.regs.pc = pc + 2;
        let ins =
            OpCodes::decode_raw(word).ok_or(ChipError::UnknownOpcode { opcode: word, pc })?;
        trace!("{pc:#05X}: {word:04X}  {ins}");
        self.execute_ins(ins, pc)
    }

    // a key already down when the wait began has to go up before a
    // press of it can satisfy FX0A
    fn poll_key_wait(&mut self, mut wait: KeyWait) -> Step {
        let mut pressed = None;
        for key in 0..NUM_KEYS as u8 {
            if !self.keys.is_pressed(key) {
                wait.seen[key as usize] = false;
            } else if pressed.is_none() && !wait.seen[key as usize] {
                pressed = Some(key);
            }
        }
        match pressed {
            Some(key) => {
                self.regs.set_register(wait.dest, key);
                Step::Ran
            }
            None => {
                self.waiting = Some(wait);
                Step::AwaitingKey
            }
        }
    }

    fn execute_ins(&mut self, ins: OpCodes, pc: TypeAddr) -> Result<Step> {
        match ins {
            OpCodes::ClearScreen => self.fb.clear(),
            OpCodes::Jump(addr) => self.regs.pc = addr,
            OpCodes::PushSubroutine(addr) => {
                // pc already advanced, so the return lands just past
                // the call
                self.regs
                    .push(self.regs.pc)
                    .ok_or(ChipError::StackOverflow { pc })?;
                self.regs.pc = addr;
            }
            OpCodes::PopSubroutine => {
                self.regs.pc = self.regs.pop().ok_or(ChipError::StackUnderflow { pc })?;
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.regs.pc += 2;
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.regs.pc += 2;
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.regs.pc += 2;
                }
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.regs.pc += 2;
                }
            }
            OpCodes::SetRegister(vx, nn) => self.regs.set_register(vx, nn),
            OpCodes::AddToRegister(vx, nn) => self.regs.add_to_register(vx, nn),
            OpCodes::CopyRegister(vx, vy) => self.regs.set_register(vx, self.regs.get(vy)),
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            OpCodes::Add(vx, vy) => {
                // carry judged on the 9-bit sum, flag written last so
                // it wins when vx is VF itself
                let sum = self.regs.get(vx) as u16 + self.regs.get(vy) as u16;
                self.regs.set_register(vx, sum as u8);
                self.regs.set_register(0xF, (sum > 0xFF) as u8);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, x.wrapping_sub(y));
                self.regs.set_register(0xF, (x > y) as u8); // no borrow
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, y.wrapping_sub(x));
                self.regs.set_register(0xF, (y > x) as u8);
            }
            OpCodes::RightShift(vx) => {
                let value = self.regs.get(vx);
                self.regs.set_register(vx, value >> 1);
                self.regs.set_register(0xF, value & 1);
            }
            OpCodes::LeftShift(vx) => {
                let value = self.regs.get(vx);
                self.regs.set_register(vx, value << 1);
                self.regs.set_register(0xF, value >> 7);
            }
            OpCodes::SetIndexRegister(addr) => self.regs.i = addr,
            OpCodes::JumpWithOffset(addr) => self.regs.pc = addr + self.regs.get(0) as u16,
            OpCodes::Random(vx, nn) => {
                let byte: u8 = self.rng.gen();
                self.regs.set_register(vx, byte & nn);
            }
            OpCodes::Display(rx, ry, n) => {
                let (x, y) = (self.regs.get(rx), self.regs.get(ry));
                let base = self.regs.i;
                let sprite = self
                    .mem
                    .get_slice(base, n as usize)
                    .ok_or(ChipError::OutOfBounds { addr: base, pc })?;
                let collided = self.fb.paint(x, y, sprite);
                self.regs.set_register(0xF, collided as u8);
            }
            OpCodes::SkipIfPressed(vx) => {
                if self.keys.is_pressed(self.regs.get(vx)) {
                    self.regs.pc += 2;
                }
            }
            OpCodes::SkipIfNotPressed(vx) => {
                if !self.keys.is_pressed(self.regs.get(vx)) {
                    self.regs.pc += 2;
                }
            }
            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.timers.delay()),
            OpCodes::CopyRegisterToDelay(vx) => self.timers.set_delay(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.timers.set_sound(self.regs.get(vx)),
            OpCodes::GetKey(vx) => {
                self.waiting = Some(KeyWait {
                    dest: vx,
                    seen: self.keys.snapshot(),
                });
                return Ok(Step::AwaitingKey);
            }
            OpCodes::AddToIndex(vx) => {
                // I is unchecked at write time, a bad value faults
                // when it is used
                self.regs.i = self.regs.i.wrapping_add(self.regs.get(vx) as u16);
            }
            OpCodes::PointChar(vx) => {
                self.regs.i = self.regs.get(vx) as TypeAddr * GLYPH_BYTES;
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = [value / 100, value / 10 % 10, value % 10];
                let base = self.regs.i;
                self.mem
                    .set_slice(base, &digits)
                    .ok_or(ChipError::OutOfBounds { addr: base, pc })?;
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let data: Vec<u8> = (0..=vx).map(|reg| self.regs.get(reg)).collect();
                let base = self.regs.i;
                self.mem
                    .set_slice(base, &data)
                    .ok_or(ChipError::OutOfBounds { addr: base, pc })?;
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let base = self.regs.i;
                let data = self
                    .mem
                    .get_slice(base, vx as usize + 1)
                    .ok_or(ChipError::OutOfBounds { addr: base, pc })?;
                for (reg, byte) in data.iter().enumerate() {
                    self.regs.set_register(reg as u8, *byte);
                }
            }
        }
        Ok(Step::Ran)
    }
}
