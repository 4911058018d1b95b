use crate::{
    definitions::{cpu::register, display::fontset, memory},
    opcode::{Instruction, Operation},
    ProcessError,
};

use super::{ChipSet, Status};

impl ChipSet {
    /// will run the handler for a single decoded instruction
    ///
    /// The program counter has already been advanced past the instruction by
    /// the fetch, so a conditional skip only has to add one more opcode step
    /// and a call pushes the already-advanced counter.
    pub(super) fn execute(&mut self, instruction: Instruction) -> Result<Operation, ProcessError> {
        use Instruction::*;

        let mut operation = Operation::None;

        match instruction {
            ClearDisplay => {
                self.framebuffer.clear();
                operation = Operation::Draw;
            }
            Return => {
                self.program_counter = self.pop_stack()?;
            }
            Jump { nnn } => {
                self.program_counter = nnn;
            }
            Call { nnn } => {
                self.push_stack(self.program_counter)?;
                self.program_counter = nnn;
            }
            SkipEqConst { x, nn } => {
                self.skip_if(self.registers[x] == nn);
            }
            SkipNeConst { x, nn } => {
                self.skip_if(self.registers[x] != nn);
            }
            SkipEqReg { x, y } => {
                self.skip_if(self.registers[x] == self.registers[y]);
            }
            LoadConst { x, nn } => {
                self.registers[x] = nn;
            }
            AddConst { x, nn } => {
                // let VX overflow, but ignore carry
                self.registers[x] = self.registers[x].wrapping_add(nn);
            }
            Copy { x, y } => {
                self.registers[x] = self.registers[y];
            }
            Or { x, y } => {
                self.registers[x] |= self.registers[y];
            }
            And { x, y } => {
                self.registers[x] &= self.registers[y];
            }
            Xor { x, y } => {
                self.registers[x] ^= self.registers[y];
            }
            AddReg { x, y } => {
                // standard mod-256 wraparound, VF holds the carry
                let (res, carry) = self.registers[x].overflowing_add(self.registers[y]);
                self.registers[x] = res;
                self.registers[register::FLAG] = carry.into();
            }
            SubReg { x, y } => {
                // VF is the "no borrow" flag here
                let (res, borrow) = self.registers[x].overflowing_sub(self.registers[y]);
                self.registers[x] = res;
                self.registers[register::FLAG] = (!borrow).into();
            }
            ShiftRight { x } => {
                self.registers[register::FLAG] = self.registers[x] & 1;
                self.registers[x] >>= 1;
            }
            SubReversed { x, y } => {
                let (res, borrow) = self.registers[y].overflowing_sub(self.registers[x]);
                self.registers[x] = res;
                self.registers[register::FLAG] = (!borrow).into();
            }
            ShiftLeft { x } => {
                self.registers[register::FLAG] = self.registers[x] >> 7;
                self.registers[x] <<= 1;
            }
            SkipNeReg { x, y } => {
                self.skip_if(self.registers[x] != self.registers[y]);
            }
            LoadIndex { nnn } => {
                self.index_register = nnn;
            }
            JumpOffset { nnn } => {
                self.program_counter = nnn + self.registers[0] as usize;
            }
            Random { x, nn } => {
                // using a fill bytes call here, as the trait RngCore does
                // not support a random u8 directly
                let mut rand: [u8; 1] = [0];
                self.rng.fill_bytes(&mut rand);
                self.registers[x] = nn & rand[0];
            }
            Draw { x, y, n } => {
                let index = self.index_register;
                self.check_range(index, n)?;

                let coorx = self.registers[x] as usize;
                let coory = self.registers[y] as usize;

                let collision =
                    self.framebuffer
                        .draw_sprite(coorx, coory, &self.memory[index..(index + n)]);
                self.registers[register::FLAG] = collision.into();
                operation = Operation::Draw;
            }
            SkipKeyPressed { x } => {
                let key = (self.registers[x] & 0xF) as usize;
                self.skip_if(self.keypad.is_pressed(key));
            }
            SkipKeyNotPressed { x } => {
                let key = (self.registers[x] & 0xF) as usize;
                self.skip_if(!self.keypad.is_pressed(key));
            }
            ReadDelay { x } => {
                self.registers[x] = self.delay_timer.get_value();
            }
            WaitKey { x } => {
                // stall until the driver delivers the next key press, which
                // writes the key into VX and resumes execution
                self.status = Status::WaitingForKey(x);
                operation = Operation::Wait;
            }
            SetDelay { x } => {
                self.delay_timer.set_value(self.registers[x]);
            }
            SetSound { x } => {
                self.sound_timer.set_value(self.registers[x]);
            }
            AddIndex { x } => {
                // no overflow flag is defined for this instruction, the
                // bounds are checked whenever the index is dereferenced
                self.index_register += self.registers[x] as usize;
            }
            FontChar { x } => {
                let glyph = (self.registers[x] & 0xF) as usize;
                self.index_register = fontset::LOCATION + fontset::GLYPH_SIZE * glyph;
            }
            StoreBcd { x } => {
                let i = self.index_register;
                self.check_range(i, 3)?;
                let r = self.registers[x];

                self.memory[i] = r / 100; // 246u8 / 100 => 2
                self.memory[i + 1] = r / 10 % 10; // 246u8 / 10 => 24 % 10 => 4
                self.memory[i + 2] = r % 10; // 246u8 % 10 => 6
            }
            StoreRegisters { x } => {
                let index = self.index_register;
                self.check_range(index, x + 1)?;
                self.memory[index..=(index + x)].copy_from_slice(&self.registers[..=x]);
            }
            LoadRegisters { x } => {
                let index = self.index_register;
                self.check_range(index, x + 1)?;
                self.registers[..=x].copy_from_slice(&self.memory[index..=(index + x)]);
            }
        }

        Ok(operation)
    }

    /// Will skip the following instruction if the condition holds.
    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.program_counter += memory::opcodes::SIZE;
        }
    }
}
