//! The externally clocked driver helper.
use crate::{
    chip8::ChipSet,
    definitions::timer,
    devices::{DisplayCommands, KeyboardCommands},
    opcode::Operation,
    ProcessError,
};

/// Owns the machine together with its two collaborators and wires them up
/// for one instruction per call.
///
/// The runner itself carries no thread or clock either, the caller invokes
/// [`cycle`](Runner::cycle) at the instruction rate (nominally
/// [`cpu::HERTZ`](crate::definitions::cpu::HERTZ)). The `60 Hz` timer
/// cadence is derived from that by ticking the timers once every
/// [`timer::CYCLES_PER_TICK`] cycles, so the two rates stay decoupled from
/// the instruction count of the running program.
pub struct Runner<D, K>
where
    D: DisplayCommands,
    K: KeyboardCommands,
{
    chip: ChipSet,
    display: D,
    keyboard: K,
    cycles: u64,
}

impl<D, K> Runner<D, K>
where
    D: DisplayCommands,
    K: KeyboardCommands,
{
    pub fn new(chip: ChipSet, display: D, keyboard: K) -> Self {
        Self {
            chip,
            display,
            keyboard,
            cycles: 0,
        }
    }

    /// Will run a single driver cycle: forward pending key events into the
    /// keypad latch, step the machine once, hand the framebuffer to the
    /// display after a draw and divide the cadence down for the timers.
    pub fn cycle(&mut self) -> Result<Operation, ProcessError> {
        while let Some(event) = self.keyboard.poll_key() {
            if event.pressed {
                self.chip.press_key(event.key);
            } else {
                self.chip.release_key(event.key);
            }
        }

        let operation = self.chip.step()?;

        if let Operation::Draw = operation {
            self.display.draw(self.chip.framebuffer());
        }

        self.cycles += 1;
        if self.cycles % timer::CYCLES_PER_TICK == 0 {
            self.chip.tick_timers();
        }

        Ok(operation)
    }

    pub fn chip(&self) -> &ChipSet {
        &self.chip
    }

    pub fn chip_mut(&mut self) -> &mut ChipSet {
        &mut self.chip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chip8::Status,
        devices::{KeyEvent, MockDisplayCommands, MockKeyboardCommands},
        resources::Rom,
    };

    /// builds a rom from whole opcodes
    fn rom_from_opcodes(opcodes: &[u16]) -> Rom {
        let data: Vec<u8> = opcodes
            .iter()
            .flat_map(|opcode| opcode.to_be_bytes())
            .collect();
        Rom::new("TEST", data).expect("the test rom is well formed")
    }

    fn no_input() -> MockKeyboardCommands {
        let mut keyboard = MockKeyboardCommands::new();
        keyboard.expect_poll_key().returning(|| None);
        keyboard
    }

    #[test]
    fn test_draw_is_forwarded_to_the_display() {
        let rom = rom_from_opcodes(&[0x00E0]);

        let mut display = MockDisplayCommands::new();
        display.expect_draw().times(1).returning(|_| ());

        let mut runner = Runner::new(ChipSet::new(rom), display, no_input());

        assert_eq!(Ok(Operation::Draw), runner.cycle());
        assert_eq!(Ok(Operation::Idle), runner.cycle());
    }

    #[test]
    fn test_key_events_reach_the_keypad_latch() {
        let rom = rom_from_opcodes(&[0xF10A]);

        let mut keyboard = MockKeyboardCommands::new();
        // nothing pending on the first cycle, a key press on the second
        keyboard.expect_poll_key().times(1).returning(|| None);
        keyboard.expect_poll_key().times(1).returning(|| {
            Some(KeyEvent {
                key: 0xB,
                pressed: true,
            })
        });
        keyboard.expect_poll_key().returning(|| None);

        let mut runner = Runner::new(ChipSet::new(rom), MockDisplayCommands::new(), keyboard);

        assert_eq!(Ok(Operation::Wait), runner.cycle());
        assert_eq!(Status::WaitingForKey(0x1), runner.chip().get_status());

        // the press resolves the wait and stays latched
        assert_eq!(Ok(Operation::Idle), runner.cycle());
        assert_eq!(Status::Running, runner.chip().get_status());
        assert!(runner.chip().get_keyboard()[0xB]);
    }

    #[test]
    fn test_timers_tick_slower_than_instructions() {
        // V0 = 50, seed both timers from it, then a hundred harmless loads
        let mut opcodes = vec![0x6032, 0xF015, 0xF018];
        opcodes.extend_from_slice(&[0x6100; 100]);
        let rom = rom_from_opcodes(&opcodes);

        let mut runner = Runner::new(ChipSet::new(rom), MockDisplayCommands::new(), no_input());

        let total_cycles = opcodes.len() as u64;
        for _ in 0..total_cycles {
            runner.cycle().expect("the rom holds no faulting instruction");
        }

        let expected_ticks = (total_cycles / timer::CYCLES_PER_TICK) as u8;
        assert!(expected_ticks < 50 / 2, "far fewer ticks than instructions");
        assert_eq!(
            50 - expected_ticks,
            runner.chip().get_delay_timer(),
            "the timers have to decay at 60 Hz, not per instruction"
        );
        assert_eq!(50 - expected_ticks, runner.chip().get_sound_timer());
    }
}
