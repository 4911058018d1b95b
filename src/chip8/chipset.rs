use rand::RngCore;

use crate::{
    definitions::{cpu, display, memory},
    devices::Keypad,
    framebuffer::Framebuffer,
    opcode::{self, Instruction, Opcode, Operation},
    resources::Rom,
    timer::Timer,
    AddressError, ProcessError, StackError,
};

/// Whether the machine is making forward progress or is stalled on the
/// blocking key-wait instruction `FX0A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The machine executes one instruction per step.
    Running,
    /// `FX0A` was executed and no key event has arrived yet. Stepping is a
    /// no-op until the driver delivers a key press, which writes the key
    /// into the register carried here and resumes execution.
    WaitingForKey(usize),
}

/// The ChipSet struct represents the current state of the system, it
/// contains all the structures needed for emulating an instant on the
/// Chip8 CPU.
///
/// The chipset owns no clock of its own: an external driver calls
/// [`step`](ChipSet::step) at the instruction rate and
/// [`tick_timers`](ChipSet::tick_timers) at the `60 Hz` timer rate.
pub struct ChipSet {
    /// name of the loaded rom
    pub(super) name: String,
    /// the last fetched opcode, all two bytes long and stored big-endian
    pub(super) opcode: Opcode,
    /// - `0x000-0x04F` - the built in `4x5` pixel font set (`0-F`)
    /// - `0x200-0xFFF` - Program ROM and work RAM
    pub(super) memory: Vec<u8>,
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles
    /// as a flag for some instructions; thus, it should be avoided. In an
    /// addition operation, `VF` is the carry flag, while in subtraction, it
    /// is the "no borrow" flag. In the draw instruction `VF` is set upon
    /// pixel collision.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`, used as a memory pointer
    pub(super) index_register: usize,
    /// The program counter is a CPU register in the computer processor which
    /// has the address of the next instruction to be executed from memory.
    pub(super) program_counter: usize,
    /// The first address past the loaded rom. Once the program counter
    /// reaches it there is nothing left to execute and stepping idles.
    pub(super) rom_end: usize,
    /// The stack is only used to store return addresses when subroutines are
    /// called. Here up to `16` levels of nesting are allowed, exceeding them
    /// is an unrecoverable fault.
    pub(super) stack: Vec<usize>,
    /// Delay timer: This timer is intended to be used for timing the events
    /// of games. Its value can be set and read.
    /// Counts down at 60 hertz, until it reaches 0.
    pub(super) delay_timer: Timer,
    /// Sound timer: This timer is used for sound effects. When its value is
    /// nonzero, a beeping sound is made by the audio collaborator.
    /// Counts down at 60 hertz, until it reaches 0.
    pub(super) sound_timer: Timer,
    /// The monochrome `64 x 32` pixel grid, mutated only by the clear and
    /// draw instructions and read by the external renderer.
    pub(super) framebuffer: Framebuffer,
    /// Input is done with a hex keyboard that has 16 keys ranging `0-F`.
    /// The external input collaborator latches key-down and key-up events
    /// into here.
    pub(super) keypad: Keypad,
    /// Whether execution advances or stalls on the key-wait instruction.
    pub(super) status: Status,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
}

impl ChipSet {
    /// will create a new chipset object with the rom loaded at
    /// `0x200` and the font glyphs at `0x000`
    pub fn new(rom: Rom) -> Self {
        // initialize all the memory with 0
        let mut ram = vec![0; memory::SIZE];

        // load fonts
        ram[display::fontset::LOCATION
            ..(display::fontset::LOCATION + display::fontset::FONTSET.len())]
            .copy_from_slice(&display::fontset::FONTSET);

        // write the rom data into memory
        ram[cpu::PROGRAM_COUNTER..(cpu::PROGRAM_COUNTER + rom.len())]
            .copy_from_slice(rom.get_data());

        Self {
            name: rom.get_name().to_string(),
            opcode: 0,
            memory: ram,
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER,
            rom_end: cpu::PROGRAM_COUNTER + rom.len(),
            stack: Vec::with_capacity(cpu::stack::SIZE),
            delay_timer: Timer::new(0),
            sound_timer: Timer::new(0),
            framebuffer: Framebuffer::new(),
            keypad: Keypad::new(),
            status: Status::Running,
            rng: Box::new(rand::rngs::OsRng),
        }
    }

    /// will advance the program by a single instruction
    ///
    /// Fetches the big-endian word at the program counter, advances the
    /// counter by two, decodes the word into an [`Instruction`] and runs
    /// the matching handler. While the machine waits on a key event or the
    /// program counter has left the loaded rom this is a no-op.
    ///
    /// Unrecognized opcodes are logged and skipped, everything else that
    /// goes wrong is a fatal fault and stepping has to stop.
    pub fn step(&mut self) -> Result<Operation, ProcessError> {
        if let Status::WaitingForKey(_) = self.status {
            return Ok(Operation::Wait);
        }
        if self.program_counter >= self.rom_end {
            return Ok(Operation::Idle);
        }

        self.opcode =
            opcode::build_opcode(&self.memory, self.program_counter).map_err(ProcessError::Opcode)?;
        self.program_counter += memory::opcodes::SIZE;

        match Instruction::try_from(self.opcode) {
            Ok(instruction) => {
                log::debug!("opcode {:#06X} at {:#05X}", self.opcode, self.program_counter);
                self.execute(instruction)
            }
            Err(err) => {
                // permissive interpreter behavior, unimplemented extensions
                // must not kill the program
                log::warn!("{}", err);
                Ok(Operation::None)
            }
        }
    }

    /// Will decrement both countdown timers once. Has to be called by the
    /// external driver at the `60 Hz` timer cadence, decoupled from the
    /// instruction rate.
    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    /// Will latch the given key as held down.
    ///
    /// If the machine stalls on the key-wait instruction this is the event
    /// it waits for: the key value is written into the target register, the
    /// event is consumed and execution resumes.
    pub fn press_key(&mut self, key: usize) {
        self.keypad.set_key(key, true);

        if let Status::WaitingForKey(x) = self.status {
            self.registers[x] = key as u8;
            self.status = Status::Running;
        }
    }

    /// Will latch the given key as released.
    pub fn release_key(&mut self, key: usize) {
        self.keypad.set_key(key, false);
    }

    /// Will get the current state of the keypad latch.
    pub fn get_keyboard(&self) -> &[bool] {
        self.keypad.get_keys()
    }

    /// Will return the current framebuffer for the external renderer.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// will return the sound timer, the audio collaborator shall emit a
    /// tone while it is non-zero
    pub fn get_sound_timer(&self) -> u8 {
        self.sound_timer.get_value()
    }

    /// will return the delay timer
    pub fn get_delay_timer(&self) -> u8 {
        self.delay_timer.get_value()
    }

    pub fn get_status(&self) -> Status {
        self.status
    }

    /// Will return the name of the loaded rom.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Will push the current pointer to the stack.
    pub(super) fn push_stack(&mut self, pointer: usize) -> Result<(), StackError> {
        if self.stack.len() == cpu::stack::SIZE {
            Err(StackError::Overflow)
        } else {
            self.stack.push(pointer);
            Ok(())
        }
    }

    /// Will pop the last return address from the stack.
    pub(super) fn pop_stack(&mut self) -> Result<usize, StackError> {
        self.stack.pop().ok_or(StackError::Underflow)
    }

    /// Will verify that `address..address + len` lies inside the machine
    /// memory, so that no instruction can silently corrupt state by
    /// indexing past it.
    pub(super) fn check_range(&self, address: usize, len: usize) -> Result<(), AddressError> {
        if address + len <= memory::SIZE {
            Ok(())
        } else {
            Err(AddressError { address, len })
        }
    }
}
