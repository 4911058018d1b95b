//! The machine constants.

pub mod memory {
    /// The size of the chipset ram
    pub const SIZE: usize = 0x1000; // 4096

    /// opcode information
    pub mod opcodes {
        /// The step used for calculating the program counter increments
        pub const SIZE: usize = 2;
    }
}

/// The definitions for the cpu
pub mod cpu {
    /// The starting point for the program
    pub const PROGRAM_COUNTER: usize = 0x0200;
    /// The amound of hertz the emulation shall run at.
    pub const HERTZ: u64 = 500;
    /// The amount of time between two cpu cycles in microseconds
    pub const INTERVAL_US: u64 = 1_000_000 / HERTZ;

    /// The definitions needed for the register
    pub mod register {
        /// The size of the chip set registers
        pub const SIZE: usize = 16;
        /// The last entry of the registers, doubling as the
        /// carry / borrow / collision flag `VF`
        pub const FLAG: usize = SIZE - 1;
    }

    /// The stack definitions
    pub mod stack {
        /// The count of nesting entries
        pub const SIZE: usize = 16;
    }
}

/// The timer definitions
pub mod timer {
    /// The amount of hertz the clocks run at
    pub const HERTZ: u64 = 60;
    /// The amount of cpu cycles in between two timer ticks,
    /// used by the runner to divide the instruction cadence
    /// down to the timer cadence
    pub const CYCLES_PER_TICK: u64 = super::cpu::HERTZ / HERTZ;
}

/// The display definitions
pub mod display {
    /// The amount of pixels width
    pub const WIDTH: usize = 64;
    /// The amount of pixels height
    pub const HEIGHT: usize = 32;

    /// The fontset information
    pub mod fontset {
        /// Is the location of the beginning of the font in memory
        pub const LOCATION: usize = 0x0;
        /// The amount of bytes a single font glyph takes up
        pub const GLYPH_SIZE: usize = 5;
        /// The font set characters to be rendered on the screen
        pub const FONTSET: [u8; 80] = [
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
    }
}

/// The definitions needed for correct keyboard definitions.
pub mod keyboard {
    /// all the different keyboard entries
    pub const SIZE: usize = 16;
}

/// The rom definitions
pub mod rom {
    /// The maximum size a rom may have, as it is loaded
    /// behind the reserved interpreter area
    pub const MAX_SIZE: usize = super::memory::SIZE - super::cpu::PROGRAM_COUNTER;
}
