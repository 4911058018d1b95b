//! The full implementation of the chip8 execution engine, from the machine
//! state aggregate to the individual opcode handlers.
mod chipset;
mod opcodes;

/// reexport chipset structs and data for simpler usage
pub use chipset::*;
