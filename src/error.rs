use std::io;

use thiserror::Error;

use crate::opcode::Opcode;

/// Fatal errors raised while loading a rom image, before any
/// execution has started.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("The rom image is empty.")]
    Empty,
    #[error("The rom image is too large ({size} bytes), at most {max} bytes fit into memory.")]
    TooLarge { size: usize, max: usize },
    #[error("The rom image could not be read: {0}")]
    Io(#[from] io::Error),
}

/// Fatal faults raised while stepping the machine. Once one of
/// these occured the machine state can no longer be trusted and
/// stepping has to stop.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ProcessError {
    #[error("Invalid opcode state '{0}'.")]
    Opcode(#[from] OpcodeError),
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
    #[error("Invalid memory access '{0}'.")]
    Address(#[from] AddressError),
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    InvalidOpcode(Opcode),
    #[error("Pointer location invalid there can not be an opcode at {pointer}, if data len is {len}")]
    MemoryInvalid { pointer: usize, len: usize },
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Overflow,
    #[error("Stack is empty!")]
    Underflow,
}

/// An instruction computed an effective address range that does
/// not fit into the machine memory.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[error("the address range starting at {address:#05X} with length {len} is outside of memory")]
pub struct AddressError {
    pub address: usize,
    pub len: usize,
}
