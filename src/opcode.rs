//! Opcode abstractions, the nibble field extractors and the
//! decoded instruction representation.
use crate::OpcodeError;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// the size of a single byte in bits
const BYTE_SIZE: u16 = 0x8;
/// the size of a single nibble in bits
const NIBBLE_SIZE: u16 = BYTE_SIZE / 2;

/// will build an opcode from data and the given point
///
/// # Arguments
///
/// - `data` - A slice of u8 data entries used to generate the opcodes
/// - `pointer` - Where in the data the opcode shall be extracted, so `pointer` and
/// `pointer + 1` make the opcode up
///
/// # Example
/// ```rust
/// # use chirp8::opcode::*;
/// const OPCODES: [Opcode; 2] = [0x00EE, 0x1EDA];
/// const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];
/// for (i, val) in OPCODES.iter().enumerate() {
///     let opcode = build_opcode(&SPLIT_OPCODE, i * 2).expect("This will work.");
///     assert_eq!(opcode, *val);
/// }
/// ```
pub fn build_opcode(data: &[u8], pointer: usize) -> Result<Opcode, OpcodeError> {
    // controlling that there is no illegal access here
    if pointer + 1 < data.len() {
        Ok(Opcode::from_be_bytes([data[pointer], data[pointer + 1]]))
    } else {
        Err(OpcodeError::MemoryInvalid {
            pointer,
            len: data.len(),
        })
    }
}

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeTrait {
    /// this is an opcode extractor that will return the
    /// opcode class nibble `T` from any opcode `TNNN`
    fn t(&self) -> usize;

    /// this is an opcode extractor for the opcode type `TNNN`
    /// - `NNN` is an address constant
    fn nnn(&self) -> usize;

    /// this is an opcode extractor for the opcode type `TXNN`
    /// - `X` is a register index
    /// - `NN` is a constant
    fn xnn(&self) -> (usize, u8);

    /// this is an opcode extractor for the opcode type `TXYN`
    /// - `X` and `Y` are register indexes
    /// - `N` is an opcode subtype or constant
    fn xyn(&self) -> (usize, usize, usize);

    /// this is an opcode extractor for the opcode type `TXYT`
    /// - `X` and `Y` are register indexes
    fn xy(&self) -> (usize, usize);

    /// this is an opcode extractor for the opcode type `TXTT`
    /// - `X` is a register index
    fn x(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    fn t(&self) -> usize {
        (self >> (3 * NIBBLE_SIZE)) as usize
    }

    fn nnn(&self) -> usize {
        (self & 0x0FFF) as usize
    }

    fn xnn(&self) -> (usize, u8) {
        let x = self.x();
        let nn = (self & 0x00FF) as u8;
        (x, nn)
    }

    fn xyn(&self) -> (usize, usize, usize) {
        let (x, y) = self.xy();
        let n = (self & 0x000F) as usize;
        (x, y, n)
    }

    fn xy(&self) -> (usize, usize) {
        let x = self.x();
        let y = ((self & 0x00F0) >> NIBBLE_SIZE) as usize;
        (x, y)
    }

    fn x(&self) -> usize {
        ((self & 0x0F00) >> BYTE_SIZE) as usize
    }
}

/// The decoded form of a single opcode. The fetcher decodes the
/// raw big-endian word into one of these tags, the chipset then
/// maps every tag onto its handler, which keeps the dispatch
/// flat and every instruction independently testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0` - Display - Clears the screen.
    ClearDisplay,
    /// `00EE` - Flow - Returns from a subroutine.
    Return,
    /// `1NNN` - Flow - Jumps to address `NNN`.
    Jump { nnn: usize },
    /// `2NNN` - Flow - Calls subroutine at `NNN`.
    Call { nnn: usize },
    /// `3XNN` - Cond - Skips the next instruction if `VX` equals `NN`.
    SkipEqConst { x: usize, nn: u8 },
    /// `4XNN` - Cond - Skips the next instruction if `VX` doesn't equal `NN`.
    SkipNeConst { x: usize, nn: u8 },
    /// `5XY0` - Cond - Skips the next instruction if `VX` equals `VY`.
    SkipEqReg { x: usize, y: usize },
    /// `6XNN` - Const - Sets `VX` to `NN`.
    LoadConst { x: usize, nn: u8 },
    /// `7XNN` - Const - Adds `NN` to `VX`. (Carry flag is not changed)
    AddConst { x: usize, nn: u8 },
    /// `8XY0` - Assign - Sets `VX` to the value of `VY`.
    Copy { x: usize, y: usize },
    /// `8XY1` - BitOp - Sets `VX` to `VX` or `VY`.
    Or { x: usize, y: usize },
    /// `8XY2` - BitOp - Sets `VX` to `VX` and `VY`.
    And { x: usize, y: usize },
    /// `8XY3` - BitOp - Sets `VX` to `VX` xor `VY`.
    Xor { x: usize, y: usize },
    /// `8XY4` - Math - Adds `VY` to `VX`. `VF` is set to `1` when there's a
    /// carry, and to `0` when there isn't.
    AddReg { x: usize, y: usize },
    /// `8XY5` - Math - `VY` is subtracted from `VX`. `VF` is set to `0` when
    /// there's a borrow, and `1` when there isn't.
    SubReg { x: usize, y: usize },
    /// `8XY6` - BitOp - Stores the least significant bit of `VX` in `VF` and
    /// then shifts `VX` to the right by `1`. (`VY` is ignored, modern dialect)
    ShiftRight { x: usize },
    /// `8XY7` - Math - Sets `VX` to `VY` minus `VX`. `VF` is set to `0` when
    /// there's a borrow, and `1` when there isn't.
    SubReversed { x: usize, y: usize },
    /// `8XYE` - BitOp - Stores the most significant bit of `VX` in `VF` and
    /// then shifts `VX` to the left by `1`. (`VY` is ignored, modern dialect)
    ShiftLeft { x: usize },
    /// `9XY0` - Cond - Skips the next instruction if `VX` doesn't equal `VY`.
    SkipNeReg { x: usize, y: usize },
    /// `ANNN` - MEM - Sets `I` to the address `NNN`.
    LoadIndex { nnn: usize },
    /// `BNNN` - Flow - Jumps to the address `NNN` plus `V0`.
    JumpOffset { nnn: usize },
    /// `CXNN` - Rand - Sets `VX` to the result of a bitwise and operation on
    /// a random number and `NN`.
    Random { x: usize, nn: u8 },
    /// `DXYN` - Disp - Draws a sprite at coordinate `(VX, VY)` that has a
    /// width of `8` pixels and a height of `N` pixels.
    Draw { x: usize, y: usize, n: usize },
    /// `EX9E` - KeyOp - Skips the next instruction if the key stored in `VX`
    /// is pressed.
    SkipKeyPressed { x: usize },
    /// `EXA1` - KeyOp - Skips the next instruction if the key stored in `VX`
    /// isn't pressed.
    SkipKeyNotPressed { x: usize },
    /// `FX07` - Timer - Sets `VX` to the value of the delay timer.
    ReadDelay { x: usize },
    /// `FX0A` - KeyOp - A key press is awaited, and then stored in `VX`.
    /// (Blocking operation, the program counter stalls until the next key
    /// event)
    WaitKey { x: usize },
    /// `FX15` - Timer - Sets the delay timer to `VX`.
    SetDelay { x: usize },
    /// `FX18` - Sound - Sets the sound timer to `VX`.
    SetSound { x: usize },
    /// `FX1E` - MEM - Adds `VX` to `I`. `VF` is not affected.
    AddIndex { x: usize },
    /// `FX29` - MEM - Sets `I` to the location of the sprite for the
    /// character in `VX`. Characters `0-F` are represented by a `4x5` font.
    FontChar { x: usize },
    /// `FX33` - BCD - Stores the binary-coded decimal representation of `VX`
    /// at the addresses `I`, `I + 1` and `I + 2`.
    StoreBcd { x: usize },
    /// `FX55` - MEM - Stores `V0` to `VX` (including `VX`) in memory starting
    /// at address `I`. `I` itself is left unmodified.
    StoreRegisters { x: usize },
    /// `FX65` - MEM - Fills `V0` to `VX` (including `VX`) with values from
    /// memory starting at address `I`. `I` itself is left unmodified.
    LoadRegisters { x: usize },
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let err = || OpcodeError::InvalidOpcode(value);

        let res = match value.t() {
            0x0 => match value {
                0x00E0 => Instruction::ClearDisplay,
                0x00EE => Instruction::Return,
                _ => return Err(err()),
            },
            0x1 => Instruction::Jump { nnn: value.nnn() },
            0x2 => Instruction::Call { nnn: value.nnn() },
            0x3 => {
                let (x, nn) = value.xnn();
                Instruction::SkipEqConst { x, nn }
            }
            0x4 => {
                let (x, nn) = value.xnn();
                Instruction::SkipNeConst { x, nn }
            }
            0x5 => match value.xyn() {
                (x, y, 0x0) => Instruction::SkipEqReg { x, y },
                _ => return Err(err()),
            },
            0x6 => {
                let (x, nn) = value.xnn();
                Instruction::LoadConst { x, nn }
            }
            0x7 => {
                let (x, nn) = value.xnn();
                Instruction::AddConst { x, nn }
            }
            0x8 => {
                let (x, y, n) = value.xyn();
                match n {
                    0x0 => Instruction::Copy { x, y },
                    0x1 => Instruction::Or { x, y },
                    0x2 => Instruction::And { x, y },
                    0x3 => Instruction::Xor { x, y },
                    0x4 => Instruction::AddReg { x, y },
                    0x5 => Instruction::SubReg { x, y },
                    0x6 => Instruction::ShiftRight { x },
                    0x7 => Instruction::SubReversed { x, y },
                    0xE => Instruction::ShiftLeft { x },
                    _ => return Err(err()),
                }
            }
            0x9 => match value.xyn() {
                (x, y, 0x0) => Instruction::SkipNeReg { x, y },
                _ => return Err(err()),
            },
            0xA => Instruction::LoadIndex { nnn: value.nnn() },
            0xB => Instruction::JumpOffset { nnn: value.nnn() },
            0xC => {
                let (x, nn) = value.xnn();
                Instruction::Random { x, nn }
            }
            0xD => {
                let (x, y, n) = value.xyn();
                Instruction::Draw { x, y, n }
            }
            0xE => {
                let (x, nn) = value.xnn();
                match nn {
                    0x9E => Instruction::SkipKeyPressed { x },
                    0xA1 => Instruction::SkipKeyNotPressed { x },
                    _ => return Err(err()),
                }
            }
            0xF => {
                let (x, nn) = value.xnn();
                match nn {
                    0x07 => Instruction::ReadDelay { x },
                    0x0A => Instruction::WaitKey { x },
                    0x15 => Instruction::SetDelay { x },
                    0x18 => Instruction::SetSound { x },
                    0x1E => Instruction::AddIndex { x },
                    0x29 => Instruction::FontChar { x },
                    0x33 => Instruction::StoreBcd { x },
                    0x55 => Instruction::StoreRegisters { x },
                    0x65 => Instruction::LoadRegisters { x },
                    _ => return Err(err()),
                }
            }
            _ => return Err(err()),
        };
        Ok(res)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Represents a command from the interpreter up to the driver.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// If the driver shall wait for the next key press.
    Wait,
    /// A redraw command, the framebuffer has changed.
    Draw,
    /// The program counter has left the loaded rom, there is
    /// nothing left to execute.
    Idle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_opcode() {
        let data = [0x00, 0xEE, 0x1E, 0xDA];
        assert_eq!(Ok(0x00EE), build_opcode(&data, 0));
        assert_eq!(Ok(0xEE1E), build_opcode(&data, 1));
        assert_eq!(
            Err(OpcodeError::MemoryInvalid {
                pointer: 3,
                len: 4
            }),
            build_opcode(&data, 3)
        );
    }

    #[test]
    fn test_extractors() {
        let opcode: Opcode = 0x1EDA;
        assert_eq!(opcode.t(), 0x1);
        assert_eq!(opcode.nnn(), 0xEDA);
        assert_eq!(opcode.xnn(), (0xE, 0xDA));
        assert_eq!(opcode.xyn(), (0xE, 0xD, 0xA));
        assert_eq!(opcode.xy(), (0xE, 0xD));
        assert_eq!(opcode.x(), 0xE);
    }

    #[test]
    fn test_tryfrom_opcode_simple() {
        let value: Opcode = 0x00E0;
        assert_eq!(Ok(Instruction::ClearDisplay), value.try_into());
    }

    #[test]
    fn test_tryfrom_opcode_simple_fail() {
        let value: Opcode = 0x00E1;
        let conv: Result<Instruction, _> = value.try_into();
        assert!(conv.is_err());
    }

    #[test]
    fn test_tryfrom_opcode_multiple() {
        use Instruction::*;
        let tests = [
            (0x00E0, Ok(ClearDisplay)),
            (0x00EE, Ok(Return)),
            (0x00E1, Err("")),
            (0x1919, Ok(Jump { nnn: 0x919 })),
            (0x2222, Ok(Call { nnn: 0x222 })),
            (0x3123, Ok(SkipEqConst { x: 0x1, nn: 0x23 })),
            (0x4123, Ok(SkipNeConst { x: 0x1, nn: 0x23 })),
            (0x5120, Ok(SkipEqReg { x: 0x1, y: 0x2 })),
            (0x5121, Err("")),
            (0x6123, Ok(LoadConst { x: 0x1, nn: 0x23 })),
            (0x7123, Ok(AddConst { x: 0x1, nn: 0x23 })),
            (0x8120, Ok(Copy { x: 0x1, y: 0x2 })),
            (0x8121, Ok(Or { x: 0x1, y: 0x2 })),
            (0x8122, Ok(And { x: 0x1, y: 0x2 })),
            (0x8123, Ok(Xor { x: 0x1, y: 0x2 })),
            (0x8124, Ok(AddReg { x: 0x1, y: 0x2 })),
            (0x8125, Ok(SubReg { x: 0x1, y: 0x2 })),
            (0x8126, Ok(ShiftRight { x: 0x1 })),
            (0x8127, Ok(SubReversed { x: 0x1, y: 0x2 })),
            (0x812E, Ok(ShiftLeft { x: 0x1 })),
            (0x8128, Err("")),
            (0x9120, Ok(SkipNeReg { x: 0x1, y: 0x2 })),
            (0x9121, Err("")),
            (0xA222, Ok(LoadIndex { nnn: 0x222 })),
            (0xB222, Ok(JumpOffset { nnn: 0x222 })),
            (0xC123, Ok(Random { x: 0x1, nn: 0x23 })),
            (0xD123, Ok(Draw { x: 0x1, y: 0x2, n: 0x3 })),
            (0xE19E, Ok(SkipKeyPressed { x: 0x1 })),
            (0xE1A1, Ok(SkipKeyNotPressed { x: 0x1 })),
            (0xE111, Err("")),
            (0xF007, Ok(ReadDelay { x: 0x0 })),
            (0xF00A, Ok(WaitKey { x: 0x0 })),
            (0xF015, Ok(SetDelay { x: 0x0 })),
            (0xF018, Ok(SetSound { x: 0x0 })),
            (0xF01E, Ok(AddIndex { x: 0x0 })),
            (0xF029, Ok(FontChar { x: 0x0 })),
            (0xF033, Ok(StoreBcd { x: 0x0 })),
            (0xF055, Ok(StoreRegisters { x: 0x0 })),
            (0xF065, Ok(LoadRegisters { x: 0x0 })),
            (0xF0AA, Err("")),
        ];
        for (value, res) in tests {
            let conv: Result<Instruction, _> = value.try_into();
            assert_eq!(conv, res.map_err(|_| OpcodeError::InvalidOpcode(value)));
        }
    }
}
