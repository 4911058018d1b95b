//! The narrow interfaces towards the external collaborators and the keypad
//! latch state owned by the machine.
use crate::{definitions::keyboard, framebuffer::Framebuffer};

/// The trait responsible for the display based code.
///
/// The engine never talks to a rendering backend itself, it only mutates the
/// framebuffer. The driver hands the framebuffer to this collaborator after
/// every draw or clear instruction.
#[cfg_attr(test, mockall::automock)]
pub trait DisplayCommands {
    /// Will present the given framebuffer.
    fn draw(&mut self, framebuffer: &Framebuffer);
}

/// A single key state change as produced by the external input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// the key index `0x0-0xF`
    pub key: usize,
    /// `true` for key-down, `false` for key-up
    pub pressed: bool,
}

/// The trait responsible for sourcing the keyboard data.
///
/// The collaborator maps a physical keyboard onto the `16` chip keys, the
/// engine only ever sees the key indexes.
#[cfg_attr(test, mockall::automock)]
pub trait KeyboardCommands {
    /// Will return the next pending key event, if any.
    fn poll_key(&mut self) -> Option<KeyEvent>;
}

/// The internal keyboard latch.
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The
/// external input collaborator sets a key on key-down and clears it again on
/// key-up; the skip instructions read the latch non-blockingly.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; keyboard::SIZE],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    /// Will set the value of the given key.
    pub fn set_key(&mut self, key: usize, to: bool) {
        debug_assert!(key < keyboard::SIZE);
        self.keys[key] = to;
    }

    /// Will check if the given key is currently held down.
    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys[key]
    }

    /// Will return the full latch state.
    pub fn get_keys(&self) -> &[bool] {
        &self.keys
    }
}
