//! Six-cell OTP entry with per-cell focus movement.
//!
//! The buffer only ever holds ASCII digits. Any write containing another
//! character is dropped without touching state, so the UI can forward raw
//! input events unfiltered.

use serde::{Deserialize, Serialize};

/// Number of cells in a one-time code.
pub const OTP_LENGTH: usize = 6;

const LAST_CELL: usize = OTP_LENGTH - 1;

/// Fixed-length digit buffer; each cell is empty or one ASCII digit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpBuffer {
    cells: [Option<char>; OTP_LENGTH],
}

impl OtpBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<char> {
        self.cells.get(index).copied().flatten()
    }

    #[must_use]
    pub fn cells(&self) -> &[Option<char>; OTP_LENGTH] {
        &self.cells
    }

    /// Writes one digit; returns `false` and leaves the buffer alone for
    /// non-digits or an out-of-range index.
    pub fn write(&mut self, index: usize, digit: char) -> bool {
        if !digit.is_ascii_digit() {
            return false;
        }
        match self.cells.get_mut(index) {
            Some(cell) => {
                *cell = Some(digit);
                true
            }
            None => false,
        }
    }

    pub fn clear_cell(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = None;
        }
    }

    pub fn clear(&mut self) {
        self.cells = [None; OTP_LENGTH];
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// The full code, only once every cell holds a digit.
    #[must_use]
    pub fn code(&self) -> Option<String> {
        self.cells.iter().copied().collect()
    }
}

/// Keys with focus semantics; anything else is `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Backspace,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Digit Input Controller: the buffer plus the index of the focused cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitInput {
    buffer: OtpBuffer,
    focus: usize,
}

impl DigitInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn buffer(&self) -> &OtpBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn focused(&self) -> usize {
        self.focus
    }

    /// Applies a raw input event to cell `index`.
    ///
    /// A single digit is written in place and advances focus. Longer input is
    /// treated as a paste: up to six digits are spread from `index`, clipped at
    /// the last cell. Empty input clears the cell. Returns `false` when the
    /// value was rejected.
    pub fn set_digit(&mut self, index: usize, raw: &str) -> bool {
        if index >= OTP_LENGTH || !raw.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }

        let digits: Vec<char> = raw.chars().take(OTP_LENGTH).collect();
        match digits.as_slice() {
            [] => self.buffer.clear_cell(index),
            [digit] => {
                self.buffer.write(index, *digit);
                if index < LAST_CELL {
                    self.focus = index + 1;
                }
            }
            pasted => {
                for (offset, digit) in pasted.iter().enumerate() {
                    if !self.buffer.write(index + offset, *digit) {
                        break;
                    }
                }
                self.focus = (index + pasted.len()).min(LAST_CELL);
            }
        }
        true
    }

    /// Moves focus in response to a key on cell `index`. Never mutates the buffer.
    pub fn handle_key(&mut self, index: usize, key: Key) {
        if index >= OTP_LENGTH {
            return;
        }
        match key {
            Key::Backspace if index > 0 && self.buffer.get(index).is_none() => {
                self.focus = index - 1;
            }
            Key::ArrowLeft if index > 0 => self.focus = index - 1,
            Key::ArrowRight if index < LAST_CELL => self.focus = index + 1,
            _ => {}
        }
    }

    /// Empties every cell and focuses the first one.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.focus = 0;
    }
}

/// Index-addressable registry of UI element handles, one slot per cell.
///
/// The renderer registers a handle per cell and asks the registry which one
/// should hold focus after each transition.
#[derive(Debug)]
pub struct FocusRegistry<H> {
    handles: Vec<Option<H>>,
}

impl<H> Default for FocusRegistry<H> {
    fn default() -> Self {
        Self {
            handles: (0..OTP_LENGTH).map(|_| None).collect(),
        }
    }
}

impl<H> FocusRegistry<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handle` to cell `index`, returning the handle it replaced.
    pub fn register(&mut self, index: usize, handle: H) -> Option<H> {
        self.handles.get_mut(index)?.replace(handle)
    }

    pub fn unregister(&mut self, index: usize) -> Option<H> {
        self.handles.get_mut(index)?.take()
    }

    #[must_use]
    pub fn handle(&self, index: usize) -> Option<&H> {
        self.handles.get(index)?.as_ref()
    }

    /// Handle of the cell the input currently wants focused.
    #[must_use]
    pub fn focus_target(&self, input: &DigitInput) -> Option<&H> {
        self.handle(input.focused())
    }
}
