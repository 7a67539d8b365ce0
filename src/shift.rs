//! MSB-first 8-bit shift path shared by both bus bindings.

/// Transmit/receive shift register for one byte.
///
/// The transmit side reads the bit under the cursor without moving it; the
/// receive side stores the incoming bit and then moves the cursor down,
/// wrapping from 0 back to 7 once the byte is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftEngine {
    transmit: u8,
    receive: u8,
    cursor: u8,
    wrapped: bool,
}

impl ShiftEngine {
    /// Creates an empty shift engine with the cursor on the MSB.
    pub const fn new() -> Self {
        Self {
            transmit: 0,
            receive: 0,
            cursor: 7,
            wrapped: false,
        }
    }

    /// Stores `byte` as the active transmit byte and rewinds the cursor.
    pub fn load_byte(&mut self, byte: u8) {
        self.transmit = byte;
        self.receive = 0;
        self.cursor = 7;
        self.wrapped = false;
    }

    /// Bit to drive onto the bus for the current cursor position.
    pub const fn on_transmit_phase(&self) -> bool {
        (self.transmit >> self.cursor) & 0x01 != 0
    }

    /// Captures `bit` at the cursor and moves to the next lower bit.
    pub fn on_receive_phase(&mut self, bit: bool) {
        let mask = 1u8 << self.cursor;
        if bit {
            self.receive |= mask;
        } else {
            self.receive &= !mask;
        }

        if self.cursor == 0 {
            self.cursor = 7;
            self.wrapped = true;
        } else {
            self.cursor -= 1;
            self.wrapped = false;
        }
    }

    /// True exactly when the last receive phase completed the byte.
    pub const fn byte_complete(&self) -> bool {
        self.wrapped
    }

    /// Byte assembled by the receive phases so far.
    pub const fn received(&self) -> u8 {
        self.receive
    }

    /// Current bit cursor (7 = MSB).
    pub const fn bit_index(&self) -> u8 {
        self.cursor
    }

    /// Clears both buffers and rewinds the cursor.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ShiftEngine {
    fn default() -> Self {
        Self::new()
    }
}
