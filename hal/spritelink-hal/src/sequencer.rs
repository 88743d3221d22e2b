//! Instruction sequencer FIFO abstraction
//!
//! A programmable sequencer shifts bytes out of a transmit FIFO and into a
//! receive FIFO on its own clock. The command transport only ever sees
//! this pair of queues.

/// Byte FIFO pair of a running serial sequencer
///
/// Each byte pushed produces exactly one byte in the receive FIFO once it
/// has been shifted. Both calls block: `push` while the transmit FIFO is
/// full, `pull` until a response is available. A `pull` with nothing queued
/// never returns.
pub trait ShiftFifo {
    /// Queue one byte for transmission, most significant bit first
    fn push(&mut self, byte: u8);

    /// Take the oldest response byte
    fn pull(&mut self) -> u8;
}

impl<T: ShiftFifo + ?Sized> ShiftFifo for &mut T {
    fn push(&mut self, byte: u8) {
        (**self).push(byte)
    }

    fn pull(&mut self) -> u8 {
        (**self).pull()
    }
}
