//! Full-duplex serial bus over a sequencer FIFO pair
//!
//! The sequencer clocks one response byte back for every byte it shifts
//! out. [`SerialBus`] keeps at most one of those responses unread: before
//! queueing byte `n + 1` it drains the response to byte `n`, and it drains
//! the final response before returning.
//!
//! ```text
//! push b0
//! pull r0, push b1
//! pull r1, push b2
//! ...
//! pull r(n-1)
//! ```
//!
//! The receive FIFO therefore never holds more than one byte, so no
//! overflow check is needed. A sequencer that stops shifting (no device,
//! stalled clock) leaves the caller blocked in `pull`; there is no timeout.

use core::cell::Cell;
use core::convert::Infallible;

use spritelink_hal::{ConfigError, ShiftFifo, SpiBus, SpiConfig};

/// Serial master over a [`ShiftFifo`]
pub struct SerialBus<F> {
    fifo: F,
    config: SpiConfig,
}

impl<F: ShiftFifo> SerialBus<F> {
    /// Wrap a running sequencer
    ///
    /// Fails with [`ConfigError::UnsupportedPolarity`] for an idle-high
    /// clock and [`ConfigError::InvalidFrequency`] for a zero bit rate.
    pub fn new(fifo: F, config: SpiConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { fifo, config })
    }

    pub fn config(&self) -> &SpiConfig {
        &self.config
    }

    /// Transmit `bytes` MSB first, discarding the responses
    pub fn write(&mut self, bytes: &[u8]) {
        self.exchange(bytes.iter().copied(), |_| {});
    }

    /// Transmit zeros and collect one response per byte of `buf`
    pub fn read(&mut self, buf: &mut [u8]) {
        let mut slots = buf.iter_mut();
        let len = slots.len();
        self.exchange(core::iter::repeat(0).take(len), |response| {
            if let Some(slot) = slots.next() {
                *slot = response;
            }
        });
    }

    /// Transmit `write` and store the responses in `read`
    ///
    /// Transfers `min(read.len(), write.len())` bytes.
    pub fn transfer(&mut self, read: &mut [u8], write: &[u8]) {
        let mut slots = read.iter_mut();
        let len = slots.len().min(write.len());
        self.exchange(write[..len].iter().copied(), |response| {
            if let Some(slot) = slots.next() {
                *slot = response;
            }
        });
    }

    /// Transmit `data` and replace each byte with its response
    pub fn transfer_in_place(&mut self, data: &mut [u8]) {
        // Byte n + 1 is read out before response n is stored
        let cells = Cell::from_mut(data).as_slice_of_cells();
        let mut slots = cells.iter();
        self.exchange(cells.iter().map(Cell::get), |response| {
            if let Some(slot) = slots.next() {
                slot.set(response);
            }
        });
    }

    /// Give the sequencer back
    pub fn release(self) -> F {
        self.fifo
    }

    fn exchange<I, S>(&mut self, bytes: I, mut sink: S)
    where
        I: IntoIterator<Item = u8>,
        S: FnMut(u8),
    {
        let mut bytes = bytes.into_iter();
        let Some(first) = bytes.next() else {
            return;
        };

        self.fifo.push(first);
        for byte in bytes {
            sink(self.fifo.pull());
            self.fifo.push(byte);
        }
        sink(self.fifo.pull());
    }
}

impl<F: ShiftFifo> SpiBus for SerialBus<F> {
    type Error = Infallible;

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        SerialBus::transfer(self, read, write);
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        SerialBus::write(self, data);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        SerialBus::read(self, buf);
        Ok(())
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        SerialBus::transfer_in_place(self, data);
        Ok(())
    }
}
