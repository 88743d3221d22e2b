//! Clock output abstraction
//!
//! The remote display controller runs from a clock generated by the host.
//! Its reduced-clock mode needs the host to retune that clock at runtime.

/// Square-wave clock source
pub trait ClockOutput {
    /// Error type for clock operations
    type Error;

    /// Start (or retune) the clock at `hz`
    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error>;

    /// Stop the clock, leaving the line low
    fn stop(&mut self);
}
