//! Sensor/Event commands.

use nonmax::NonMaxU8;

mod rearm;
pub use rearm::{RearmEvents, RearmSensorEvents};

mod sensor_reading;
pub use sensor_reading::*;

mod thresholds;
pub use thresholds::*;

/// The number of a sensor on its owner.
///
/// Sensor number `0xFF` is reserved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorNumber(pub NonMaxU8);

impl SensorNumber {
    pub fn new(value: NonMaxU8) -> Self {
        Self(value)
    }

    pub fn get(&self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for SensorNumber {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        NonMaxU8::new(value).map(Self).ok_or(())
    }
}

impl core::fmt::Display for SensorNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:02X}", self.get())
    }
}
