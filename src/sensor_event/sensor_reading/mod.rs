mod get;
pub use get::GetSensorReading;

use crate::{fmt::LogItem, log_vec, Loggable};

use super::ThresholdMask;

/// The undecoded response to [`GetSensorReading`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSensorReading {
    reading: u8,
    all_event_messages_disabled: bool,
    scanning_disabled: bool,
    /// Also reported as "reading/state unavailable".
    initial_update_in_progress: bool,
    offset_data_1: Option<u8>,
    offset_data_2: Option<u8>,
}

impl RawSensorReading {
    pub fn raw_reading(&self) -> u8 {
        self.reading
    }

    pub fn initial_update_in_progress(&self) -> bool {
        self.initial_update_in_progress
    }
}

/// A sensor reading together with its assertion states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// The raw reading, or `None` while the controller has not yet
    /// updated the sensor.
    pub reading: Option<u8>,
    /// The assertion states: the first state byte in the low byte, the
    /// second (if present) in the high byte.
    pub states: Option<u16>,
    pub event_messages_enabled: bool,
    pub scanning_enabled: bool,
}

impl SensorReading {
    /// The threshold comparison status, which is what the low byte of the
    /// assertion states holds for threshold-based sensors.
    pub fn threshold_status(&self) -> Option<ThresholdMask> {
        self.states
            .map(|s| ThresholdMask::from_bits_truncate((s & 0xFF) as u8))
    }
}

impl From<&RawSensorReading> for SensorReading {
    fn from(raw: &RawSensorReading) -> Self {
        let reading = if raw.initial_update_in_progress {
            None
        } else {
            Some(raw.reading)
        };

        let states = raw.offset_data_1.map(|states1| {
            let states2 = raw.offset_data_2.unwrap_or(0) as u16;
            (states2 << 8) | states1 as u16
        });

        Self {
            reading,
            states,
            event_messages_enabled: !raw.all_event_messages_disabled,
            scanning_enabled: !raw.scanning_disabled,
        }
    }
}

impl From<RawSensorReading> for SensorReading {
    fn from(raw: RawSensorReading) -> Self {
        (&raw).into()
    }
}

impl Loggable for SensorReading {
    fn as_log(&self) -> Vec<LogItem> {
        let reading = self
            .reading
            .map(|r| format!("0x{r:02X}"))
            .unwrap_or("Unavailable".into());

        let states = self
            .states
            .map(|s| format!("0x{s:04X}"))
            .unwrap_or("None".into());

        log_vec![
            (0, "Sensor reading"),
            (1, "Reading", reading),
            (1, "States", states),
            (1, "Event messages", self.event_messages_enabled),
            (1, "Scanning", self.scanning_enabled),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_states() {
        let raw = RawSensorReading::parse(&[0x42, 0xC0, 0x05, 0x01]).unwrap();
        let reading = SensorReading::from(raw);

        assert_eq!(reading.reading, Some(0x42));
        assert_eq!(reading.states, Some(0x0105));
        assert!(reading.event_messages_enabled);
        assert!(reading.scanning_enabled);
    }

    #[test]
    fn initial_update_hides_reading() {
        let raw = RawSensorReading::parse(&[0x42, 0x20, 0x05]).unwrap();
        assert!(raw.initial_update_in_progress());
        assert_eq!(raw.raw_reading(), 0x42);

        let reading = SensorReading::from(raw);
        assert_eq!(reading.reading, None);
        assert_eq!(reading.states, Some(0x0005));
        assert!(!reading.event_messages_enabled);
        assert!(!reading.scanning_enabled);
    }

    #[test]
    fn no_states() {
        let reading = SensorReading::from(RawSensorReading::parse(&[0x10, 0xC0]).unwrap());
        assert_eq!(reading.states, None);
        assert_eq!(reading.threshold_status(), None);

        assert!(RawSensorReading::parse(&[0x10]).is_none());
    }

    #[test]
    fn threshold_status_from_low_byte() {
        let reading = SensorReading::from(RawSensorReading::parse(&[0x60, 0xC0, 0x18, 0x80]).unwrap());

        assert_eq!(
            reading.threshold_status(),
            Some(ThresholdMask::UPPER_NON_CRITICAL | ThresholdMask::UPPER_CRITICAL)
        );
    }
}
