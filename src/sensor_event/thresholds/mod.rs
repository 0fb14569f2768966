mod get;
pub use get::GetSensorThresholds;

mod set;
pub use set::SetSensorThresholds;

use crate::{fmt::LogItem, Loggable};

bitflags::bitflags! {
    /// One bit per threshold.
    ///
    /// This layout is shared by the set mask of Set Sensor Thresholds, the
    /// readable mask of Get Sensor Thresholds and the threshold comparison
    /// status of Get Sensor Reading.
    pub struct ThresholdMask: u8 {
        const LOWER_NON_CRITICAL = 1 << 0;
        const LOWER_CRITICAL = 1 << 1;
        const LOWER_NON_RECOVERABLE = 1 << 2;
        const UPPER_NON_CRITICAL = 1 << 3;
        const UPPER_CRITICAL = 1 << 4;
        const UPPER_NON_RECOVERABLE = 1 << 5;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    UpperNonRecoverable,
    UpperCritical,
    UpperNonCritical,
    LowerNonCritical,
    LowerCritical,
    LowerNonRecoverable,
}

impl Threshold {
    pub const ALL: [Threshold; 6] = [
        Threshold::UpperNonRecoverable,
        Threshold::UpperCritical,
        Threshold::UpperNonCritical,
        Threshold::LowerNonCritical,
        Threshold::LowerCritical,
        Threshold::LowerNonRecoverable,
    ];

    pub fn mask(&self) -> ThresholdMask {
        match self {
            Threshold::UpperNonRecoverable => ThresholdMask::UPPER_NON_RECOVERABLE,
            Threshold::UpperCritical => ThresholdMask::UPPER_CRITICAL,
            Threshold::UpperNonCritical => ThresholdMask::UPPER_NON_CRITICAL,
            Threshold::LowerNonCritical => ThresholdMask::LOWER_NON_CRITICAL,
            Threshold::LowerCritical => ThresholdMask::LOWER_CRITICAL,
            Threshold::LowerNonRecoverable => ThresholdMask::LOWER_NON_RECOVERABLE,
        }
    }

    /// The conventional abbreviation, e.g. `ucr` for upper critical.
    pub fn short_name(&self) -> &'static str {
        match self {
            Threshold::UpperNonRecoverable => "unr",
            Threshold::UpperCritical => "ucr",
            Threshold::UpperNonCritical => "unc",
            Threshold::LowerNonCritical => "lnc",
            Threshold::LowerCritical => "lcr",
            Threshold::LowerNonRecoverable => "lnr",
        }
    }

    /// Position of the value in the threshold bytes of a message.
    ///
    /// Values are ordered like the mask bits, lowest bit first.
    fn wire_index(&self) -> usize {
        self.mask().bits().trailing_zeros() as usize
    }
}

impl core::fmt::Display for Threshold {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Threshold::UpperNonRecoverable => write!(f, "Upper non-recoverable"),
            Threshold::UpperCritical => write!(f, "Upper critical"),
            Threshold::UpperNonCritical => write!(f, "Upper non-critical"),
            Threshold::LowerNonCritical => write!(f, "Lower non-critical"),
            Threshold::LowerCritical => write!(f, "Lower critical"),
            Threshold::LowerNonRecoverable => write!(f, "Lower non-recoverable"),
        }
    }
}

/// Raw threshold values of a sensor.
///
/// A threshold that is `None` is not readable (when read from a sensor), or
/// is left untouched (when written to a sensor).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Thresholds {
    pub upper_non_recoverable: Option<u8>,
    pub upper_critical: Option<u8>,
    pub upper_non_critical: Option<u8>,
    pub lower_non_critical: Option<u8>,
    pub lower_critical: Option<u8>,
    pub lower_non_recoverable: Option<u8>,
}

impl Thresholds {
    pub fn get(&self, threshold: Threshold) -> Option<u8> {
        match threshold {
            Threshold::UpperNonRecoverable => self.upper_non_recoverable,
            Threshold::UpperCritical => self.upper_critical,
            Threshold::UpperNonCritical => self.upper_non_critical,
            Threshold::LowerNonCritical => self.lower_non_critical,
            Threshold::LowerCritical => self.lower_critical,
            Threshold::LowerNonRecoverable => self.lower_non_recoverable,
        }
    }

    pub fn set(&mut self, threshold: Threshold, value: Option<u8>) {
        let slot = match threshold {
            Threshold::UpperNonRecoverable => &mut self.upper_non_recoverable,
            Threshold::UpperCritical => &mut self.upper_critical,
            Threshold::UpperNonCritical => &mut self.upper_non_critical,
            Threshold::LowerNonCritical => &mut self.lower_non_critical,
            Threshold::LowerCritical => &mut self.lower_critical,
            Threshold::LowerNonRecoverable => &mut self.lower_non_recoverable,
        };

        *slot = value;
    }

    /// Builder-style [`Thresholds::set`].
    pub fn with(mut self, threshold: Threshold, value: u8) -> Self {
        self.set(threshold, Some(value));
        self
    }

    /// The thresholds that have a value.
    pub fn mask(&self) -> ThresholdMask {
        self.iter()
            .fold(ThresholdMask::empty(), |mask, (t, _)| mask | t.mask())
    }

    /// The thresholds that have a value, from upper non-recoverable down to
    /// lower non-recoverable.
    pub fn iter(&self) -> impl Iterator<Item = (Threshold, u8)> + '_ {
        Threshold::ALL
            .into_iter()
            .filter_map(move |t| self.get(t).map(|v| (t, v)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode threshold bytes, keeping only the thresholds set in `mask`.
    pub(crate) fn from_wire(mask: ThresholdMask, values: &[u8; 6]) -> Self {
        let mut thresholds = Self::default();

        Threshold::ALL
            .into_iter()
            .filter(|t| mask.contains(t.mask()))
            .for_each(|t| thresholds.set(t, Some(values[t.wire_index()])));

        thresholds
    }

    /// Encode to a mask and threshold bytes. Thresholds without a value
    /// are sent as zero, with their mask bit cleared.
    pub(crate) fn to_wire(&self) -> (ThresholdMask, [u8; 6]) {
        let mut values = [0u8; 6];

        self.iter().for_each(|(t, v)| values[t.wire_index()] = v);

        (self.mask(), values)
    }
}

impl Loggable for Thresholds {
    fn as_log(&self) -> Vec<LogItem> {
        let mut log: Vec<LogItem> = vec![(0, "Sensor thresholds").into()];

        if self.is_empty() {
            log.push((1, "Readable", "None").into());
        }

        self.iter()
            .for_each(|(t, v)| log.push((1, t, format!("0x{v:02X}")).into()));

        log
    }
}
