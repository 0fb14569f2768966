mod get_sdr;
pub use get_sdr::{GetDeviceSdr, SdrChunk};

mod reserve;
pub use reserve::ReserveDeviceSdrRepository;

pub mod record;
pub use record::{Record, RecordHeader, RecordType};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(u16);

impl RecordId {
    pub const FIRST: Self = Self(0);
    pub const LAST: Self = Self(0xFFFF);

    pub fn new_raw(value: u16) -> Self {
        Self(value)
    }

    pub fn is_first(&self) -> bool {
        self.0 == Self::FIRST.0
    }

    /// Whether this is the end-of-repository marker.
    ///
    /// A record with this ID does not exist, and must never be requested.
    pub fn is_last(&self) -> bool {
        self.0 == Self::LAST.0
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}
