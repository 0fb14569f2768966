/// A network function, identifying the command set a message belongs to.
///
/// The raw value of a request netfn is always even, and the matching
/// response netfn is the request value plus one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NetFn {
    Chassis,
    Bridge,
    SensorEvent,
    App,
    Firmware,
    Storage,
    Transport,
    Reserved(u8),
}

impl From<u8> for NetFn {
    fn from(value: u8) -> Self {
        match value {
            0x00 | 0x01 => Self::Chassis,
            0x02 | 0x03 => Self::Bridge,
            0x04 | 0x05 => Self::SensorEvent,
            0x06 | 0x07 => Self::App,
            0x08 | 0x09 => Self::Firmware,
            0x0A | 0x0B => Self::Storage,
            0x0C | 0x0D => Self::Transport,
            v => Self::Reserved(v & 0xFE),
        }
    }
}

impl NetFn {
    pub const fn request_value(&self) -> u8 {
        match self {
            NetFn::Chassis => 0x00,
            NetFn::Bridge => 0x02,
            NetFn::SensorEvent => 0x04,
            NetFn::App => 0x06,
            NetFn::Firmware => 0x08,
            NetFn::Storage => 0x0A,
            NetFn::Transport => 0x0C,
            NetFn::Reserved(v) => *v & 0xFE,
        }
    }

    pub const fn response_value(&self) -> u8 {
        self.request_value() | 1
    }

    /// Whether `raw` is the response netfn value of `self`.
    pub fn is_response_value(&self, raw: u8) -> bool {
        self.response_value() == raw
    }
}

impl core::fmt::Display for NetFn {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NetFn::Chassis => write!(f, "Chassis"),
            NetFn::Bridge => write!(f, "Bridge"),
            NetFn::SensorEvent => write!(f, "Sensor/Event"),
            NetFn::App => write!(f, "App"),
            NetFn::Firmware => write!(f, "Firmware"),
            NetFn::Storage => write!(f, "Storage"),
            NetFn::Transport => write!(f, "Transport"),
            NetFn::Reserved(v) => write!(f, "Reserved (0x{v:02X})"),
        }
    }
}
