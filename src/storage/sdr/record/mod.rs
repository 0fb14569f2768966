use crate::{log_vec, Loggable};

use super::RecordId;

/// The type of a sensor data record, as found in its header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordType {
    FullSensor,
    CompactSensor,
    EventOnlySensor,
    EntityAssociation,
    DeviceRelativeEntityAssociation,
    GenericDeviceLocator,
    FruDeviceLocator,
    McDeviceLocator,
    McConfirmation,
    BmcMessageChannelInfo,
    Oem,
    Unknown(u8),
}

impl From<u8> for RecordType {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::FullSensor,
            0x02 => Self::CompactSensor,
            0x03 => Self::EventOnlySensor,
            0x08 => Self::EntityAssociation,
            0x09 => Self::DeviceRelativeEntityAssociation,
            0x10 => Self::GenericDeviceLocator,
            0x11 => Self::FruDeviceLocator,
            0x12 => Self::McDeviceLocator,
            0x13 => Self::McConfirmation,
            0x14 => Self::BmcMessageChannelInfo,
            0xC0 => Self::Oem,
            v => Self::Unknown(v),
        }
    }
}

impl From<RecordType> for u8 {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::FullSensor => 0x01,
            RecordType::CompactSensor => 0x02,
            RecordType::EventOnlySensor => 0x03,
            RecordType::EntityAssociation => 0x08,
            RecordType::DeviceRelativeEntityAssociation => 0x09,
            RecordType::GenericDeviceLocator => 0x10,
            RecordType::FruDeviceLocator => 0x11,
            RecordType::McDeviceLocator => 0x12,
            RecordType::McConfirmation => 0x13,
            RecordType::BmcMessageChannelInfo => 0x14,
            RecordType::Oem => 0xC0,
            RecordType::Unknown(v) => v,
        }
    }
}

impl core::fmt::Display for RecordType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RecordType::FullSensor => write!(f, "Full Sensor"),
            RecordType::CompactSensor => write!(f, "Compact Sensor"),
            RecordType::EventOnlySensor => write!(f, "Event-Only Sensor"),
            RecordType::EntityAssociation => write!(f, "Entity Association"),
            RecordType::DeviceRelativeEntityAssociation => {
                write!(f, "Device-relative Entity Association")
            }
            RecordType::GenericDeviceLocator => write!(f, "Generic Device Locator"),
            RecordType::FruDeviceLocator => write!(f, "FRU Device Locator"),
            RecordType::McDeviceLocator => write!(f, "MC Device Locator"),
            RecordType::McConfirmation => write!(f, "MC Confirmation"),
            RecordType::BmcMessageChannelInfo => write!(f, "BMC Message Channel Info"),
            RecordType::Oem => write!(f, "OEM"),
            RecordType::Unknown(v) => write!(f, "Unknown (0x{v:02X})"),
        }
    }
}

/// The fixed 5-byte header that starts every record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordHeader {
    pub id: RecordId,
    pub sdr_version_major: u8,
    pub sdr_version_minor: u8,
    pub ty: RecordType,
    /// The amount of bytes following the header.
    pub payload_length: u8,
}

impl RecordHeader {
    pub const LEN: usize = 5;

    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < Self::LEN {
            return None;
        }

        let id = RecordId::new_raw(u16::from_le_bytes([data[0], data[1]]));
        let sdr_version_minor = (data[2] & 0xF0) >> 4;
        let sdr_version_major = data[2] & 0x0F;
        let ty = data[3].into();
        let payload_length = data[4];

        Some(Self {
            id,
            sdr_version_major,
            sdr_version_minor,
            ty,
            payload_length,
        })
    }

    /// The length of the entire record, header included.
    pub fn record_length(&self) -> usize {
        self.payload_length as usize + Self::LEN
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let [id_lo, id_hi] = self.id.value().to_le_bytes();
        let version = (self.sdr_version_minor << 4) | (self.sdr_version_major & 0x0F);
        [id_lo, id_hi, version, self.ty.into(), self.payload_length]
    }
}

/// A complete sensor data record.
///
/// The payload is kept as-is: its layout depends on [`RecordHeader::ty`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub header: RecordHeader,
    pub payload: Vec<u8>,
    /// The ID of the record that follows this one in the repository.
    pub next_id: RecordId,
}

impl Record {
    /// Parse a record from its raw bytes, header included.
    ///
    /// Returns `None` if `data` is shorter than the length announced by the
    /// header. Trailing bytes beyond that length are ignored.
    pub fn parse(data: &[u8], next_id: RecordId) -> Option<Self> {
        let header = RecordHeader::parse(data)?;
        let payload = data.get(RecordHeader::LEN..header.record_length())?;

        Some(Self {
            header,
            payload: payload.to_vec(),
            next_id,
        })
    }

    pub fn id(&self) -> RecordId {
        self.header.id
    }

    pub fn ty(&self) -> RecordType {
        self.header.ty
    }

    /// Whether this is the last record in the repository.
    pub fn is_last(&self) -> bool {
        self.next_id.is_last()
    }

    /// The raw bytes of this record, header included.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.header.record_length());
        data.extend_from_slice(&self.header.to_bytes());
        data.extend_from_slice(&self.payload);
        data
    }
}

impl Loggable for Record {
    fn as_log(&self) -> Vec<crate::fmt::LogItem> {
        let RecordHeader {
            id,
            sdr_version_major: sdr_v_maj,
            sdr_version_minor: sdr_v_min,
            ty,
            payload_length,
        } = &self.header;

        log_vec![
            (0, format!("SDR Record ({ty})")),
            (1, "Record ID", id),
            (1, "SDR Version", format!("{sdr_v_maj}.{sdr_v_min}")),
            (1, "Payload length", payload_length),
            (1, "Next record ID", self.next_id),
        ]
    }
}
