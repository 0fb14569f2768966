use std::num::NonZeroU16;

use nonmax::NonMaxU8;

use crate::connection::{IpmiCommand, Message, NetFn, NotEnoughData};

use super::RecordId;

/// Get Device SDR command.
///
/// Reads (part of) a single record from the device SDR repository. Reads
/// that do not start at offset 0 require a reservation ID, see
/// [`ReserveDeviceSdrRepository`](super::ReserveDeviceSdrRepository).
///
/// Records must be walked sequentially: the ID of the next record is only
/// known once the current one has been read. [`Ipmi::sdrs`](crate::Ipmi::sdrs)
/// takes care of this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GetDeviceSdr {
    reservation_id: Option<NonZeroU16>,
    record_id: RecordId,
    offset: u8,
    bytes_to_read: Option<NonMaxU8>,
}

impl GetDeviceSdr {
    pub const CMD: u8 = 0x21;

    /// Read an entire record in one request.
    pub fn new(reservation_id: Option<NonZeroU16>, record_id: RecordId) -> Self {
        Self {
            reservation_id,
            record_id,
            offset: 0,
            bytes_to_read: None,
        }
    }

    /// Read `length` bytes of a record, starting at `offset`.
    ///
    /// A `length` of `0xFF` reads the remainder of the record.
    pub fn partial(
        reservation_id: Option<NonZeroU16>,
        record_id: RecordId,
        offset: u8,
        length: u8,
    ) -> Self {
        Self {
            reservation_id,
            record_id,
            offset,
            bytes_to_read: NonMaxU8::new(length),
        }
    }

    pub fn reservation_id(&self) -> Option<NonZeroU16> {
        self.reservation_id
    }

    pub fn set_reservation_id(&mut self, reservation_id: Option<NonZeroU16>) {
        self.reservation_id = reservation_id;
    }

    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    pub fn offset(&self) -> u8 {
        self.offset
    }

    /// The amount of bytes requested, or `None` if the entire record is requested.
    pub fn bytes_to_read(&self) -> Option<NonMaxU8> {
        self.bytes_to_read
    }
}

impl From<GetDeviceSdr> for Message {
    fn from(value: GetDeviceSdr) -> Self {
        let mut data = vec![0u8; 6];

        data[0..2].copy_from_slice(
            &value
                .reservation_id
                .map(NonZeroU16::get)
                .unwrap_or(0)
                .to_le_bytes(),
        );

        data[2..4].copy_from_slice(&value.record_id.value().to_le_bytes());
        data[4] = value.offset;
        data[5] = value.bytes_to_read.map(|v| v.get()).unwrap_or(0xFF);

        Message::new_request(NetFn::SensorEvent, GetDeviceSdr::CMD, data)
    }
}

impl IpmiCommand for GetDeviceSdr {
    type Output = SdrChunk;

    type Error = NotEnoughData;

    fn parse_success_response(data: &[u8]) -> Result<Self::Output, Self::Error> {
        if data.len() < 2 {
            return Err(NotEnoughData);
        }

        let next_entry = RecordId::new_raw(u16::from_le_bytes([data[0], data[1]]));

        Ok(SdrChunk {
            next_entry,
            data: data[2..].to_vec(),
        })
    }
}

/// A (partial) record as returned by [`GetDeviceSdr`].
#[derive(Debug, Clone, PartialEq)]
pub struct SdrChunk {
    /// The ID of the record following the one that was read.
    pub next_entry: RecordId,
    pub data: Vec<u8>,
}
