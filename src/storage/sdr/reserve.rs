//! Reserve Device SDR Repository Command
//!
//! Reference: IPMI 2.0 Specification, Section 35.4 "Reserve Device SDR Repository Command"

use std::num::NonZeroU16;

use crate::connection::{IpmiCommand, Message, NetFn, NotEnoughData};

/// Reserve Device SDR Repository command.
///
/// The returned reservation ID guards partial reads of device SDRs. It
/// stays valid until the controller cancels it (for instance because the
/// repository changed, or because another party made a new reservation),
/// after which reads fail with
/// [`ReservationCancelledOrInvalidId`](crate::connection::CompletionErrorCode::ReservationCancelledOrInvalidId).
#[derive(Debug, Clone, Copy)]
pub struct ReserveDeviceSdrRepository;

impl IpmiCommand for ReserveDeviceSdrRepository {
    type Output = NonZeroU16;
    type Error = NotEnoughData;

    /// Parse the response which contains the Reservation ID.
    ///
    /// Response data format:
    /// - Byte 0: Reservation ID, LS Byte
    /// - Byte 1: Reservation ID, MS Byte
    fn parse_success_response(data: &[u8]) -> Result<Self::Output, Self::Error> {
        if data.len() < 2 {
            return Err(NotEnoughData);
        }

        let reservation_id = u16::from_le_bytes([data[0], data[1]]);
        // Reservation ID of 0 is not valid
        NonZeroU16::new(reservation_id).ok_or(NotEnoughData)
    }
}

impl From<ReserveDeviceSdrRepository> for Message {
    fn from(_: ReserveDeviceSdrRepository) -> Self {
        Message::new_request(NetFn::SensorEvent, 0x22, Vec::new())
    }
}
