//! Retrieval of device SDRs over a transport that can only return a few
//! bytes per response.
//!
//! A record is read in three layers:
//!
//! * [`ChunkFetcher`] reads a single chunk of a record, retrying on
//!   completion codes that indicate a transient condition and obtaining a
//!   new reservation when the current one has been cancelled.
//! * [`RecordAssembler`] reads the header of a record, and then reads the
//!   rest of the record chunk by chunk. When the controller cannot return
//!   as many bytes as requested, the maximum chunk length is lowered.
//! * [`SdrIter`] walks the repository from [`RecordId::FIRST`] until a
//!   record reports [`RecordId::LAST`] as its successor.
//!
//! [`RecordId::FIRST`]: crate::storage::sdr::RecordId::FIRST
//! [`RecordId::LAST`]: crate::storage::sdr::RecordId::LAST

use std::num::NonZeroU16;

use crate::{
    connection::IpmiConnection, send_recv, storage::sdr::ReserveDeviceSdrRepository, Error,
};

mod config;
pub use config::SdrConfig;

mod recovery;
pub use recovery::{default_recovery_table, Recovery};

mod fetch;
pub use fetch::ChunkFetcher;

mod assemble;
pub use assemble::RecordAssembler;

mod iter;
pub use iter::SdrIter;

/// Obtain a new reservation of the device SDR repository.
///
/// This is not retried: a failed reservation is reported as-is.
pub(crate) fn reserve<CON>(connection: &mut CON) -> Result<NonZeroU16, Error<CON::Error>>
where
    CON: IpmiConnection,
{
    let reservation = send_recv(connection, ReserveDeviceSdrRepository)?;
    log::debug!("Reserved device SDR repository: 0x{:04X}", reservation.get());
    Ok(reservation)
}
