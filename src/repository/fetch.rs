use std::num::NonZeroU16;

use crate::{
    connection::{IpmiConnection, NetFn},
    send_recv,
    storage::sdr::{GetDeviceSdr, RecordId, SdrChunk},
    Error, IpmiError,
};

use super::{Recovery, SdrConfig};

/// Reads single chunks of device SDRs.
pub struct ChunkFetcher<'a, CON> {
    connection: &'a mut CON,
    config: &'a SdrConfig,
}

impl<'a, CON> ChunkFetcher<'a, CON>
where
    CON: IpmiConnection,
{
    pub fn new(connection: &'a mut CON, config: &'a SdrConfig) -> Self {
        Self { connection, config }
    }

    pub fn config(&self) -> &SdrConfig {
        self.config
    }

    /// Obtain a new reservation of the device SDR repository.
    pub fn reserve(&mut self) -> Result<NonZeroU16, Error<CON::Error>> {
        super::reserve(&mut *self.connection)
    }

    /// Read `length` bytes of record `record_id`, starting at `offset`.
    ///
    /// At most [`SdrConfig::chunk_attempts`] requests are sent. Between
    /// attempts, the delay prescribed by the [`Recovery`] for the received
    /// completion code is inserted. If the reservation is cancelled,
    /// `reservation` is replaced by a new one.
    ///
    /// Completion codes that map to [`Recovery::Fail`] are returned
    /// immediately as [`IpmiError::Failed`]. Connection errors are never
    /// retried.
    pub fn fetch_chunk(
        &mut self,
        reservation: &mut NonZeroU16,
        record_id: RecordId,
        offset: u8,
        length: u8,
    ) -> Result<SdrChunk, Error<CON::Error>> {
        let max_attempts = self.config.chunk_attempts;
        let mut request = GetDeviceSdr::partial(Some(*reservation), record_id, offset, length);

        for attempt in 1..=max_attempts {
            let error = match send_recv(&mut *self.connection, request) {
                Ok(chunk) => return Ok(chunk),
                Err(e) => e,
            };

            let completion_code = match &error {
                IpmiError::Failed {
                    completion_code, ..
                } => *completion_code,
                _ => return Err(error),
            };

            let recovery = self.config.recovery_for(completion_code);
            if recovery == Recovery::Fail {
                return Err(error);
            }

            let remaining = max_attempts - attempt;
            if remaining == 0 {
                break;
            }

            if recovery == Recovery::Reserve {
                *reservation = self.reserve()?;
                request.set_reservation_id(Some(*reservation));
            }

            let delay = recovery.delay(self.config.retry_delay, remaining);

            log::warn!(
                "Reading record {record_id} at offset {offset} failed ({completion_code}). Retrying in {delay:?} ({remaining} attempts left)",
            );

            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }

        Err(IpmiError::RetriesExhausted {
            netfn: NetFn::SensorEvent,
            cmd: GetDeviceSdr::CMD,
            attempts: max_attempts,
        })
    }
}
