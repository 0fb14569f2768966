use std::num::NonZeroU16;

use crate::{
    connection::{CompletionErrorCode, IpmiConnection, NetFn, NotEnoughData},
    storage::sdr::{GetDeviceSdr, Record, RecordHeader, RecordId},
    Error, IpmiError,
};

use super::ChunkFetcher;

/// Reads complete records, chunk by chunk.
///
/// The maximum chunk length is owned by the caller and outlives the
/// assembler: once a controller has rejected a chunk length, later
/// records start out with the reduced length as well.
pub struct RecordAssembler<'a, CON> {
    fetcher: ChunkFetcher<'a, CON>,
    max_chunk_length: &'a mut u8,
}

impl<'a, CON> RecordAssembler<'a, CON>
where
    CON: IpmiConnection,
{
    pub fn new(fetcher: ChunkFetcher<'a, CON>, max_chunk_length: &'a mut u8) -> Self {
        Self {
            fetcher,
            max_chunk_length,
        }
    }

    /// Read record `record_id` using `reservation`.
    ///
    /// The record header is read first to learn the length of the record.
    /// The remainder is then read in chunks of at most the current maximum
    /// chunk length. The next record ID of the returned record is the one
    /// reported by the last chunk read.
    pub fn assemble(
        &mut self,
        record_id: RecordId,
        reservation: &mut NonZeroU16,
    ) -> Result<Record, Error<CON::Error>> {
        let header_chunk =
            self.fetcher
                .fetch_chunk(reservation, record_id, 0, RecordHeader::LEN as u8)?;

        let header = RecordHeader::parse(&header_chunk.data)
            .ok_or_else(|| malformed(&header_chunk.data))?;

        // The header tells us the actual ID, which is what the remaining
        // reads must use.
        let record_id = header.id;
        let record_length = header.record_length();

        let mut next_id = header_chunk.next_entry;
        let mut data = header_chunk.data;
        data.truncate(RecordHeader::LEN);

        let max_attempts = self.fetcher.config().assembly_attempts;
        let step = self.fetcher.config().chunk_length_step;
        let mut attempts = 0;

        while data.len() < record_length {
            if attempts == max_attempts || *self.max_chunk_length == 0 {
                return Err(exhausted(attempts));
            }
            attempts += 1;

            let offset = u8::try_from(data.len()).map_err(|_| malformed(&data))?;
            let length = (record_length - data.len()).min(*self.max_chunk_length as usize) as u8;

            log::debug!(
                "Reading record {record_id}: offset {offset}, {length} of {record_length} bytes"
            );

            match self
                .fetcher
                .fetch_chunk(reservation, record_id, offset, length)
            {
                Ok(chunk) => {
                    let received = chunk.data.len().min(length as usize);
                    if received < chunk.data.len() {
                        log::warn!(
                            "Requested {length} bytes of record {record_id}, but received {}. Ignoring the excess.",
                            chunk.data.len()
                        );
                    }

                    data.extend_from_slice(&chunk.data[..received]);
                    next_id = chunk.next_entry;
                }
                Err(IpmiError::Failed {
                    completion_code: CompletionErrorCode::CannotReturnNumOfRequestedBytes,
                    ..
                }) => {
                    *self.max_chunk_length = self.max_chunk_length.saturating_sub(step);

                    log::warn!(
                        "Controller cannot return {length} bytes. Lowering maximum chunk length to {}",
                        self.max_chunk_length
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Record::parse(&data, next_id).ok_or_else(|| malformed(&data))
    }
}

fn malformed<CON>(data: &[u8]) -> Error<CON> {
    IpmiError::Command {
        error: NotEnoughData,
        netfn: NetFn::SensorEvent,
        cmd: GetDeviceSdr::CMD,
        completion_code: None,
        data: data.to_vec(),
    }
}

fn exhausted<CON>(attempts: u8) -> Error<CON> {
    IpmiError::RetriesExhausted {
        netfn: NetFn::SensorEvent,
        cmd: GetDeviceSdr::CMD,
        attempts,
    }
}
