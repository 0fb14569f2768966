use std::num::NonZeroU16;

use crate::{
    connection::IpmiConnection,
    storage::sdr::{Record, RecordId},
    Error, Ipmi,
};

/// An iterator over all records in the device SDR repository.
///
/// A single reservation is made when the first record is requested, and
/// is used (and renewed when cancelled) for the rest of the walk. The
/// iterator ends after the record whose next record ID is
/// [`RecordId::LAST`], or after the first error.
pub struct SdrIter<'ipmi, CON> {
    ipmi: &'ipmi mut Ipmi<CON>,
    reservation: Option<NonZeroU16>,
    next_id: Option<RecordId>,
}

impl<'ipmi, CON> SdrIter<'ipmi, CON> {
    pub(crate) fn new(ipmi: &'ipmi mut Ipmi<CON>) -> Self {
        Self {
            ipmi,
            reservation: None,
            next_id: Some(RecordId::FIRST),
        }
    }

    /// The ID of the record that will be read next, if any.
    pub fn next_id(&self) -> Option<RecordId> {
        self.next_id.filter(|id| !id.is_last())
    }
}

impl<CON> Iterator for SdrIter<'_, CON>
where
    CON: IpmiConnection,
{
    type Item = Result<Record, Error<CON::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        let current_id = self.next_id.take()?;

        if current_id.is_last() {
            return None;
        }

        let mut reservation = match self.reservation {
            Some(reservation) => reservation,
            None => match self.ipmi.reserve_device_sdr_repository() {
                Ok(reservation) => reservation,
                Err(e) => return Some(Err(e)),
            },
        };

        let result = self.ipmi.read_device_sdr(current_id, &mut reservation);
        self.reservation = Some(reservation);

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::error!("Failed to read SDR record {current_id}: {e:?}");
                return Some(Err(e));
            }
        };

        let next_record_id = record.next_id;

        if next_record_id == current_id || next_record_id == record.id() {
            log::error!("Got duplicate SDR record IDs! Stopping iteration.");
        } else {
            self.next_id = Some(next_record_id);
        }

        Some(Ok(record))
    }
}

impl<CON> core::iter::FusedIterator for SdrIter<'_, CON> where CON: IpmiConnection {}
