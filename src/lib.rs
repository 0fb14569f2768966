//! IPMI-SDR: device SDR retrieval and sensor state decoding for IPMI controllers.
//!
//! This library provides command serialization and deserialization (in the
//! [`storage`] and [`sensor_event`] modules), a retrieval engine that reads
//! device SDRs over transports with small response sizes (in the
//! [`repository`] module), and the [`Ipmi`] session that ties these to an
//! [`IpmiConnection`](connection::IpmiConnection).

use std::num::NonZeroU16;

pub mod connection;

mod error;
pub use error::{Error, IpmiError};

pub mod repository;
pub use repository::{SdrConfig, SdrIter};

pub mod sensor_event;

pub mod storage;

#[macro_use]
mod fmt;
#[cfg(test)]
mod tests;

pub use fmt::{LogItem, LogOutput, Loggable, Logger};

use connection::{
    CompletionErrorCode, IpmiCommand, IpmiConnection, LogicalUnit, Message, Request,
};
use repository::{ChunkFetcher, RecordAssembler};
use sensor_event::{
    GetSensorReading, GetSensorThresholds, RearmSensorEvents, SensorNumber, SensorReading,
    SetSensorThresholds, Thresholds,
};
use storage::sdr::{Record, RecordId};

/// A session with a management controller.
///
/// Besides the connection, the session owns the maximum chunk length used
/// for reading device SDRs. It starts at [`SdrConfig::initial_chunk_length`]
/// and only ever decreases, unless [`Ipmi::reset_max_chunk_length`] is called.
pub struct Ipmi<CON> {
    inner: CON,
    config: SdrConfig,
    max_chunk_length: u8,
}

impl<CON> Ipmi<CON> {
    pub fn release(self) -> CON {
        self.inner
    }
}

impl<CON> From<CON> for Ipmi<CON>
where
    CON: IpmiConnection,
{
    fn from(value: CON) -> Self {
        Self::new(value)
    }
}

impl<CON> Ipmi<CON>
where
    CON: IpmiConnection,
{
    pub fn inner_mut(&mut self) -> &mut CON {
        &mut self.inner
    }

    pub fn new(inner: CON) -> Self {
        Self::with_config(inner, SdrConfig::default())
    }

    pub fn with_config(inner: CON, config: SdrConfig) -> Self {
        Self {
            inner,
            max_chunk_length: config.initial_chunk_length,
            config,
        }
    }

    pub fn config(&self) -> &SdrConfig {
        &self.config
    }

    /// The longest chunk that will be requested when reading device SDRs.
    pub fn max_chunk_length(&self) -> u8 {
        self.max_chunk_length
    }

    /// Restore the maximum chunk length to [`SdrConfig::initial_chunk_length`].
    pub fn reset_max_chunk_length(&mut self) {
        self.max_chunk_length = self.config.initial_chunk_length;
    }

    pub fn send_recv<CMD>(
        &mut self,
        request: CMD,
    ) -> Result<CMD::Output, IpmiError<CON::Error, CMD::Error>>
    where
        CMD: IpmiCommand,
    {
        send_recv(&mut self.inner, request)
    }

    /// Obtain a new reservation of the device SDR repository.
    pub fn reserve_device_sdr_repository(&mut self) -> Result<NonZeroU16, Error<CON::Error>> {
        repository::reserve(&mut self.inner)
    }

    /// Read the complete device SDR `record_id`.
    ///
    /// If `reservation_id` is `None`, a new reservation is made first.
    ///
    /// If the reservation is cancelled while reading, a new one is made,
    /// but it is not handed back. Callers that reuse a reservation across
    /// reads should use [`Ipmi::read_device_sdr`] instead.
    pub fn get_device_sdr(
        &mut self,
        record_id: RecordId,
        reservation_id: Option<NonZeroU16>,
    ) -> Result<Record, Error<CON::Error>> {
        let mut reservation = match reservation_id {
            Some(reservation) => reservation,
            None => self.reserve_device_sdr_repository()?,
        };

        self.read_device_sdr(record_id, &mut reservation)
    }

    /// Read the complete device SDR `record_id` using `reservation`.
    ///
    /// If the reservation is cancelled while reading, `reservation` is
    /// replaced by the new reservation.
    pub fn read_device_sdr(
        &mut self,
        record_id: RecordId,
        reservation: &mut NonZeroU16,
    ) -> Result<Record, Error<CON::Error>> {
        let fetcher = ChunkFetcher::new(&mut self.inner, &self.config);
        RecordAssembler::new(fetcher, &mut self.max_chunk_length).assemble(record_id, reservation)
    }

    /// Iterate over all records in the device SDR repository.
    pub fn sdrs(&mut self) -> SdrIter<'_, CON> {
        SdrIter::new(self)
    }

    /// Alias of [`Ipmi::sdrs`].
    pub fn device_sdr_entries(&mut self) -> SdrIter<'_, CON> {
        self.sdrs()
    }

    /// Read all records in the device SDR repository.
    pub fn get_device_sdr_list(&mut self) -> Result<Vec<Record>, Error<CON::Error>> {
        self.sdrs().collect()
    }

    /// Re-arm all events of `sensor_number`.
    pub fn rearm_sensor_events(
        &mut self,
        sensor_number: SensorNumber,
    ) -> Result<(), Error<CON::Error>> {
        self.send_recv(RearmSensorEvents::all(sensor_number))
    }

    pub fn get_sensor_reading(
        &mut self,
        sensor_number: SensorNumber,
        lun: LogicalUnit,
    ) -> Result<SensorReading, Error<CON::Error>> {
        self.send_recv(GetSensorReading::new(sensor_number, lun))
            .map(SensorReading::from)
    }

    /// Write the thresholds of `sensor_number` that have a value.
    pub fn set_sensor_thresholds(
        &mut self,
        sensor_number: SensorNumber,
        lun: LogicalUnit,
        thresholds: Thresholds,
    ) -> Result<(), Error<CON::Error>> {
        self.send_recv(SetSensorThresholds::new(sensor_number, lun, thresholds))
    }

    /// Read the readable thresholds of `sensor_number`.
    pub fn get_sensor_thresholds(
        &mut self,
        sensor_number: SensorNumber,
        lun: LogicalUnit,
    ) -> Result<Thresholds, Error<CON::Error>> {
        self.send_recv(GetSensorThresholds::new(sensor_number, lun))
    }
}

pub(crate) fn send_recv<CON, CMD>(
    inner: &mut CON,
    request: CMD,
) -> Result<CMD::Output, IpmiError<CON::Error, CMD::Error>>
where
    CON: IpmiConnection,
    CMD: IpmiCommand,
{
    let lun = request.lun();
    let message: Message = request.into();
    let (message_netfn, message_cmd) = (message.netfn(), message.cmd());
    let mut request = Request::new(message, lun);

    log::debug!(
        "Sending {message_netfn} 0x{message_cmd:02X} to LUN {}: {:02X?}",
        lun.value(),
        request.data()
    );

    let response = inner.send_recv(&mut request)?;

    log::debug!(
        "Received {} 0x{:02X} (cc 0x{:02X}): {:02X?}",
        response.netfn(),
        response.cmd(),
        response.cc(),
        response.data()
    );

    if response.netfn() != message_netfn || response.cmd() != message_cmd {
        return Err(IpmiError::UnexpectedResponse {
            netfn_sent: message_netfn,
            netfn_recvd: response.netfn(),
            cmd_sent: message_cmd,
            cmd_recvd: response.cmd(),
        });
    }

    if let Ok(completion_code) = CompletionErrorCode::try_from(response.cc()) {
        let error = CMD::handle_completion_code(completion_code, response.data())
            .map(|e| IpmiError::Command {
                error: e,
                netfn: response.netfn(),
                cmd: response.cmd(),
                completion_code: Some(completion_code),
                data: response.data().to_vec(),
            })
            .unwrap_or_else(|| IpmiError::Failed {
                netfn: response.netfn(),
                cmd: response.cmd(),
                completion_code,
                data: response.data().to_vec(),
            });

        return Err(error);
    }

    CMD::parse_success_response(response.data()).map_err(|error| IpmiError::Command {
        error,
        netfn: response.netfn(),
        cmd: response.cmd(),
        completion_code: None,
        data: response.data().to_vec(),
    })
}
