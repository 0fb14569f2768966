use crate::{
    connection::{IpmiCommand, LogicalUnit, Message, NetFn, NotEnoughData},
    sensor_event::SensorNumber,
};

use super::{ThresholdMask, Thresholds};

/// Get Sensor Thresholds command.
///
/// Only thresholds that the sensor reports as readable are present in the
/// output.
#[derive(Debug, Clone, Copy)]
pub struct GetSensorThresholds {
    sensor_number: SensorNumber,
    lun: LogicalUnit,
}

impl GetSensorThresholds {
    pub fn new(sensor_number: SensorNumber, lun: LogicalUnit) -> Self {
        Self { sensor_number, lun }
    }
}

impl From<GetSensorThresholds> for Message {
    fn from(value: GetSensorThresholds) -> Self {
        Message::new_request(NetFn::SensorEvent, 0x27, vec![value.sensor_number.get()])
    }
}

impl IpmiCommand for GetSensorThresholds {
    type Output = Thresholds;

    type Error = NotEnoughData;

    /// Response data format:
    /// - Byte 0: readable threshold mask
    /// - Bytes 1-6: lnc, lcr, lnr, unc, ucr, unr
    fn parse_success_response(data: &[u8]) -> Result<Self::Output, Self::Error> {
        if data.len() < 7 {
            return Err(NotEnoughData);
        }

        let readable = ThresholdMask::from_bits_truncate(data[0]);
        let mut values = [0u8; 6];
        values.copy_from_slice(&data[1..7]);

        Ok(Thresholds::from_wire(readable, &values))
    }

    fn lun(&self) -> LogicalUnit {
        self.lun
    }
}
