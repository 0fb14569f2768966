use crate::{
    connection::{IpmiCommand, LogicalUnit, Message, NetFn, NotEnoughData},
    sensor_event::SensorNumber,
};

use super::Thresholds;

/// Set Sensor Thresholds command.
///
/// Only thresholds that have a value are marked in the set mask. The
/// controller leaves all other thresholds unchanged.
#[derive(Debug, Clone, Copy)]
pub struct SetSensorThresholds {
    sensor_number: SensorNumber,
    lun: LogicalUnit,
    thresholds: Thresholds,
}

impl SetSensorThresholds {
    pub fn new(sensor_number: SensorNumber, lun: LogicalUnit, thresholds: Thresholds) -> Self {
        Self {
            sensor_number,
            lun,
            thresholds,
        }
    }
}

impl From<SetSensorThresholds> for Message {
    /// Request format:
    /// - Byte 0: sensor number
    /// - Byte 1: set mask
    /// - Bytes 2-7: lnc, lcr, lnr, unc, ucr, unr
    fn from(value: SetSensorThresholds) -> Self {
        let (mask, values) = value.thresholds.to_wire();

        let mut data = Vec::with_capacity(8);
        data.push(value.sensor_number.get());
        data.push(mask.bits());
        data.extend_from_slice(&values);

        Message::new_request(NetFn::SensorEvent, 0x26, data)
    }
}

impl IpmiCommand for SetSensorThresholds {
    type Output = ();

    type Error = NotEnoughData;

    fn parse_success_response(_: &[u8]) -> Result<Self::Output, Self::Error> {
        Ok(())
    }

    fn lun(&self) -> LogicalUnit {
        self.lun
    }
}
