use crate::{
    connection::{IpmiCommand, LogicalUnit, Message, NetFn, NotEnoughData},
    sensor_event::SensorNumber,
};

use super::RawSensorReading;

impl RawSensorReading {
    pub(crate) fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 2 {
            return None;
        }

        let reading = data[0];

        // Bit indicates that all event messages are enabled => must negate result
        let all_event_messages_disabled = (data[1] & 0x80) != 0x80;

        // Bit indicates that sensor scanning is enabled => must negate result
        let scanning_disabled = (data[1] & 0x40) != 0x40;

        let initial_update_in_progress = (data[1] & 0x20) == 0x20;

        let offset_data_1 = data.get(2).copied();
        let offset_data_2 = data.get(3).copied();

        Some(Self {
            reading,
            all_event_messages_disabled,
            scanning_disabled,
            initial_update_in_progress,
            offset_data_1,
            offset_data_2,
        })
    }
}

/// Get Sensor Reading command.
#[derive(Debug, Clone, Copy)]
pub struct GetSensorReading {
    sensor_number: SensorNumber,
    lun: LogicalUnit,
}

impl GetSensorReading {
    pub fn new(sensor_number: SensorNumber, lun: LogicalUnit) -> Self {
        Self { sensor_number, lun }
    }

    pub fn for_sensor(sensor_number: SensorNumber) -> Self {
        Self::new(sensor_number, LogicalUnit::Zero)
    }
}

impl From<GetSensorReading> for Message {
    fn from(value: GetSensorReading) -> Self {
        Message::new_request(NetFn::SensorEvent, 0x2D, vec![value.sensor_number.get()])
    }
}

impl IpmiCommand for GetSensorReading {
    type Output = RawSensorReading;

    type Error = NotEnoughData;

    fn parse_success_response(data: &[u8]) -> Result<Self::Output, Self::Error> {
        RawSensorReading::parse(data).ok_or(NotEnoughData)
    }

    fn lun(&self) -> LogicalUnit {
        self.lun
    }
}
