use crate::connection::{IpmiCommand, LogicalUnit, Message, NetFn, NotEnoughData};

use super::SensorNumber;

/// The events to re-arm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RearmEvents {
    /// Re-arm all event status bits of the sensor.
    All,
    /// Re-arm only the assertion and de-assertion events whose bits are set.
    Selected { assertion: u16, deassertion: u16 },
}

/// Re-arm Sensor Events command.
///
/// Causes the sensor to re-evaluate its event conditions, so that events
/// that are still asserted are generated again.
#[derive(Debug, Clone, Copy)]
pub struct RearmSensorEvents {
    sensor_number: SensorNumber,
    lun: LogicalUnit,
    events: RearmEvents,
}

impl RearmSensorEvents {
    pub fn new(sensor_number: SensorNumber, lun: LogicalUnit, events: RearmEvents) -> Self {
        Self {
            sensor_number,
            lun,
            events,
        }
    }

    /// Re-arm all events of `sensor_number` on LUN 0.
    pub fn all(sensor_number: SensorNumber) -> Self {
        Self::new(sensor_number, LogicalUnit::Zero, RearmEvents::All)
    }
}

impl From<RearmSensorEvents> for Message {
    fn from(value: RearmSensorEvents) -> Self {
        let mut data = vec![value.sensor_number.get()];

        match value.events {
            RearmEvents::All => data.push(0x80),
            RearmEvents::Selected {
                assertion,
                deassertion,
            } => {
                data.push(0x00);
                data.extend_from_slice(&assertion.to_le_bytes());
                data.extend_from_slice(&deassertion.to_le_bytes());
            }
        }

        Message::new_request(NetFn::SensorEvent, 0x2A, data)
    }
}

impl IpmiCommand for RearmSensorEvents {
    type Output = ();

    type Error = NotEnoughData;

    fn parse_success_response(_: &[u8]) -> Result<Self::Output, Self::Error> {
        Ok(())
    }

    fn lun(&self) -> LogicalUnit {
        self.lun
    }
}
