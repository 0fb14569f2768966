use std::{collections::VecDeque, time::Duration};

use crate::{
    connection::{IpmiConnection, NetFn, Request, Response},
    storage::sdr::{GetDeviceSdr, RecordHeader, RecordType},
    Ipmi, SdrConfig,
};

mod sdr;

#[derive(Debug, Clone, PartialEq)]
pub enum MockError {
    Disconnected,
    ScriptEnded,
}

fn respond(request: &Request, data: Vec<u8>) -> Response {
    Response::new(request.netfn().response_value(), request.cmd(), data, 0).unwrap()
}

/// Build the raw bytes of a record with a payload of `payload_len` bytes.
pub fn make_record(id: u16, ty: RecordType, payload_len: u8) -> Vec<u8> {
    let header = RecordHeader {
        id: crate::storage::sdr::RecordId::new_raw(id),
        sdr_version_major: 1,
        sdr_version_minor: 5,
        ty,
        payload_length: payload_len,
    };

    let mut data = header.to_bytes().to_vec();
    data.extend((0..payload_len).map(|i| i.wrapping_mul(7).wrapping_add(id as u8)));
    data
}

/// A controller with a device SDR repository.
///
/// Responses to Get Device SDR never carry more than `max_response`
/// bytes of record data. Larger requests fail with 0xCA.
pub struct Repository {
    records: Vec<(u16, u16, Vec<u8>)>,
    pub max_response: usize,
    pub reservation: u16,
    /// Completion codes returned for the next Get Device SDR requests,
    /// in order. `0x00` answers the request normally.
    pub faults: VecDeque<u8>,
    /// Bytes of garbage appended to every chunk.
    pub excess: usize,
    pub disconnected: bool,
    pub requests: Vec<Request>,
    pub reservations: usize,
}

impl Repository {
    pub fn new(records: Vec<Vec<u8>>) -> Self {
        let ids: Vec<u16> = records
            .iter()
            .map(|r| u16::from_le_bytes([r[0], r[1]]))
            .collect();

        let records = records
            .into_iter()
            .enumerate()
            .map(|(idx, data)| {
                let next = ids.get(idx + 1).copied().unwrap_or(0xFFFF);
                (ids[idx], next, data)
            })
            .collect();

        Self {
            records,
            max_response: 64,
            reservation: 0,
            faults: VecDeque::new(),
            excess: 0,
            disconnected: false,
            requests: Vec::new(),
            reservations: 0,
        }
    }

    pub fn with_next_id(mut self, id: u16, next: u16) -> Self {
        for record in self.records.iter_mut().filter(|(i, _, _)| *i == id) {
            record.1 = next;
        }
        self
    }

    /// The Get Device SDR requests received so far, as
    /// `(reservation, record id, offset, length)`.
    pub fn sdr_reads(&self) -> Vec<(u16, u16, u8, u8)> {
        self.requests
            .iter()
            .filter(|r| r.cmd() == GetDeviceSdr::CMD)
            .map(|r| {
                let d = r.data();
                (
                    u16::from_le_bytes([d[0], d[1]]),
                    u16::from_le_bytes([d[2], d[3]]),
                    d[4],
                    d[5],
                )
            })
            .collect()
    }

    fn get_sdr(&mut self, data: &[u8]) -> Vec<u8> {
        if let Some(fault) = self.faults.pop_front() {
            if fault != 0x00 {
                return vec![fault];
            }
        }

        let reservation = u16::from_le_bytes([data[0], data[1]]);
        let id = u16::from_le_bytes([data[2], data[3]]);
        let (offset, length) = (data[4] as usize, data[5]);

        if reservation != self.reservation {
            return vec![0xC5];
        }

        let record = if id == 0x0000 {
            self.records.first()
        } else {
            self.records.iter().find(|(i, _, _)| *i == id)
        };

        let Some((_, next, bytes)) = record else {
            return vec![0xCB];
        };

        let length = if length == 0xFF {
            bytes.len().saturating_sub(offset)
        } else {
            length as usize
        };

        if length > self.max_response {
            return vec![0xCA];
        }

        let end = (offset + length).min(bytes.len());
        let mut response = vec![0x00];
        response.extend_from_slice(&next.to_le_bytes());
        response.extend_from_slice(&bytes[offset.min(end)..end]);
        response.extend(std::iter::repeat(0xEE).take(self.excess));
        response
    }
}

impl IpmiConnection for Repository {
    type Error = MockError;

    fn send_recv(&mut self, request: &mut Request) -> Result<Response, Self::Error> {
        if self.disconnected {
            return Err(MockError::Disconnected);
        }

        self.requests.push(request.clone());

        let data = match (request.netfn(), request.cmd()) {
            (NetFn::SensorEvent, 0x21) => {
                let data = request.data().to_vec();
                self.get_sdr(&data)
            }
            (NetFn::SensorEvent, 0x22) => {
                self.reservation = self.reservation.wrapping_add(1).max(1);
                self.reservations += 1;
                let [lo, hi] = self.reservation.to_le_bytes();
                vec![0x00, lo, hi]
            }
            _ => vec![0xC1],
        };

        Ok(respond(request, data))
    }
}

/// A connection that answers with a fixed list of responses.
#[derive(Default)]
pub struct Scripted {
    pub responses: VecDeque<Response>,
    pub requests: Vec<Request>,
}

impl Scripted {
    pub fn new(responses: impl IntoIterator<Item = (u8, Vec<u8>)>) -> Self {
        let responses = responses
            .into_iter()
            .map(|(cmd, data)| Response::new(NetFn::SensorEvent.response_value(), cmd, data, 0))
            .map(Option::unwrap)
            .collect();

        Self {
            responses,
            requests: Vec::new(),
        }
    }
}

impl IpmiConnection for Scripted {
    type Error = MockError;

    fn send_recv(&mut self, request: &mut Request) -> Result<Response, Self::Error> {
        self.requests.push(request.clone());
        self.responses.pop_front().ok_or(MockError::ScriptEnded)
    }
}

pub fn config() -> SdrConfig {
    SdrConfig::default().with_retry_delay(Duration::ZERO)
}

pub fn session<CON: IpmiConnection>(connection: CON) -> Ipmi<CON> {
    Ipmi::with_config(connection, config())
}
