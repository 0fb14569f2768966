//! Lists the device SDRs of a simulated management controller.
//!
//! The controller only returns `--max-response` bytes of record data per
//! response, and cancels the repository reservation every
//! `--cancel-every` reads, so that chunking and reservation recovery can
//! be observed with `RUST_LOG=debug`.

use std::{io::ErrorKind, path::PathBuf, time::Duration};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ipmi_sdr::{
    connection::{IpmiConnection, NetFn, Request, Response},
    storage::sdr::{Record, RecordId},
    Ipmi, LogOutput, SdrConfig,
};

#[derive(Parser)]
struct CliOpts {
    /// A file with one hex-encoded record per line. A few built-in
    /// records are used if omitted.
    #[clap(long, short)]
    records: Option<PathBuf>,
    /// The most record bytes the controller returns per response
    #[clap(default_value = "10", long)]
    max_response: usize,
    /// Cancel the reservation after this many reads (0 to never cancel)
    #[clap(default_value = "0", long)]
    cancel_every: usize,
    /// The base delay between retries, in milliseconds
    #[clap(default_value = "100", long)]
    retry_delay_ms: u64,
}

const BUILTIN_RECORDS: &[&str] = &[
    "010051012b010e1b2835424f5c697683909daab7c4d1deebf805121f2c394653606d7a8794a1aebbc8d5e2effc091623",
    "020051021b020f1c293643505d6a7784919eabb8c5d2dfecf90613202d3a4754",
    "030051110b03101d2a3744515e6b7885",
    "040051c00904111e2b3845525f6c",
];

struct SimulatedController {
    records: Vec<Vec<u8>>,
    max_response: usize,
    cancel_every: usize,
    reservation: u16,
    reads: usize,
}

impl SimulatedController {
    fn get_sdr(&mut self, data: &[u8]) -> Vec<u8> {
        if data.len() < 6 {
            return vec![0xC7];
        }

        self.reads += 1;
        if self.cancel_every != 0 && self.reads % self.cancel_every == 0 {
            self.reservation = self.reservation.wrapping_add(1).max(1);
        }

        let reservation = u16::from_le_bytes([data[0], data[1]]);
        let id = u16::from_le_bytes([data[2], data[3]]);
        let (offset, length) = (data[4] as usize, data[5] as usize);

        if reservation != self.reservation {
            return vec![0xC5];
        }

        let position = if id == 0 {
            Some(0).filter(|_| !self.records.is_empty())
        } else {
            self.records
                .iter()
                .position(|r| u16::from_le_bytes([r[0], r[1]]) == id)
        };

        let Some(position) = position else {
            return vec![0xCB];
        };

        let record = &self.records[position];
        let length = if length == 0xFF {
            record.len().saturating_sub(offset)
        } else {
            length
        };

        if length > self.max_response {
            return vec![0xCA];
        }

        let next = self
            .records
            .get(position + 1)
            .map(|r| u16::from_le_bytes([r[0], r[1]]))
            .unwrap_or(RecordId::LAST.value());

        let end = (offset + length).min(record.len());
        let mut response = vec![0x00];
        response.extend_from_slice(&next.to_le_bytes());
        response.extend_from_slice(&record[offset.min(end)..end]);
        response
    }
}

impl IpmiConnection for SimulatedController {
    type Error = std::io::Error;

    fn send_recv(&mut self, request: &mut Request) -> Result<Response, Self::Error> {
        let data = match (request.netfn(), request.cmd()) {
            (NetFn::SensorEvent, 0x21) => self.get_sdr(request.data()),
            (NetFn::SensorEvent, 0x22) => {
                self.reservation = self.reservation.wrapping_add(1).max(1);
                let [lo, hi] = self.reservation.to_le_bytes();
                vec![0x00, lo, hi]
            }
            _ => vec![0xC1],
        };

        Response::new(request.netfn().response_value(), request.cmd(), data, 0)
            .ok_or_else(|| std::io::Error::new(ErrorKind::Other, "Invalid response"))
    }
}

fn load_records(opts: &CliOpts) -> std::io::Result<Vec<Vec<u8>>> {
    let lines: Vec<String> = match &opts.records {
        Some(path) => std::fs::read_to_string(path)?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(String::from)
            .collect(),
        None => BUILTIN_RECORDS.iter().map(|r| r.to_string()).collect(),
    };

    lines
        .iter()
        .map(|line| {
            let record = hex::decode(line)
                .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;

            if record.len() < 5 {
                return Err(std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("Record too short: {line}"),
                ));
            }

            Ok(record)
        })
        .collect()
}

fn main() -> std::io::Result<()> {
    pretty_env_logger::formatted_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or("info".to_string()))
        .init();

    let opts = CliOpts::parse();
    let records = load_records(&opts)?;
    let record_count = records.len();

    let controller = SimulatedController {
        records,
        max_response: opts.max_response,
        cancel_every: opts.cancel_every,
        reservation: 0,
        reads: 0,
    };

    let config =
        SdrConfig::default().with_retry_delay(Duration::from_millis(opts.retry_delay_ms));
    let mut ipmi = Ipmi::with_config(controller, config);

    let log_output = &LogOutput::LogTarget(log::Level::Info, "sdr_list".into());

    let template = "[{bar:.green/white}] {prefix} ({pos}/{len})";

    let progress_bar = ProgressBar::new(record_count as u64)
        .with_style(
            ProgressStyle::with_template(template)
                .unwrap()
                .progress_chars("#>-"),
        )
        .with_prefix("Loading SDR Records");

    let records: Vec<Record> = ipmi
        .sdrs()
        .map(|v| {
            progress_bar.inc(1);
            v
        })
        .collect::<Result<_, _>>()
        .map_err(|e| std::io::Error::new(ErrorKind::Other, e.to_string()))?;

    progress_bar.finish();

    for record in &records {
        ipmi_sdr::Logger::log(log_output, record);
    }

    log::info!(
        "Read {} records. Final maximum chunk length: {}",
        records.len(),
        ipmi.max_chunk_length()
    );

    Ok(())
}
