//! Storage commands.
//!
//! Only the device SDR repository is supported.

pub mod sdr;
pub use sdr::RecordId as SdrRecordId;
