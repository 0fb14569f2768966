use std::time::Duration;

use crate::connection::CompletionErrorCode;

use super::recovery::{default_recovery_table, recovery_for, Recovery};

/// Tuning of device SDR retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct SdrConfig {
    /// The amount of times a single chunk is requested before giving up.
    pub chunk_attempts: u8,
    /// The amount of chunk reads allowed while assembling one record,
    /// including reads that were rejected because they were too long.
    pub assembly_attempts: u8,
    /// The longest chunk requested from a fresh session.
    pub initial_chunk_length: u8,
    /// How much shorter chunks become each time the controller cannot
    /// return the requested amount of bytes.
    pub chunk_length_step: u8,
    /// The base delay between attempts.
    pub retry_delay: Duration,
    /// How failed chunk reads are recovered from.
    pub recovery: Vec<(CompletionErrorCode, Recovery)>,
}

impl Default for SdrConfig {
    fn default() -> Self {
        Self {
            chunk_attempts: 5,
            assembly_attempts: 20,
            initial_chunk_length: 20,
            chunk_length_step: 4,
            retry_delay: Duration::from_millis(100),
            recovery: default_recovery_table(),
        }
    }
}

impl SdrConfig {
    pub fn recovery_for(&self, completion_code: CompletionErrorCode) -> Recovery {
        recovery_for(&self.recovery, completion_code)
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Override the recovery of `completion_code`.
    pub fn with_recovery(mut self, completion_code: CompletionErrorCode, recovery: Recovery) -> Self {
        self.recovery.retain(|(code, _)| *code != completion_code);
        self.recovery.push((completion_code, recovery));
        self
    }
}
