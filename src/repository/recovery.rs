use std::time::Duration;

use crate::connection::{CompletionErrorCode, ResponseUnavailableReason};

/// What to do when a chunk read fails with a given completion code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recovery {
    /// Wait one delay unit and send the same request again.
    Retry,
    /// Wait one delay unit per remaining attempt and send the same request again.
    Backoff,
    /// Obtain a new reservation, wait one delay unit and send the request
    /// again using the new reservation.
    Reserve,
    /// Report the completion code to the caller.
    Fail,
}

impl Recovery {
    /// The delay before the next attempt, given the base delay unit and the
    /// amount of attempts that are left.
    pub fn delay(&self, unit: Duration, attempts_remaining: u8) -> Duration {
        match self {
            Recovery::Retry | Recovery::Reserve => unit,
            Recovery::Backoff => unit * attempts_remaining as u32,
            Recovery::Fail => Duration::ZERO,
        }
    }
}

/// The completion codes that are recovered from by default.
///
/// Any completion code not in this table maps to [`Recovery::Fail`].
///
/// Only 0xCE is backed off from. The other "response unavailable" codes
/// (SDR update, firmware update, initialization) are reported as-is.
pub fn default_recovery_table() -> Vec<(CompletionErrorCode, Recovery)> {
    vec![
        (CompletionErrorCode::ProcessingTimeout, Recovery::Retry),
        (
            CompletionErrorCode::ReservationCancelledOrInvalidId,
            Recovery::Reserve,
        ),
        (
            CompletionErrorCode::ResponseUnavailable {
                reason: ResponseUnavailableReason::Unknown,
            },
            Recovery::Backoff,
        ),
    ]
}

/// Look up the recovery for `completion_code` in `table`.
pub fn recovery_for(
    table: &[(CompletionErrorCode, Recovery)],
    completion_code: CompletionErrorCode,
) -> Recovery {
    table
        .iter()
        .find(|(code, _)| *code == completion_code)
        .map(|(_, recovery)| *recovery)
        .unwrap_or(Recovery::Fail)
}
