use crate::connection::{CompletionErrorCode, NetFn, NotEnoughData};

#[derive(Clone, Debug, PartialEq)]
pub enum IpmiError<CON, P> {
    /// The response does not answer the request that was sent.
    UnexpectedResponse {
        netfn_sent: NetFn,
        netfn_recvd: NetFn,
        cmd_sent: u8,
        cmd_recvd: u8,
    },
    /// The controller rejected the request with a completion code
    /// that is not retried.
    Failed {
        netfn: NetFn,
        cmd: u8,
        completion_code: CompletionErrorCode,
        data: Vec<u8>,
    },
    /// The response could not be decoded.
    Command {
        error: P,
        netfn: NetFn,
        cmd: u8,
        completion_code: Option<CompletionErrorCode>,
        data: Vec<u8>,
    },
    /// A bounded retry budget ran out before the request succeeded.
    RetriesExhausted { netfn: NetFn, cmd: u8, attempts: u8 },
    Connection(CON),
}

/// The error returned by the operations of [`Ipmi`](crate::Ipmi).
pub type Error<CON> = IpmiError<CON, NotEnoughData>;

impl<CON, P> From<CON> for IpmiError<CON, P> {
    fn from(value: CON) -> Self {
        Self::Connection(value)
    }
}

impl<CON, P> IpmiError<CON, P> {
    /// The completion code the controller rejected the request with, if any.
    pub fn completion_code(&self) -> Option<CompletionErrorCode> {
        match self {
            IpmiError::Failed {
                completion_code, ..
            } => Some(*completion_code),
            IpmiError::Command {
                completion_code, ..
            } => *completion_code,
            _ => None,
        }
    }

    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self, IpmiError::RetriesExhausted { .. })
    }
}

impl<CON, P> core::fmt::Display for IpmiError<CON, P>
where
    CON: core::fmt::Debug,
    P: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IpmiError::UnexpectedResponse {
                netfn_sent,
                netfn_recvd,
                cmd_sent,
                cmd_recvd,
            } => write!(
                f,
                "Unexpected response: sent {netfn_sent} 0x{cmd_sent:02X}, received {netfn_recvd} 0x{cmd_recvd:02X}"
            ),
            IpmiError::Failed {
                netfn,
                cmd,
                completion_code,
                ..
            } => write!(f, "{netfn} 0x{cmd:02X} failed: {completion_code}"),
            IpmiError::Command {
                error, netfn, cmd, ..
            } => write!(f, "Could not decode {netfn} 0x{cmd:02X} response: {error:?}"),
            IpmiError::RetriesExhausted {
                netfn,
                cmd,
                attempts,
            } => write!(
                f,
                "{netfn} 0x{cmd:02X} did not succeed after {attempts} attempts"
            ),
            IpmiError::Connection(e) => write!(f, "Connection error: {e:?}"),
        }
    }
}

impl<CON, P> std::error::Error for IpmiError<CON, P>
where
    CON: core::fmt::Debug,
    P: core::fmt::Debug,
{
}
