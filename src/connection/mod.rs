mod completion_code;
pub use completion_code::{CompletionErrorCode, ResponseUnavailableReason};

mod netfn;
pub use netfn::NetFn;

mod request;
pub use request::Request;

mod response;
pub use response::Response;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LogicalUnit {
    Zero,
    One,
    Two,
    Three,
}

impl LogicalUnit {
    /// Construct a `LogicalUnit` from the two lowest bits of `value`,
    /// ignoring all other bits.
    pub fn from_low_bits(value: u8) -> Self {
        let value = value & 0b11;

        match value {
            0b00 => Self::Zero,
            0b01 => Self::One,
            0b10 => Self::Two,
            0b11 => Self::Three,
            _ => unreachable!("Value bitmasked with 0b11 has value greater than 3"),
        }
    }

    pub fn value(&self) -> u8 {
        match self {
            LogicalUnit::Zero => 0,
            LogicalUnit::One => 1,
            LogicalUnit::Two => 2,
            LogicalUnit::Three => 3,
        }
    }
}

impl Default for LogicalUnit {
    fn default() -> Self {
        Self::Zero
    }
}

impl TryFrom<u8> for LogicalUnit {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 0b11 {
            Ok(Self::from_low_bits(value))
        } else {
            Err(())
        }
    }
}

impl From<LogicalUnit> for u8 {
    fn from(value: LogicalUnit) -> Self {
        value.value()
    }
}

/// A request/response transport to a management controller.
///
/// Implementations deliver exactly one request and return the matching
/// response. They do not interpret completion codes, and must not retry
/// on their own: retrying on completion codes is done by the caller.
pub trait IpmiConnection {
    type Error: core::fmt::Debug;

    fn send_recv(&mut self, request: &mut Request) -> Result<Response, Self::Error>;
}

impl<T> IpmiConnection for &mut T
where
    T: IpmiConnection,
{
    type Error = T::Error;

    fn send_recv(&mut self, request: &mut Request) -> Result<Response, Self::Error> {
        (**self).send_recv(request)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    netfn: u8,
    cmd: u8,
    data: Vec<u8>,
}

impl Message {
    pub fn new_request(netfn: NetFn, cmd: u8, data: Vec<u8>) -> Self {
        Self {
            netfn: netfn.request_value(),
            cmd,
            data,
        }
    }

    pub fn new_response(netfn: NetFn, cmd: u8, data: Vec<u8>) -> Self {
        Self {
            netfn: netfn.response_value(),
            cmd,
            data,
        }
    }

    pub fn new_raw(netfn: u8, cmd: u8, data: Vec<u8>) -> Self {
        Self { netfn, cmd, data }
    }

    pub fn netfn(&self) -> NetFn {
        NetFn::from(self.netfn)
    }

    pub fn netfn_raw(&self) -> u8 {
        self.netfn
    }

    pub fn cmd(&self) -> u8 {
        self.cmd
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// The response did not contain enough data to be parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotEnoughData;

impl core::fmt::Display for NotEnoughData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Not enough data")
    }
}

/// A typed IPMI command.
///
/// A command knows how to serialize itself into a [`Message`] and how
/// to parse the data of a successful response.
pub trait IpmiCommand: Into<Message> {
    type Output;
    type Error;

    /// Parse the data of a response whose completion code indicated success.
    fn parse_success_response(data: &[u8]) -> Result<Self::Output, Self::Error>;

    /// Map a non-success completion code to a command-specific error.
    ///
    /// Returning `None` reports the completion code as-is.
    fn handle_completion_code(
        completion_code: CompletionErrorCode,
        data: &[u8],
    ) -> Option<Self::Error> {
        let _ = (completion_code, data);
        None
    }

    /// The logical unit this command is addressed to.
    fn lun(&self) -> LogicalUnit {
        LogicalUnit::Zero
    }
}
