use crate::connection::{LogicalUnit, NetFn};

use super::Message;

/// An IPMI request message.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    lun: LogicalUnit,
    message: Message,
}

impl Request {
    /// Create a new IPMI request message, targeting `lun` on the BMC.
    ///
    /// The netfn for `message` should be of the `request` variant, see [`Message::new_request`].
    pub const fn new(message: Message, lun: LogicalUnit) -> Self {
        Self { lun, message }
    }

    /// Get the netfn for the request.
    pub fn netfn(&self) -> NetFn {
        self.message.netfn()
    }

    /// Get the raw value of the netfn for the request.
    pub fn netfn_raw(&self) -> u8 {
        self.message.netfn_raw()
    }

    /// Get the command value for the request.
    pub fn cmd(&self) -> u8 {
        self.message.cmd()
    }

    /// Get a shared reference to the data of the request (does not include netfn or command).
    pub fn data(&self) -> &[u8] {
        self.message.data()
    }

    /// Get a mutable reference to the data of the request (does not include netfn or command).
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.message.data_mut()
    }

    /// The logical unit this request is addressed to.
    pub fn lun(&self) -> LogicalUnit {
        self.lun
    }
}
