#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResponseUnavailableReason {
    Unknown,
    SDRInUpdate,
    DeviceInFwUpdate,
    BMCInitializing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum CompletionErrorCode {
    NodeBusy,
    InvalidCommand,
    InvalidCommandForLun,
    ProcessingTimeout,
    OutOfSpace,
    ReservationCancelledOrInvalidId,
    RequestDataTruncated,
    RequestDataLenInvalid,
    RequestDataLengthLimitExceeded,
    ParameterOutOfRange,
    CannotReturnNumOfRequestedBytes,
    RequestedDatapointNotPresent,
    InvalidDataFieldInRequest,
    CommandIllegalForSensorOrRecord,
    ResponseUnavailable { reason: ResponseUnavailableReason },
    CannotExecuteDuplicateRequest,
    DestinationUnavailable,
    InsufficientPrivilege,
    CannotExecuteCommandInCurrentState,
    SubFunctionDisabled,
    Unspecified,
    Oem(u8),
    CommandSpecific(u8),
    Reserved(u8),
}

impl TryFrom<u8> for CompletionErrorCode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let value = match value {
            0 => return Err(()),
            0xC0 => Self::NodeBusy,
            0xC1 => Self::InvalidCommand,
            0xC2 => Self::InvalidCommandForLun,
            0xC3 => Self::ProcessingTimeout,
            0xC4 => Self::OutOfSpace,
            0xC5 => Self::ReservationCancelledOrInvalidId,
            0xC6 => Self::RequestDataTruncated,
            0xC7 => Self::RequestDataLenInvalid,
            0xC8 => Self::RequestDataLengthLimitExceeded,
            0xC9 => Self::ParameterOutOfRange,
            0xCA => Self::CannotReturnNumOfRequestedBytes,
            0xCB => Self::RequestedDatapointNotPresent,
            0xCC => Self::InvalidDataFieldInRequest,
            0xCD => Self::CommandIllegalForSensorOrRecord,
            0xCE => Self::ResponseUnavailable {
                reason: ResponseUnavailableReason::Unknown,
            },
            0xCF => Self::CannotExecuteDuplicateRequest,
            0xD0 => Self::ResponseUnavailable {
                reason: ResponseUnavailableReason::SDRInUpdate,
            },
            0xD1 => Self::ResponseUnavailable {
                reason: ResponseUnavailableReason::DeviceInFwUpdate,
            },
            0xD2 => Self::ResponseUnavailable {
                reason: ResponseUnavailableReason::BMCInitializing,
            },
            0xD3 => Self::DestinationUnavailable,
            0xD4 => Self::InsufficientPrivilege,
            0xD5 => Self::CannotExecuteCommandInCurrentState,
            0xD6 => Self::SubFunctionDisabled,
            0xFF => Self::Unspecified,
            0x01..=0x7E => Self::Oem(value),
            0x80..=0xBE => Self::CommandSpecific(value),
            v => Self::Reserved(v),
        };

        Ok(value)
    }
}

impl From<CompletionErrorCode> for u8 {
    fn from(value: CompletionErrorCode) -> Self {
        use ResponseUnavailableReason::*;

        match value {
            CompletionErrorCode::NodeBusy => 0xC0,
            CompletionErrorCode::InvalidCommand => 0xC1,
            CompletionErrorCode::InvalidCommandForLun => 0xC2,
            CompletionErrorCode::ProcessingTimeout => 0xC3,
            CompletionErrorCode::OutOfSpace => 0xC4,
            CompletionErrorCode::ReservationCancelledOrInvalidId => 0xC5,
            CompletionErrorCode::RequestDataTruncated => 0xC6,
            CompletionErrorCode::RequestDataLenInvalid => 0xC7,
            CompletionErrorCode::RequestDataLengthLimitExceeded => 0xC8,
            CompletionErrorCode::ParameterOutOfRange => 0xC9,
            CompletionErrorCode::CannotReturnNumOfRequestedBytes => 0xCA,
            CompletionErrorCode::RequestedDatapointNotPresent => 0xCB,
            CompletionErrorCode::InvalidDataFieldInRequest => 0xCC,
            CompletionErrorCode::CommandIllegalForSensorOrRecord => 0xCD,
            CompletionErrorCode::ResponseUnavailable { reason } => match reason {
                Unknown => 0xCE,
                SDRInUpdate => 0xD0,
                DeviceInFwUpdate => 0xD1,
                BMCInitializing => 0xD2,
            },
            CompletionErrorCode::CannotExecuteDuplicateRequest => 0xCF,
            CompletionErrorCode::DestinationUnavailable => 0xD3,
            CompletionErrorCode::InsufficientPrivilege => 0xD4,
            CompletionErrorCode::CannotExecuteCommandInCurrentState => 0xD5,
            CompletionErrorCode::SubFunctionDisabled => 0xD6,
            CompletionErrorCode::Unspecified => 0xFF,
            CompletionErrorCode::Oem(v)
            | CompletionErrorCode::CommandSpecific(v)
            | CompletionErrorCode::Reserved(v) => v,
        }
    }
}

impl CompletionErrorCode {
    /// Whether this completion code is a reserved value or not.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Self::Reserved(_))
    }
}

impl core::fmt::Display for CompletionErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let raw: u8 = (*self).into();
        write!(f, "{self:?} (0x{raw:02X})")
    }
}
