use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raw numeric value that does not resolve to any registered errcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown errcode value: {0}")]
pub struct UnknownCode(pub i32);

/// Outcome codes carried in the `code` field of every response envelope.
///
/// Non-negative codes mean the request ran to completion; negative codes
/// mean it did not. Failures are sub-ranged by magnitude: -4000..-4999 for
/// problems on the caller's side, -5000..-5999 for problems on ours. A
/// single code describes a single request; composite workflows must track
/// their own aggregate status.
///
/// Callers branch on this value, not on the HTTP status: the standard
/// response path always answers 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum Errcode {
    /// The request completed, but the caller must keep polling until a
    /// terminal code shows up.
    Continue = 2,

    /// A mutating request completed.
    Succeed = 1,

    /// A read request completed.
    Done = 0,

    /// The request was interrupted for an unforeseen reason. Also serves as
    /// the placeholder while no more specific code has been assigned.
    Failed = -1,

    InvalidRequest = -4000,
    MissingParams = -4001,
    InvalidParams = -4002,
    InvalidCertificate = -4003,
    ResourceNotFound = -4004,

    InternalError = -5000,
    NotImplemented = -5001,
    DependenceError = -5002,
    DependenceUnavailable = -5003,
    DependenceTimeout = -5004,
}

/// Organizational grouping of codes. Pure metadata for discoverability;
/// never consulted when mapping a code to behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Generic,
    Client,
    Auth,
    Server,
}

/// Every registered code, in declaration order. Backs value resolution and
/// the registry uniqueness test.
pub const ALL_CODES: [Errcode; 14] = [
    Errcode::Continue,
    Errcode::Succeed,
    Errcode::Done,
    Errcode::Failed,
    Errcode::InvalidRequest,
    Errcode::MissingParams,
    Errcode::InvalidParams,
    Errcode::InvalidCertificate,
    Errcode::ResourceNotFound,
    Errcode::InternalError,
    Errcode::NotImplemented,
    Errcode::DependenceError,
    Errcode::DependenceUnavailable,
    Errcode::DependenceTimeout,
];

impl Errcode {
    /// Human-readable label, used as the default envelope `message`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Continue => "Continue",
            Self::Succeed => "Succeed",
            Self::Done => "Done",
            Self::Failed => "Fail",
            Self::InvalidRequest => "Malformed request body",
            Self::MissingParams => "Missing required parameters",
            Self::InvalidParams => "Invalid parameter value or type",
            Self::InvalidCertificate => "Invalid credentials",
            Self::ResourceNotFound => "Resource not found",
            Self::InternalError => "Internal server error",
            Self::NotImplemented => "Not implemented",
            Self::DependenceError => "Upstream service returned an error",
            Self::DependenceUnavailable => "Upstream service unavailable",
            Self::DependenceTimeout => "Upstream service timed out",
        }
    }

    /// Whether the code is in the "ok" range (at or above [`Errcode::Done`]).
    pub fn ok(&self) -> bool {
        (*self as i32) >= (Errcode::Done as i32)
    }

    /// Classify the code into its organizational namespace.
    pub fn namespace(&self) -> Namespace {
        match self {
            Self::InvalidCertificate => Namespace::Auth,
            code => match *code as i32 {
                v if v >= 0 => Namespace::Generic,
                v if v <= -5000 => Namespace::Server,
                v if v <= -4000 => Namespace::Client,
                _ => Namespace::Generic,
            },
        }
    }
}

impl fmt::Display for Errcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", *self as i32, self.label())
    }
}

impl From<Errcode> for i32 {
    fn from(code: Errcode) -> i32 {
        code as i32
    }
}

impl TryFrom<i32> for Errcode {
    type Error = UnknownCode;

    fn try_from(value: i32) -> Result<Self, UnknownCode> {
        ALL_CODES
            .into_iter()
            .find(|code| *code as i32 == value)
            .ok_or(UnknownCode(value))
    }
}
