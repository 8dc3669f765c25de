//! Status vocabulary shared by the poller and the renderer.
//!
//! A service status arrives as a tagged string: `online`, `offline_<reason>`
//! or `error_<reason>`. The reason suffix is free-form, so everything here
//! classifies by the category token in front of the first `_` and never by
//! exact match on the full string (`online` being the only bare code).

mod key;
mod types;

pub use key::*;
pub use types::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the category token and the reason suffix.
pub const STATUS_SEPARATOR: char = '_';

/// Chart severity of an online sample.
pub const SEVERITY_ONLINE: f64 = 1.0;
/// Chart severity of an error sample.
pub const SEVERITY_ERROR: f64 = 0.5;
/// Chart severity of an offline (or unclassified) sample.
pub const SEVERITY_OFFLINE: f64 = 0.0;

/// Exclusive visual classification of a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Service answered the last check
    Online,
    /// Service could not be reached
    Offline,
    /// Service answered with an error status
    Error,
    /// Not checked yet, or a code this client does not recognize
    Checking,
}

impl Bucket {
    /// Every bucket, in display order.
    pub const ALL: [Bucket; 4] = [
        Bucket::Online,
        Bucket::Offline,
        Bucket::Error,
        Bucket::Checking,
    ];

    /// Class tag applied to the service card.
    pub fn class_name(self) -> &'static str {
        match self {
            Bucket::Online => "status-online",
            Bucket::Offline => "status-offline",
            Bucket::Error => "status-error",
            Bucket::Checking => "status-checking",
        }
    }

    /// Short status text shown next to the service name.
    pub fn label(self) -> &'static str {
        match self {
            Bucket::Online => "Online",
            Bucket::Offline => "Offline",
            Bucket::Error => "Error",
            Bucket::Checking => "Checking",
        }
    }

    /// Bucket for a card class tag, if the tag is one of ours.
    pub fn from_class_name(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.class_name() == class)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns the category token of a raw status string.
fn category(status: &str) -> &str {
    status
        .split_once(STATUS_SEPARATOR)
        .map_or(status, |(head, _)| head)
}

/// Classify a raw status string into its bucket.
///
/// Unknown or empty codes land in [`Bucket::Checking`]; that is not an error.
pub fn classify(status: &str) -> Bucket {
    if status == "online" {
        return Bucket::Online;
    }
    match category(status) {
        "offline" => Bucket::Offline,
        "error" => Bucket::Error,
        _ => Bucket::Checking,
    }
}

/// Numeric severity used to plot a raw status string.
pub fn severity(status: &str) -> f64 {
    match classify(status) {
        Bucket::Online => SEVERITY_ONLINE,
        Bucket::Error => SEVERITY_ERROR,
        Bucket::Offline | Bucket::Checking => SEVERITY_OFFLINE,
    }
}

/// A status code as produced by the status-check backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(String);

impl StatusCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bucket(&self) -> Bucket {
        classify(&self.0)
    }

    pub fn severity(&self) -> f64 {
        severity(&self.0)
    }

    /// Reason suffix after the category token (`timeout` for `offline_timeout`).
    pub fn reason(&self) -> Option<&str> {
        self.0
            .split_once(STATUS_SEPARATOR)
            .map(|(_, reason)| reason)
            .filter(|reason| !reason.is_empty())
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StatusCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for StatusCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}
