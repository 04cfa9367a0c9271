use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a paper through download and extraction.
///
/// `Failed` carries the message of whatever went wrong and stays put until a
/// later run picks the paper up again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperStatus {
    Pending,
    Downloading,
    Downloaded,
    Renaming,
    Renamed,
    Extracting,
    Ready,
    Failed(String),
}

impl PaperStatus {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Position along the happy path. `Failed` sorts after every other state.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Downloading => 1,
            Self::Downloaded => 2,
            Self::Renaming => 3,
            Self::Renamed => 4,
            Self::Extracting => 5,
            Self::Ready => 6,
            Self::Failed(_) => u8::MAX,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Downloading => "Downloading",
            Self::Downloaded => "Downloaded",
            Self::Renaming => "Renaming",
            Self::Renamed => "Renamed",
            Self::Extracting => "Extracting",
            Self::Ready => "Ready",
            Self::Failed(_) => "Failed",
        }
    }
}

impl fmt::Display for PaperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(message) => write!(f, "Failed: {}", message),
            other => f.write_str(other.label()),
        }
    }
}

/// Verification state of a user claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    Pending,
    Checking,
    Verified,
    Rejected,
    Failed(String),
}

impl ClaimStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Checking => "Checking",
            Self::Verified => "Verified",
            Self::Rejected => "Rejected",
            Self::Failed(_) => "Failed",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(message) => write!(f, "Failed: {}", message),
            other => f.write_str(other.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_ranks_after_ready() {
        assert!(PaperStatus::failed("boom").rank() > PaperStatus::Ready.rank());
        assert!(PaperStatus::Downloaded.rank() > PaperStatus::Pending.rank());
    }

    #[test]
    fn failed_status_keeps_its_message() {
        let status = PaperStatus::failed("Download failed");
        assert!(status.is_failed());
        assert_eq!(status.to_string(), "Failed: Download failed");
        assert_eq!(ClaimStatus::Verified.to_string(), "Verified");
    }

    #[test]
    fn statuses_serialize_as_tagged_variants() {
        let json = serde_json::to_value(PaperStatus::failed("timeout")).unwrap();
        assert_eq!(json, serde_json::json!({ "Failed": "timeout" }));
        let json = serde_json::to_value(ClaimStatus::Checking).unwrap();
        assert_eq!(json, serde_json::json!("Checking"));
    }
}
