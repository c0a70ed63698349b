//! User-visible notices raised by uploaders.
//!
//! Notices are handed to whatever non-blocking notification channel the
//! host provides (a toast queue in `mediadrop-io`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// How prominently a notice should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Something was skipped but the widget is fine.
    Warning,
    /// An operation failed.
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Notice {
    /// An upload failed and no caller handled the error.
    UploadFailed {
        /// Error text.
        message: String,
    },
    /// A completed batch exceeded the file limit; the excess was dropped.
    CapacityReached {
        /// The widget's file limit.
        max_files: usize,
        /// How many uploaded files were not kept.
        dropped: usize,
    },
}

impl Notice {
    /// Severity used to style the notice.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::UploadFailed { .. } => Severity::Error,
            Self::CapacityReached { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UploadFailed { message } => write!(f, "Upload failed: {message}"),
            Self::CapacityReached { max_files, dropped } => {
                let limit = if *max_files == 1 { "file" } else { "files" };
                let files = if *dropped == 1 { "file was" } else { "files were" };
                write!(
                    f,
                    "Maximum of {max_files} {limit} reached; {dropped} {files} not added"
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_counts_dropped_files() {
        let one = Notice::CapacityReached {
            max_files: 3,
            dropped: 1,
        };
        assert_eq!(
            one.to_string(),
            "Maximum of 3 files reached; 1 file was not added"
        );
        let two = Notice::CapacityReached {
            max_files: 3,
            dropped: 2,
        };
        assert!(two.to_string().ends_with("2 files were not added"));
        assert_eq!(two.severity(), Severity::Warning);
    }

    #[test]
    fn capacity_message_for_single_file_limit() {
        let notice = Notice::CapacityReached {
            max_files: 1,
            dropped: 2,
        };
        assert_eq!(
            notice.to_string(),
            "Maximum of 1 file reached; 2 files were not added"
        );
    }

    #[test]
    fn failure_is_an_error() {
        let notice = Notice::UploadFailed {
            message: "network error: offline".into(),
        };
        assert_eq!(notice.severity(), Severity::Error);
        assert_eq!(notice.to_string(), "Upload failed: network error: offline");
    }
}
