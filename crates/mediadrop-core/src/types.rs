//! Shared types for upload widgets and the upload service boundary.

use serde::{Deserialize, Serialize};

/// One successfully uploaded asset.
///
/// Owned by the parent form that holds the controlled value. The widget
/// derives these from the value on every render and never persists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Public URL the asset is served from.
    pub url: String,
    /// Original file name, when the upload service reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UploadedFile {
    /// Create a record with a URL and no name.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
        }
    }

    /// Create a record with both URL and name.
    #[must_use]
    pub fn named(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: Some(name.into()),
        }
    }

    /// Name to show in previews: the explicit name, or one derived from
    /// the URL.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| crate::detect::display_name(&self.url))
    }
}

/// One entry of the upload service's response array.
///
/// Field names follow the service's JSON (`ufsUrl`, `url`, `name`,
/// `size`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Preferred delivery URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ufs_url: Option<String>,
    /// Legacy delivery URL, used when `ufs_url` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
}

impl UploadResponse {
    /// The URL to store: `ufs_url` first, then `url`.
    ///
    /// Empty strings count as missing.
    #[must_use]
    pub fn resolved_url(&self) -> Option<&str> {
        self.ufs_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.url.as_deref().filter(|u| !u.is_empty()))
    }

    /// Convert into an [`UploadedFile`].
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidResponse`] if the response carries
    /// neither `ufsUrl` nor `url`.
    pub fn to_uploaded_file(&self) -> Result<UploadedFile, UploadError> {
        let url = self.resolved_url().ok_or_else(|| {
            UploadError::InvalidResponse(format!("response for {:?} has no URL", self.name))
        })?;
        let name = (!self.name.is_empty()).then(|| self.name.clone());
        Ok(UploadedFile {
            url: url.to_owned(),
            name,
        })
    }
}

/// Errors surfaced by an upload attempt.
///
/// Every variant is recoverable only by the user selecting a file
/// again; nothing in this layer retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum UploadError {
    /// The request never reached the service or the connection dropped.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("upload rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// The service answered but the body could not be understood.
    #[error("invalid upload response: {0}")]
    InvalidResponse(String),

    /// A picked file could not be read in the browser.
    #[error("could not read file: {0}")]
    Read(String),

    /// The file does not belong to the category this widget accepts.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// The upload was aborted, usually because the widget unmounted.
    #[error("upload aborted")]
    Aborted,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn response(ufs_url: Option<&str>, url: Option<&str>) -> UploadResponse {
        UploadResponse {
            ufs_url: ufs_url.map(str::to_owned),
            url: url.map(str::to_owned),
            name: "a.png".into(),
            size: 10,
        }
    }

    #[test]
    fn resolved_url_prefers_ufs_url() {
        let r = response(Some("https://ufs/a.png"), Some("https://legacy/a.png"));
        assert_eq!(r.resolved_url(), Some("https://ufs/a.png"));
    }

    #[test]
    fn resolved_url_falls_back_to_url() {
        let r = response(None, Some("https://legacy/a.png"));
        assert_eq!(r.resolved_url(), Some("https://legacy/a.png"));

        let r = response(Some(""), Some("https://legacy/a.png"));
        assert_eq!(r.resolved_url(), Some("https://legacy/a.png"));
    }

    #[test]
    fn missing_url_is_invalid_response() {
        let r = response(None, None);
        assert!(matches!(
            r.to_uploaded_file(),
            Err(UploadError::InvalidResponse(_))
        ));
    }

    #[test]
    fn to_uploaded_file_keeps_name() {
        let file = response(None, Some("https://x/a.png"))
            .to_uploaded_file()
            .unwrap();
        assert_eq!(file, UploadedFile::named("https://x/a.png", "a.png"));
    }

    #[test]
    fn deserializes_service_json() {
        let json = r#"[{"ufsUrl":"https://u/1.mp4","name":"1.mp4","size":2048},
                       {"url":"https://u/2.mp4","name":"2.mp4","size":4096}]"#;
        let parsed: Vec<UploadResponse> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].resolved_url(), Some("https://u/1.mp4"));
        assert_eq!(parsed[1].resolved_url(), Some("https://u/2.mp4"));
        assert_eq!(parsed[1].size, 4096);
    }

    #[test]
    fn display_name_derives_from_url() {
        let file = UploadedFile::new("https://cdn.example/f/report.pdf?sig=1");
        assert_eq!(file.display_name(), "report.pdf");
        let file = UploadedFile::named("https://cdn.example/f/abc", "Quarterly.pdf");
        assert_eq!(file.display_name(), "Quarterly.pdf");
    }
}
