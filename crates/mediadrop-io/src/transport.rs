//! Upload transport over `XMLHttpRequest`.
//!
//! `fetch` has no upload progress events, so uploads go through XHR:
//! files are appended to a `FormData` body as `files` parts, progress is
//! read from `xhr.upload.onprogress`, and the JSON response array is
//! parsed into [`UploadResponse`]s once `loadend` fires.
//!
//! The transport never retries and sets no timeout; both belong to the
//! upload service.
//!
//! Everything except the pure parsing helpers requires a browser
//! environment (`wasm32-unknown-unknown` target).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mediadrop_core::{UploadError, UploadResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{BlobPropertyBag, ProgressEvent, XmlHttpRequest, XmlHttpRequestUpload};

/// Default mount point of the upload service on the host origin.
pub const DEFAULT_BASE_URL: &str = "/api/uploadthing";

/// Name of the multipart field each file is sent under.
const FILE_FIELD: &str = "files";

/// Errors raised by browser APIs while setting up or reading an upload.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for TransportError {
    fn from(value: JsValue) -> Self {
        Self::JsError(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<TransportError> for UploadError {
    fn from(value: TransportError) -> Self {
        Self::Network(value.to_string())
    }
}

/// Where the upload service lives. Provided to the widgets through
/// Dioxus context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadService {
    base_url: String,
}

impl Default for UploadService {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// A file read into memory, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    /// File name sent with the multipart part.
    pub name: String,
    /// MIME type for the part, if the browser reported one.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadService {
    /// A service rooted at `base_url` (absolute or origin-relative).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// The configured base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of a named endpoint.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Start uploading `files` to `endpoint`.
    ///
    /// `on_progress` receives whole percentages as the browser reports
    /// them. Await [`InFlightUpload::finish`] for the result.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::JsError`] if the request cannot be
    /// built or sent.
    pub fn start(
        &self,
        endpoint: &str,
        files: &[PendingFile],
        mut on_progress: impl FnMut(u8) + 'static,
    ) -> Result<InFlightUpload, TransportError> {
        let url = self.endpoint_url(endpoint);
        let form = web_sys::FormData::new()?;
        for file in files {
            let parts = js_sys::Array::new();
            parts.push(&js_sys::Uint8Array::from(file.bytes.as_slice()));
            let opts = BlobPropertyBag::new();
            if let Some(ref mime) = file.content_type {
                opts.set_type(mime);
            }
            let blob = web_sys::Blob::new_with_buffer_source_sequence_and_options(&parts, &opts)?;
            form.append_with_blob_and_filename(FILE_FIELD, &blob, &file.name)?;
        }

        let xhr = XmlHttpRequest::new()?;
        xhr.open_with_async("POST", &url, true)?;
        let upload = xhr.upload()?;

        let on_progress = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
            if event.length_computable()
                && let Some(pct) = percent(event.loaded(), event.total())
            {
                on_progress(pct);
            }
        });
        upload.set_onprogress(Some(on_progress.as_ref().unchecked_ref()));

        let (promise, resolve) = new_promise()?;
        let on_load_end = Closure::<dyn FnMut(ProgressEvent)>::new(move |_: ProgressEvent| {
            let _ = resolve.call0(&JsValue::NULL);
        });
        xhr.set_onloadend(Some(on_load_end.as_ref().unchecked_ref()));

        xhr.send_with_opt_form_data(Some(&form))?;

        Ok(InFlightUpload {
            xhr,
            upload,
            promise,
            aborted: Rc::new(Cell::new(false)),
            _on_progress: on_progress,
            _on_load_end: on_load_end,
        })
    }
}

/// An upload that has been sent and not yet finished.
///
/// Keeps the XHR event closures alive until it is dropped. Dropping it
/// before the request ends (for example when the awaiting task is
/// cancelled) detaches the closures and aborts the request.
pub struct InFlightUpload {
    xhr: XmlHttpRequest,
    upload: XmlHttpRequestUpload,
    promise: js_sys::Promise,
    aborted: Rc<Cell<bool>>,
    _on_progress: Closure<dyn FnMut(ProgressEvent)>,
    _on_load_end: Closure<dyn FnMut(ProgressEvent)>,
}

impl InFlightUpload {
    /// A handle that can abort this upload from elsewhere.
    #[must_use]
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            xhr: self.xhr.clone(),
            aborted: Rc::clone(&self.aborted),
        }
    }

    /// Wait for the request to end and interpret the response.
    ///
    /// # Errors
    ///
    /// - [`UploadError::Aborted`] if [`AbortHandle::abort`] was called.
    /// - [`UploadError::Network`] if the connection failed.
    /// - [`UploadError::Rejected`] for a non-2xx status.
    /// - [`UploadError::InvalidResponse`] if the body is not a response
    ///   array.
    #[allow(clippy::future_not_send)] // WASM is single-threaded; XHR is !Send
    pub async fn finish(self) -> Result<Vec<UploadResponse>, UploadError> {
        JsFuture::from(self.promise.clone())
            .await
            .map_err(TransportError::from)?;
        if self.aborted.get() {
            return Err(UploadError::Aborted);
        }

        let status = self.xhr.status().map_err(TransportError::from)?;
        let body = self
            .xhr
            .response_text()
            .map_err(TransportError::from)?
            .unwrap_or_default();

        match status {
            0 => Err(UploadError::Network("connection to upload service failed".into())),
            200..=299 => parse_responses(&body),
            _ => {
                let status_text = self.xhr.status_text().unwrap_or_default();
                Err(UploadError::Rejected {
                    status,
                    message: rejection_message(&body, &status_text),
                })
            }
        }
    }
}

impl Drop for InFlightUpload {
    fn drop(&mut self) {
        self.upload.set_onprogress(None);
        self.xhr.set_onloadend(None);
        if is_unfinished(self.xhr.ready_state()) {
            self.aborted.set(true);
            let _ = self.xhr.abort();
        }
    }
}

/// Whether an XHR in `ready_state` may still send or receive.
const fn is_unfinished(ready_state: u16) -> bool {
    ready_state != XmlHttpRequest::DONE && ready_state != XmlHttpRequest::UNSENT
}

/// Aborts an in-flight upload. Cheap to clone.
#[derive(Clone)]
pub struct AbortHandle {
    xhr: XmlHttpRequest,
    aborted: Rc<Cell<bool>>,
}

impl AbortHandle {
    /// Abort the request. The pending [`InFlightUpload::finish`] resolves
    /// to [`UploadError::Aborted`].
    pub fn abort(&self) {
        self.aborted.set(true);
        let _ = self.xhr.abort();
    }
}

/// Whole percentage of `loaded` over `total`, clamped to 100.
///
/// `None` when the total is unknown.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percent(loaded: f64, total: f64) -> Option<u8> {
    if !(total.is_finite() && total > 0.0) {
        return None;
    }
    Some((loaded / total * 100.0).round().clamp(0.0, 100.0) as u8)
}

/// Parse a successful response body.
///
/// # Errors
///
/// Returns [`UploadError::InvalidResponse`] if the body is not a JSON
/// array of upload responses.
pub fn parse_responses(body: &str) -> Result<Vec<UploadResponse>, UploadError> {
    serde_json::from_str(body).map_err(|e| UploadError::InvalidResponse(e.to_string()))
}

/// Best message for a rejected upload: the service's `error` or
/// `message` field, else the raw body, else the status text.
#[must_use]
pub fn rejection_message(body: &str, status_text: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "message"]
                .iter()
                .find_map(|key| v.get(key).and_then(serde_json::Value::as_str).map(str::to_owned))
        });
    from_json
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        })
        .unwrap_or_else(|| status_text.to_owned())
}

/// Create a JS Promise along with its resolve function.
fn new_promise() -> Result<(js_sys::Promise, js_sys::Function), TransportError> {
    let resolve = Rc::new(RefCell::new(None::<js_sys::Function>));
    let resolve_clone = Rc::clone(&resolve);

    let promise = js_sys::Promise::new(&mut move |res, _rej| {
        *resolve_clone.borrow_mut() = Some(res);
    });

    let resolve_fn = resolve.borrow_mut().take();
    resolve_fn
        .map(|f| (promise, f))
        .ok_or_else(|| TransportError::JsError("promise resolver not captured".into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_with_single_slash() {
        let service = UploadService::new("https://uploads.example/api/");
        assert_eq!(
            service.endpoint_url("imageUploader"),
            "https://uploads.example/api/imageUploader"
        );
        assert_eq!(
            UploadService::default().endpoint_url("/pdfUploader"),
            "/api/uploadthing/pdfUploader"
        );
    }

    #[test]
    fn percent_handles_unknown_and_overshoot() {
        assert_eq!(percent(50.0, 200.0), Some(25));
        assert_eq!(percent(1.0, 3.0), Some(33));
        assert_eq!(percent(300.0, 200.0), Some(100));
        assert_eq!(percent(10.0, 0.0), None);
        assert_eq!(percent(10.0, f64::NAN), None);
    }

    #[test]
    fn only_open_requests_need_aborting() {
        assert!(is_unfinished(XmlHttpRequest::OPENED));
        assert!(is_unfinished(XmlHttpRequest::HEADERS_RECEIVED));
        assert!(is_unfinished(XmlHttpRequest::LOADING));
        assert!(!is_unfinished(XmlHttpRequest::DONE));
        assert!(!is_unfinished(XmlHttpRequest::UNSENT));
    }

    #[test]
    fn parses_response_array() {
        let body = r#"[{"ufsUrl":"https://u/a.png","name":"a.png","size":12}]"#;
        let parsed = parse_responses(body).unwrap();
        assert_eq!(parsed[0].resolved_url(), Some("https://u/a.png"));
    }

    #[test]
    fn non_array_body_is_invalid_response() {
        assert!(matches!(
            parse_responses(r#"{"ok":true}"#),
            Err(UploadError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_responses(""),
            Err(UploadError::InvalidResponse(_))
        ));
    }

    #[test]
    fn rejection_message_prefers_service_fields() {
        assert_eq!(
            rejection_message(r#"{"error":"File too large"}"#, "Payload Too Large"),
            "File too large"
        );
        assert_eq!(
            rejection_message(r#"{"message":"Invalid file type"}"#, "Bad Request"),
            "Invalid file type"
        );
        assert_eq!(rejection_message("  nope \n", "Forbidden"), "nope");
        assert_eq!(rejection_message("", "Forbidden"), "Forbidden");
    }
}
