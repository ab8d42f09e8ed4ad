//! Network infrastructure for the kiosk client.
//!
//! - [`HttpTransport`] implements the `ApiTransport` port with `reqwest`:
//!   query-string `GET`s against the management endpoint, bare `GET`s for
//!   connectivity checks, and multipart `POST`s for print uploads.
//! - [`wake::UdpWakeSender`] sends wake-on-LAN magic packets.
//! - [`mock`] holds scripted stand-ins for tests.
//!
//! # Certificates
//!
//! Kiosk servers are frequently deployed on a LAN with self-signed
//! certificates.  The transport therefore accepts any certificate; TLS
//! still encrypts the traffic but does not authenticate the server.
//!
//! # Timeouts
//!
//! Only connection establishment is bounded (10 s).  A request that has
//! connected runs until the server answers or the connection drops.

pub mod mock;
pub mod wake;

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use kiosk_core::protocol::{API_BASE_PATH, PRINT_UPLOAD_PATH};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};

use crate::application::ports::{ApiTransport, PrintUpload, TransportError, TransportErrorKind};

pub use wake::UdpWakeSender;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// `reqwest`-backed transport to the management server.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Builds a transport for `base_url` (`scheme://host[:port]`).
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the HTTP client cannot be initialised
    /// (for example when the TLS backend fails to load).
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.starts_with("https://") {
            warn!("server certificates are not verified");
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("kiosk-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| classify(&e))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn get(&self, query: &[(String, String)]) -> Result<Bytes, TransportError> {
        let url = format!("{}{}", self.base_url, API_BASE_PATH);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| classify(&e))?
            .error_for_status()
            .map_err(|e| classify(&e))?;
        response.bytes().await.map_err(|e| classify(&e))
    }

    async fn probe(&self, url: &str) -> Result<(), TransportError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(&e))?
            .error_for_status()
            .map_err(|e| classify(&e))?;
        Ok(())
    }

    async fn upload(&self, upload: &PrintUpload) -> Result<(), TransportError> {
        let url = format!("{}{}", self.base_url, PRINT_UPLOAD_PATH);
        let len = upload.content.len() as u64;
        let file = Part::stream_with_length(upload.content.clone(), len)
            .file_name(upload.file_name.clone());

        let form = Form::new()
            .text("client_name", upload.client_name.clone())
            .text("username", upload.username.clone())
            .text("printer", upload.printer.clone())
            .part("print_file", file)
            .text("filename", upload.file_name.clone());

        debug!(printer = %upload.printer, file = %upload.file_name, len, "posting print job");
        self.client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| classify(&e))?
            .error_for_status()
            .map_err(|e| classify(&e))?;
        Ok(())
    }
}

// ── Error classification ──────────────────────────────────────────────────────

/// Maps a `reqwest` failure onto a [`TransportErrorKind`] and a readable
/// description that includes the underlying causes.
pub fn classify(err: &reqwest::Error) -> TransportError {
    let description = describe(err);
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        if looks_like_tls(&description) {
            TransportErrorKind::Tls
        } else {
            TransportErrorKind::Connect
        }
    } else if let Some(status) = err.status() {
        TransportErrorKind::HttpStatus(status.as_u16())
    } else if err.is_body() || err.is_decode() {
        TransportErrorKind::Body
    } else {
        TransportErrorKind::Request
    };
    TransportError::new(kind, description)
}

/// The error and its source chain, joined with `": "`.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

fn looks_like_tls(description: &str) -> bool {
    let lower = description.to_ascii_lowercase();
    ["tls", "certificate", "handshake"]
        .iter()
        .any(|marker| lower.contains(marker))
}
