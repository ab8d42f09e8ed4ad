//! Scripted network doubles for tests.
//!
//! [`ScriptedTransport`] answers management requests from per-action
//! queues, records every query it receives, and can be told to fail a number
//! of print uploads before accepting one.  [`RecordingWakeSender`] keeps the
//! magic packets it was asked to send.
//!
//! # Usage in tests
//!
//! ```ignore
//! let transport = Arc::new(ScriptedTransport::new());
//! transport.respond("login", r#"{"authenticated": true, "units": 45}"#);
//! transport.fail_uploads(3);
//!
//! // ... drive the client ...
//!
//! assert_eq!(transport.actions(), vec!["register_node", "login"]);
//! assert_eq!(transport.upload_attempts().len(), 4);
//! ```
//!
//! A request with nothing queued for its action gets `{}`.  A request whose
//! action was passed to [`ScriptedTransport::stall`] never completes.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use kiosk_core::MagicPacket;

use crate::application::ports::{
    ApiTransport, PrintUpload, TransportError, TransportErrorKind, WakeError, WakeOnLanSender,
};

type Query = Vec<(String, String)>;

#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<Bytes, TransportError>>>>,
    stalled: Mutex<HashSet<String>>,
    requests: Mutex<Vec<Query>>,
    probe_results: Mutex<VecDeque<Result<(), TransportError>>>,
    probes: Mutex<Vec<String>>,
    upload_failures: AtomicUsize,
    uploads: Mutex<Vec<PrintUpload>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply body for the next request with `action`.
    pub fn respond(&self, action: &str, body: &str) {
        self.push(action, Ok(Bytes::copy_from_slice(body.as_bytes())));
    }

    /// Queues a transport failure for the next request with `action`.
    pub fn fail(&self, action: &str, error: TransportError) {
        self.push(action, Err(error));
    }

    /// Makes every later request with `action` hang forever, like a server
    /// that accepts the connection and never answers.
    pub fn stall(&self, action: &str) {
        self.stalled.lock().unwrap().insert(action.to_string());
    }

    fn push(&self, action: &str, reply: Result<Bytes, TransportError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(action.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Queues the outcome of the next connectivity probe.
    pub fn script_probe(&self, result: Result<(), TransportError>) {
        self.probe_results.lock().unwrap().push_back(result);
    }

    /// Makes the next `n` uploads fail with a connection error.
    pub fn fail_uploads(&self, n: usize) {
        self.upload_failures.store(n, Ordering::SeqCst);
    }

    /// Every query received, in order.
    pub fn requests(&self) -> Vec<Query> {
        self.requests.lock().unwrap().clone()
    }

    /// The `action` item of every query received, in order.
    pub fn actions(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|q| action_of(q).map(str::to_string))
            .collect()
    }

    /// Every upload attempt, failed ones included.
    pub fn upload_attempts(&self) -> Vec<PrintUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

fn action_of(query: &[(String, String)]) -> Option<&str> {
    query
        .iter()
        .find(|(k, _)| k == "action")
        .map(|(_, v)| v.as_str())
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn get(&self, query: &[(String, String)]) -> Result<Bytes, TransportError> {
        self.requests.lock().unwrap().push(query.to_vec());
        let action = action_of(query).unwrap_or_default().to_string();
        let stalled = self.stalled.lock().unwrap().contains(&action);
        if stalled {
            return std::future::pending().await;
        }
        self.responses
            .lock()
            .unwrap()
            .get_mut(&action)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(Bytes::from_static(b"{}")))
    }

    async fn probe(&self, url: &str) -> Result<(), TransportError> {
        self.probes.lock().unwrap().push(url.to_string());
        self.probe_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn upload(&self, upload: &PrintUpload) -> Result<(), TransportError> {
        self.uploads.lock().unwrap().push(upload.clone());
        let should_fail = self
            .upload_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(TransportError::new(
                TransportErrorKind::Connect,
                "connection refused",
            ));
        }
        Ok(())
    }
}

/// Records magic packets instead of sending them.
#[derive(Default)]
pub struct RecordingWakeSender {
    pub sent: Mutex<Vec<(Vec<u8>, String, u16)>>,
}

impl RecordingWakeSender {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WakeOnLanSender for RecordingWakeSender {
    fn send(&self, packet: &MagicPacket, host: &str, port: u16) -> Result<(), WakeError> {
        self.sent
            .lock()
            .unwrap()
            .push((packet.as_bytes().to_vec(), host.to_string(), port));
        Ok(())
    }
}
