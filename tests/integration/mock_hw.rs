//! Mock Notecard, settings store and event sink for integration tests.
//!
//! The mock transport decodes every request line it receives so tests can
//! assert on the exact JSON sent, and answers from a per-request script.

use std::collections::HashMap;

use bluesnote::app::events::AppEvent;
use bluesnote::app::ports::{ConfigError, EventSink, SettingsStore};
use bluesnote::config::ProvisioningSettings;
use bluesnote::notecard::{Transport, TransportError};
use serde_json::Value;

// ── MockNotecard ──────────────────────────────────────────────

pub struct MockNotecard {
    open: bool,
    /// Every request received, decoded, in order.
    pub sent: Vec<Value>,
    replies: HashMap<String, String>,
    failures: HashMap<String, TransportError>,
}

#[allow(dead_code)]
impl MockNotecard {
    /// An already-open Notecard that answers `{}` to everything.
    pub fn new() -> Self {
        Self {
            open: true,
            sent: Vec::new(),
            replies: HashMap::new(),
            failures: HashMap::new(),
        }
    }

    pub fn closed() -> Self {
        Self {
            open: false,
            ..Self::new()
        }
    }

    /// Answer `name` with `body` (without terminator).
    pub fn reply(mut self, name: &str, body: &str) -> Self {
        self.replies.insert(name.to_owned(), body.to_owned());
        self
    }

    /// Fail `name` at the transport level.
    pub fn fail(mut self, name: &str, error: TransportError) -> Self {
        self.failures.insert(name.to_owned(), error);
        self
    }

    /// Request names in the order they were sent.
    pub fn names(&self) -> Vec<&str> {
        self.sent
            .iter()
            .filter_map(|r| r.get("req").and_then(Value::as_str))
            .collect()
    }

    /// The first request sent with `name`.
    pub fn request(&self, name: &str) -> Option<&Value> {
        self.sent
            .iter()
            .find(|r| r.get("req").and_then(Value::as_str) == Some(name))
    }

    pub fn count(&self, name: &str) -> usize {
        self.names().iter().filter(|n| **n == name).count()
    }
}

impl Default for MockNotecard {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockNotecard {
    fn open(&mut self) -> Result<(), TransportError> {
        self.open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn exchange(&mut self, request: &[u8], response: &mut [u8]) -> Result<usize, TransportError> {
        if !self.open {
            return Err(TransportError::NotOpen);
        }
        assert_eq!(request.last(), Some(&b'\n'), "request must be newline-terminated");
        let parsed: Value = serde_json::from_slice(request).expect("request is JSON");
        let name = parsed
            .get("req")
            .and_then(Value::as_str)
            .expect("request carries req")
            .to_owned();
        self.sent.push(parsed);

        if let Some(error) = self.failures.get(&name) {
            return Err(*error);
        }

        let mut line = self.replies.get(&name).cloned().unwrap_or_else(|| "{}".into());
        line.push('\n');
        if line.len() > response.len() {
            return Err(TransportError::Overflow);
        }
        response[..line.len()].copy_from_slice(line.as_bytes());
        Ok(line.len())
    }
}

// ── MockStore ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockStore {
    pub settings: Option<ProvisioningSettings>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn empty() -> Self {
        Self { settings: None }
    }

    pub fn with(settings: ProvisioningSettings) -> Self {
        Self {
            settings: Some(settings),
        }
    }
}

impl SettingsStore for MockStore {
    fn load(&self) -> Option<ProvisioningSettings> {
        self.settings.clone()
    }

    fn save(&mut self, settings: &ProvisioningSettings) -> Result<(), ConfigError> {
        self.settings = Some(settings.clone());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, event: &AppEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
