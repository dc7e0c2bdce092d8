//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the `log`
//! facade (the ESP-IDF logger on the device, any backend on the host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::NoProductUid => warn!("BLUES | no product UID saved"),
            AppEvent::ProvisioningFinished { provisioned } => {
                info!("BLUES | provisioning finished, provisioned={}", provisioned);
            }
            other => info!("BLUES | {}", other),
        }
    }
}
