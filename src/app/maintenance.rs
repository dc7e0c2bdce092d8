//! One-shot Notecard maintenance requests, usable outside provisioning.
//!
//! Both operations are best effort: failures are logged and reported as
//! `false`, never propagated, and never retried.

use log::{info, warn};

use crate::error::Result;
use crate::notecard::{Session, Transport};

use super::events::AppEvent;
use super::ports::EventSink;

const HUB_STATUS: &str = "hub.status";

/// Query `hub.status` and forward the raw reply as [`AppEvent::HubStatus`].
pub fn query_status<T: Transport, const N: usize>(
    session: &mut Session<T, N>,
    sink: &mut impl EventSink,
) -> bool {
    match hub_status_payload(session) {
        Ok(raw) => {
            info!("{}: {}", HUB_STATUS, raw);
            sink.emit(&AppEvent::HubStatus(raw));
            true
        }
        Err(e) => {
            warn!("{} request failed: {}", HUB_STATUS, e);
            false
        }
    }
}

/// Drop the Notecard's stored Notehub connection state.
///
/// Destructive on the peripheral: callers must not retry it automatically.
pub fn factory_reset<T: Transport, const N: usize>(session: &mut Session<T, N>) -> bool {
    let result = session.open(HUB_STATUS).and_then(|mut req| {
        req.add_bool("delete", true).add_bool("connected", true);
        req.send()
    });
    match result {
        Ok(()) => {
            info!("{} reset accepted", HUB_STATUS);
            true
        }
        Err(e) => {
            warn!("{} reset request failed: {}", HUB_STATUS, e);
            false
        }
    }
}

fn hub_status_payload<T: Transport, const N: usize>(session: &mut Session<T, N>) -> Result<String> {
    let reply = session.open(HUB_STATUS)?.send_capture()?;
    Ok(reply.as_str().to_owned())
}
