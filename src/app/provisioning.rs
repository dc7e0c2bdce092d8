//! Notecard provisioning orchestrator.
//!
//! Runs the fixed startup sequence against the persisted settings:
//!
//! ```text
//!  load settings ──(none)────────────────────────────────┐
//!       │                                                ▼
//!  product UID ─▶ hub.set ─▶ card.location.mode ─▶ card.wireless ─▶ [card.wifi] ─▶ card.version
//!                   ✗            ✗                     ✗              (soft)        (policy)
//!                   └────────────┴─────────────────────┴──▶ ProvisioningFailed
//! ```
//!
//! Steps marked ✗ abort the sequence; the Notecard then keeps its own
//! internal configuration. Nothing is retried.

use log::{info, warn};

use crate::config::{ConnectionMode, ProvisioningOptions, ProvisioningSettings, SimUsage, VersionPolicy};
use crate::error::{Error, Result};
use crate::notecard::{Session, Transport};

use super::events::AppEvent;
use super::ports::{EventSink, SettingsStore};

/// Capacity for each `card.version` field forwarded as an event.
const VERSION_FIELD_LEN: usize = 64;

/// One request of the provisioning sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStep {
    HubSet,
    LocationMode,
    Wireless,
    Wifi,
    Version,
}

impl ProvisioningStep {
    /// Notecard request name issued by this step.
    pub const fn request(self) -> &'static str {
        match self {
            Self::HubSet => "hub.set",
            Self::LocationMode => "card.location.mode",
            Self::Wireless => "card.wireless",
            Self::Wifi => "card.wifi",
            Self::Version => "card.version",
        }
    }
}

/// Terminal state of a provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningOutcome {
    Provisioned,
    ProvisioningFailed { step: ProvisioningStep, error: Error },
}

impl ProvisioningOutcome {
    pub fn is_provisioned(&self) -> bool {
        matches!(self, Self::Provisioned)
    }
}

pub struct Provisioner {
    options: ProvisioningOptions,
}

impl Provisioner {
    pub fn new(options: ProvisioningOptions) -> Self {
        Self { options }
    }

    /// Run the full sequence. Requires exclusive use of the session.
    pub fn run<T: Transport, const N: usize>(
        &self,
        session: &mut Session<T, N>,
        store: &impl SettingsStore,
        sink: &mut impl EventSink,
    ) -> ProvisioningOutcome {
        let mut outcome = match store.load() {
            Some(settings) => {
                info!("Found saved settings, overriding Notecard internal settings");
                match self.configure(session, &settings, sink) {
                    Ok(()) => ProvisioningOutcome::Provisioned,
                    Err((step, error)) => {
                        sink.emit(&AppEvent::ProvisioningFinished { provisioned: false });
                        return ProvisioningOutcome::ProvisioningFailed { step, error };
                    }
                }
            }
            None => {
                info!("No saved settings, keeping Notecard internal settings");
                ProvisioningOutcome::Provisioned
            }
        };

        if let Err(error) = self.query_version(session, sink) {
            warn!("{} request failed: {}", ProvisioningStep::Version.request(), error);
            if self.options.version_policy == VersionPolicy::Required {
                outcome = ProvisioningOutcome::ProvisioningFailed {
                    step: ProvisioningStep::Version,
                    error,
                };
            }
        }

        sink.emit(&AppEvent::ProvisioningFinished {
            provisioned: outcome.is_provisioned(),
        });
        outcome
    }

    fn configure<T: Transport, const N: usize>(
        &self,
        session: &mut Session<T, N>,
        settings: &ProvisioningSettings,
        sink: &mut impl EventSink,
    ) -> core::result::Result<(), (ProvisioningStep, Error)> {
        let product_uid = if settings.has_placeholder_uid() {
            warn!("No product UID saved, using {}", self.options.default_product_uid);
            sink.emit(&AppEvent::NoProductUid);
            self.options.default_product_uid.as_str()
        } else {
            settings.product_uid.as_str()
        };

        mandatory(
            ProvisioningStep::HubSet,
            self.hub_set(session, product_uid, settings.connection),
        )?;
        mandatory(ProvisioningStep::LocationMode, self.location_mode(session))?;
        mandatory(
            ProvisioningStep::Wireless,
            self.wireless(session, settings.sim_usage, &settings.ext_sim_apn),
        )?;

        if self.options.secondary_radio {
            if let Err(e) = self.wifi(session) {
                warn!("{} request failed: {}", ProvisioningStep::Wifi.request(), e);
            }
        }
        Ok(())
    }

    fn hub_set<T: Transport, const N: usize>(
        &self,
        session: &mut Session<T, N>,
        product_uid: &str,
        connection: ConnectionMode,
    ) -> Result<()> {
        info!("Set product UID and connection mode");
        let mut req = session.open(ProvisioningStep::HubSet.request())?;
        req.add_string("product", product_uid)
            .add_string("mode", connection.hub_mode())
            .add_int("seconds", self.options.hub_sync_seconds())
            .add_bool("heartbeat", true);
        req.send()
    }

    fn location_mode<T: Transport, const N: usize>(&self, session: &mut Session<T, N>) -> Result<()> {
        let mut req = session.open(ProvisioningStep::LocationMode.request())?;
        if self.options.location_enabled {
            info!("Set location mode");
            req.add_string("mode", "periodic")
                .add_int("seconds", self.options.location_seconds())
                .add_bool("heartbeat", true);
        } else {
            info!("Stop location mode");
            req.add_string("mode", "off");
        }
        req.send()
    }

    fn wireless<T: Transport, const N: usize>(
        &self,
        session: &mut Session<T, N>,
        sim_usage: SimUsage,
        apn: &str,
    ) -> Result<()> {
        info!("Set APN ({:?})", sim_usage);
        let mut req = session.open(ProvisioningStep::Wireless.request())?;
        req.add_string("mode", "auto")
            .add_string("method", sim_usage.wireless_method());
        if sim_usage.needs_apn() {
            req.add_string("apn", apn);
        }
        req.send()
    }

    /// Placeholder WiFi network with the soft-AP join disabled.
    fn wifi<T: Transport, const N: usize>(&self, session: &mut Session<T, N>) -> Result<()> {
        info!("Set WiFi");
        let mut req = session.open(ProvisioningStep::Wifi.request())?;
        req.add_string("ssid", "-")
            .add_string("password", "-")
            .add_string("name", "RAK-")
            .add_string("org", "RAK-PH")
            .add_bool("start", false);
        req.send()
    }

    fn query_version<T: Transport, const N: usize>(
        &self,
        session: &mut Session<T, N>,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let reply = session
            .open(ProvisioningStep::Version.request())?
            .send_capture()?;

        let fields: [(&str, fn(String) -> AppEvent); 3] = [
            ("version", AppEvent::Version),
            ("sku", AppEvent::Sku),
            ("device", AppEvent::DeviceId),
        ];
        for (name, event) in fields {
            match reply.get_string::<VERSION_FIELD_LEN>(name) {
                Ok(value) => {
                    info!("card.version {}: {}", name, value);
                    sink.emit(&event(value.as_str().to_owned()));
                }
                Err(e) => warn!("card.version {}: {}", name, e),
            }
        }
        Ok(())
    }
}

fn mandatory(
    step: ProvisioningStep,
    result: Result<()>,
) -> core::result::Result<(), (ProvisioningStep, Error)> {
    result.map_err(|error| {
        warn!("{} request failed: {}", step.request(), error);
        (step, error)
    })
}
