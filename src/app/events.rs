//! Outbound application events.
//!
//! The provisioning orchestrator and maintenance operations emit these
//! through the [`EventSink`](super::ports::EventSink) port. Each event's
//! `Display` form is the host-visible AT line, e.g. `+EVT:V=notecard-7.2.2`.

use core::fmt;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The persisted product UID is the placeholder.
    NoProductUid,

    /// Notecard firmware version (`card.version` → `version`).
    Version(String),

    /// Notecard SKU (`card.version` → `sku`).
    Sku(String),

    /// Notecard device identifier (`card.version` → `device`).
    DeviceId(String),

    /// Raw `hub.status` reply.
    HubStatus(String),

    /// Provisioning reached its terminal state.
    ProvisioningFinished { provisioned: bool },
}

impl AppEvent {
    /// Whether the event is part of the host-visible AT telemetry.
    pub fn is_host_visible(&self) -> bool {
        !matches!(self, Self::ProvisioningFinished { .. })
    }
}

impl fmt::Display for AppEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProductUid => write!(f, ":EVT NO PUID"),
            Self::Version(v) => write!(f, "+EVT:V={v}"),
            Self::Sku(sku) => write!(f, "+EVT:T={sku}"),
            Self::DeviceId(id) => write!(f, "+EVT:ID={id}"),
            Self::HubStatus(raw) => write!(f, "+EVT:{raw}"),
            Self::ProvisioningFinished { provisioned: true } => write!(f, "provisioned"),
            Self::ProvisioningFinished { provisioned: false } => write!(f, "provisioning failed"),
        }
    }
}
