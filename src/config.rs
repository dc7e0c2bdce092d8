//! Configuration for the Notecard client.
//!
//! - [`ProvisioningSettings`]: user settings persisted in NVS (read-only to
//!   the provisioning core).
//! - [`ProvisioningOptions`]: build-time choices resolved once at startup.
//! - [`BusConfig`]: I2C link timing.

use serde::{Deserialize, Serialize};

/// Marker stored with persisted settings; anything else means "not set".
pub const SETTINGS_VALID_MARK: u16 = 0xAA55;

/// Product UID shipped in the default settings. Never valid on Notehub.
pub const PLACEHOLDER_PRODUCT_UID: &str = "com.my-company.my-name:my-project";

/// Any UID starting with this prefix is treated as the placeholder.
pub const PLACEHOLDER_PREFIX: &str = "com.my-company.my-name";

/// Product UID compiled into the firmware (`PRODUCT_UID` at build time).
pub const DEFAULT_PRODUCT_UID: &str = match option_env!("PRODUCT_UID") {
    Some(uid) => uid,
    None => PLACEHOLDER_PRODUCT_UID,
};

/// Notehub connection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionMode {
    /// Modem stays attached (`continuous`).
    Continuous,
    /// Modem attaches for periodic syncs (`minimum`).
    Periodic,
}

impl ConnectionMode {
    /// Value of the `mode` field in `hub.set`.
    pub const fn hub_mode(self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::Periodic => "minimum",
        }
    }
}

/// Which SIM governs network attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimUsage {
    /// Notecard eSIM only.
    InternalOnly,
    /// External SIM only.
    ExternalOnly,
    /// Dual SIM, external preferred.
    ExternalPrimary,
    /// Dual SIM, eSIM preferred.
    ExternalSecondary,
}

impl SimUsage {
    /// Value of the `method` field in `card.wireless`.
    pub const fn wireless_method(self) -> &'static str {
        match self {
            Self::InternalOnly => "primary",
            Self::ExternalOnly => "secondary",
            Self::ExternalPrimary => "dual-secondary-primary",
            Self::ExternalSecondary => "dual-primary-secondary",
        }
    }

    /// Whether `card.wireless` must carry the external APN.
    pub const fn needs_apn(self) -> bool {
        !matches!(self, Self::InternalOnly)
    }
}

/// Persisted Notecard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningSettings {
    /// Must equal [`SETTINGS_VALID_MARK`].
    pub valid_mark: u16,
    /// Notehub product UID.
    pub product_uid: String,
    pub connection: ConnectionMode,
    pub sim_usage: SimUsage,
    /// APN used with an external SIM.
    pub ext_sim_apn: String,
    /// Send data on motion trigger (consumed by the application, not here).
    pub motion_trigger: bool,
}

impl ProvisioningSettings {
    pub fn is_valid(&self) -> bool {
        self.valid_mark == SETTINGS_VALID_MARK
    }

    pub fn has_placeholder_uid(&self) -> bool {
        self.product_uid.starts_with(PLACEHOLDER_PREFIX)
    }
}

impl Default for ProvisioningSettings {
    fn default() -> Self {
        Self {
            valid_mark: SETTINGS_VALID_MARK,
            product_uid: PLACEHOLDER_PRODUCT_UID.to_owned(),
            connection: ConnectionMode::Periodic,
            sim_usage: SimUsage::InternalOnly,
            ext_sim_apn: "internet".to_owned(),
            motion_trigger: true,
        }
    }
}

/// How a failed `card.version` query affects the provisioning outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    /// Log and carry on.
    #[default]
    BestEffort,
    /// Report provisioning as failed.
    Required,
}

/// Build-time provisioning choices, resolved once and passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningOptions {
    /// Periodic GNSS acquisition; `card.location.mode` is `off` otherwise.
    pub location_enabled: bool,
    /// Hardware carries the Notecard WiFi radio (`card.wifi` is sent).
    pub secondary_radio: bool,
    /// Substituted when the persisted UID is the placeholder.
    pub default_product_uid: String,
    /// Application sensor read / send interval (milliseconds).
    pub sensor_read_interval_ms: u32,
    pub version_policy: VersionPolicy,
}

impl ProvisioningOptions {
    /// Options derived from cargo features and the build environment.
    pub fn from_build() -> Self {
        Self {
            location_enabled: cfg!(feature = "location"),
            secondary_radio: cfg!(feature = "secondary-radio"),
            ..Self::default()
        }
    }

    /// `hub.set` sync period: twenty sensor intervals, in seconds.
    pub fn hub_sync_seconds(&self) -> i32 {
        let secs = u64::from(self.sensor_read_interval_ms) * 20 / 1000;
        i32::try_from(secs).unwrap_or(i32::MAX)
    }

    /// `card.location.mode` acquisition period: half a sensor interval, in seconds.
    pub fn location_seconds(&self) -> i32 {
        i32::try_from(self.sensor_read_interval_ms / 2000).unwrap_or(i32::MAX)
    }
}

impl Default for ProvisioningOptions {
    fn default() -> Self {
        Self {
            location_enabled: true,
            secondary_radio: false,
            default_product_uid: DEFAULT_PRODUCT_UID.to_owned(),
            sensor_read_interval_ms: 300_000, // 5 min
            version_policy: VersionPolicy::BestEffort,
        }
    }
}

/// Notecard serial-over-I2C link parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// 7-bit peripheral address.
    pub address: u8,
    /// Bus clock the HAL was configured with (Hz).
    pub clock_hz: u32,
    /// Maximum payload bytes per I2C write / read chunk.
    pub chunk_len: u8,
    /// Pause after each written chunk (ms).
    pub chunk_delay_ms: u32,
    /// Bytes after which the longer segment pause applies.
    pub segment_len: usize,
    /// Pause after each written segment (ms).
    pub segment_delay_ms: u32,
    /// Gap between a read query and the read itself (us).
    pub turnaround_us: u32,
    /// Poll period while waiting for a reply (ms).
    pub poll_interval_ms: u32,
    /// Give up waiting for a complete reply after this long (ms).
    pub timeout_ms: u32,
}

/// Fastest bus clock the Notecard is driven at.
pub const MAX_BUS_CLOCK_HZ: u32 = 100_000;

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            address: 0x17,
            clock_hz: MAX_BUS_CLOCK_HZ,
            chunk_len: 30,
            chunk_delay_ms: 20,
            segment_len: 250,
            segment_delay_ms: 250,
            turnaround_us: 1_000,
            poll_interval_ms: 25,
            timeout_ms: 10_000,
        }
    }
}
