//! Persisted Notecard settings on top of any [`StoragePort`].
//!
//! Settings are a postcard blob under `blues::settings`. A blob that fails
//! to decode or carries the wrong validity marker reads back as "no
//! settings", so the Notecard keeps its own configuration.

use log::{info, warn};

use crate::app::ports::{ConfigError, SettingsStore, StorageError, StoragePort};
use crate::config::{ProvisioningSettings, SETTINGS_VALID_MARK};

const SETTINGS_NAMESPACE: &str = "blues";
const SETTINGS_KEY: &str = "settings";

/// Longest product UID / APN accepted.
const MAX_TEXT_LEN: usize = 255;

/// Upper bound on the encoded blob (two max-length strings plus scalars).
const MAX_BLOB_SIZE: usize = 2 * (MAX_TEXT_LEN + 2) + 16;

pub struct NvsSettingsStore<S: StoragePort> {
    storage: S,
}

impl<S: StoragePort> NvsSettingsStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Forget the stored settings.
    pub fn clear(&mut self) -> Result<(), ConfigError> {
        self.storage.delete(SETTINGS_NAMESPACE, SETTINGS_KEY)?;
        Ok(())
    }
}

fn validate_settings(settings: &ProvisioningSettings) -> Result<(), ConfigError> {
    if settings.valid_mark != SETTINGS_VALID_MARK {
        return Err(ConfigError::ValidationFailed("valid_mark must be 0xAA55"));
    }
    if settings.product_uid.is_empty() || settings.product_uid.len() > MAX_TEXT_LEN {
        return Err(ConfigError::ValidationFailed("product_uid must be 1–255 bytes"));
    }
    if settings.ext_sim_apn.is_empty() || settings.ext_sim_apn.len() > MAX_TEXT_LEN {
        return Err(ConfigError::ValidationFailed("ext_sim_apn must be 1–255 bytes"));
    }
    Ok(())
}

impl<S: StoragePort> SettingsStore for NvsSettingsStore<S> {
    fn load(&self) -> Option<ProvisioningSettings> {
        let mut buf = [0u8; MAX_BLOB_SIZE];
        let len = match self.storage.read(SETTINGS_NAMESPACE, SETTINGS_KEY, &mut buf) {
            Ok(len) => len,
            Err(StorageError::NotFound) => {
                info!("SettingsStore: no saved settings");
                return None;
            }
            Err(e) => {
                warn!("SettingsStore: read failed ({})", e);
                return None;
            }
        };

        match postcard::from_bytes::<ProvisioningSettings>(&buf[..len]) {
            Ok(settings) if settings.is_valid() => {
                info!("SettingsStore: loaded settings ({} bytes)", len);
                Some(settings)
            }
            Ok(settings) => {
                warn!(
                    "SettingsStore: invalid marker 0x{:04X}, ignoring",
                    settings.valid_mark
                );
                None
            }
            Err(_) => {
                warn!("SettingsStore: stored settings corrupted, ignoring");
                None
            }
        }
    }

    fn save(&mut self, settings: &ProvisioningSettings) -> Result<(), ConfigError> {
        validate_settings(settings)?;
        let bytes = postcard::to_allocvec(settings).map_err(|_| ConfigError::Encode)?;
        self.storage
            .write(SETTINGS_NAMESPACE, SETTINGS_KEY, &bytes)?;
        info!("SettingsStore: settings saved ({} bytes)", bytes.len());
        Ok(())
    }
}
