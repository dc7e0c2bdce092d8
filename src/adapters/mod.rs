//! Adapters: concrete implementations of the application port traits.
//!
//! | Adapter          | Implements     | Connects to                 |
//! |------------------|----------------|-----------------------------|
//! | `at_sink`        | EventSink      | AT console (`io::Write`)    |
//! | `log_sink`       | EventSink      | Serial log output           |
//! | `nvs`            | StoragePort    | NVS / in-memory store       |
//! | `settings_store` | SettingsStore  | Any `StoragePort` (postcard)|

pub mod at_sink;
pub mod log_sink;
pub mod nvs;
pub mod settings_store;
