//! Notecard provisioning firmware: main entry point.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                   │
//! │                                                           │
//! │  NotecardI2c     NvsSettingsStore   AtEventSink + LogSink │
//! │  (Transport)     (SettingsStore)    (EventSink pair)      │
//! │                                                           │
//! │  ──────────────── Port Trait Boundary ─────────────────   │
//! │                                                           │
//! │  ┌─────────────────────────────────────────────────────┐  │
//! │  │  Session · Provisioner · maintenance (pure logic)   │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info, warn};

use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::hal::gpio::AnyIOPin;
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::units::Hertz;

use bluesnote::adapters::at_sink::AtEventSink;
use bluesnote::adapters::log_sink::LogEventSink;
use bluesnote::adapters::nvs::NvsAdapter;
use bluesnote::adapters::settings_store::NvsSettingsStore;
use bluesnote::app::maintenance;
use bluesnote::app::provisioning::Provisioner;
use bluesnote::config::{BusConfig, ProvisioningOptions};
use bluesnote::drivers::notecard_i2c::NotecardI2c;
use bluesnote::notecard::Session;
use bluesnote::pins;

/// The session owns a 4 KiB response buffer; the default main task stack
/// is too small for it.
const APP_STACK_SIZE: usize = 24 * 1024;

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("bluesnote v{}", env!("CARGO_PKG_VERSION"));

    let app = std::thread::Builder::new()
        .name("notecard".into())
        .stack_size(APP_STACK_SIZE)
        .spawn(run)
        .context("spawning notecard task")?;

    match app.join() {
        Ok(result) => result,
        Err(_) => {
            error!("notecard task panicked");
            anyhow::bail!("notecard task panicked")
        }
    }
}

fn run() -> Result<()> {
    let peripherals = Peripherals::take().context("taking peripherals")?;
    let bus = BusConfig::default();

    // SAFETY: the pin numbers come from the board map and no other driver
    // claims them.
    let (sda, scl) = unsafe {
        (
            AnyIOPin::new(pins::NOTECARD_SDA_GPIO),
            AnyIOPin::new(pins::NOTECARD_SCL_GPIO),
        )
    };
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        sda,
        scl,
        &I2cConfig::new().baudrate(Hertz(bus.clock_hz)),
    )
    .context("I2C driver init")?;

    let mut session = Session::new(NotecardI2c::new(i2c, Delay::new_default(), bus));
    session.connect().context("opening Notecard transport")?;

    let storage = NvsAdapter::new().context("NVS init")?;
    let settings = NvsSettingsStore::new(storage);
    let mut events = (AtEventSink::new(std::io::stdout()), LogEventSink::new());

    let options = ProvisioningOptions::from_build();
    let poll_interval = Duration::from_millis(u64::from(options.sensor_read_interval_ms));
    let outcome = Provisioner::new(options).run(&mut session, &settings, &mut events);
    if outcome.is_provisioned() {
        info!("Notecard provisioned");
    } else {
        warn!("Notecard provisioning incomplete: {:?}", outcome);
    }

    loop {
        maintenance::query_status(&mut session, &mut events);
        std::thread::sleep(poll_interval);
    }
}
