//! Hardware bridge daemon entry point.
//!
//! Wires the device seams, plugins, stores, and the HTTP gateway together
//! and runs the axum server until Ctrl-C or the delayed-shutdown supervisor
//! says to exit.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ VirtualPointer        -- uinput device (feature `hardware`) or mock
//!  └─ plugins               -- joystick, serial link, LED stub, temp stub
//!  └─ stores                -- connections.json (owned), catalog/installed (read-only)
//!  └─ ShutdownSupervisor    -- single grace timer, armed on last disconnect
//!  └─ axum::serve           -- loopback HTTP gateway
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bridge_core::Plugin;
use bridge_daemon::application::{PermissionGate, PluginRegistry, ShutdownSupervisor};
use bridge_daemon::domain::BridgeConfig;
use bridge_daemon::infrastructure::gpio::joystick::DigitalJoystickPlugin;
use bridge_daemon::infrastructure::gpio::EdgeSource;
use bridge_daemon::infrastructure::http::{self, AppState};
use bridge_daemon::infrastructure::pointer::{PointerDevice, VirtualPointer};
use bridge_daemon::infrastructure::serial::link::SerialLinkPlugin;
use bridge_daemon::infrastructure::serial::SerialConnector;
use bridge_daemon::infrastructure::store::{CatalogStore, ConnectionStore};
use bridge_daemon::infrastructure::stubs::{LedPlugin, TempPlugin};

#[derive(Debug, Parser)]
#[command(name = "bridge-daemon", about = "Local hardware bridge for app pages")]
struct Cli {
    /// Address for the HTTP gateway.  Keep this on loopback.
    #[arg(long, env = "BRIDGE_BIND", default_value = "127.0.0.1:8765")]
    bind: SocketAddr,

    /// Seconds to wait after the last app disconnects before exiting.
    #[arg(long, env = "BRIDGE_GRACE_SECS", default_value_t = 5)]
    grace_secs: u64,

    /// Directory holding connections.json, installed.json and catalog.json.
    #[arg(long, env = "BRIDGE_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Joystick cursor step in pixels per tick.
    #[arg(long, default_value_t = 3)]
    step: i32,

    /// Serial baud rate for the microcontroller link.
    #[arg(long, default_value_t = 9600)]
    baud: u32,
}

impl Cli {
    fn into_config(self) -> BridgeConfig {
        BridgeConfig {
            bind_addr: self.bind,
            grace_period: Duration::from_secs(self.grace_secs),
            connections_path: self.data_dir.join("connections.json"),
            installed_path: self.data_dir.join("installed.json"),
            catalog_path: self.data_dir.join("catalog.json"),
            serial_baud: self.baud,
            cursor_step: self.step,
            ..BridgeConfig::default()
        }
    }
}

/// The real pointer device when built for hardware, a recording mock
/// otherwise.  Opening the real device can fail; that is fatal by design.
fn pointer_device() -> anyhow::Result<Arc<dyn PointerDevice>> {
    #[cfg(all(target_os = "linux", feature = "hardware"))]
    {
        use bridge_daemon::infrastructure::pointer::uinput::UinputPointer;
        let device = UinputPointer::create().context("opening uinput pointer device")?;
        Ok(Arc::new(device))
    }
    #[cfg(not(all(target_os = "linux", feature = "hardware")))]
    {
        use bridge_daemon::infrastructure::pointer::mock::MockPointer;
        info!("no hardware pointer support compiled in; using mock pointer");
        Ok(Arc::new(MockPointer::new()))
    }
}

/// Real GPIO interrupts on a Pi build, an inert source elsewhere.  A pin
/// already claimed by another process is fatal.
fn edge_source(config: &BridgeConfig) -> anyhow::Result<Box<dyn EdgeSource>> {
    #[cfg(all(target_os = "linux", feature = "rpi-gpio"))]
    {
        use bridge_daemon::infrastructure::gpio::rpi::RpiEdgeSource;
        let source =
            RpiEdgeSource::new(config.joystick_pins).context("claiming joystick GPIO pins")?;
        Ok(Box::new(source))
    }
    #[cfg(not(all(target_os = "linux", feature = "rpi-gpio")))]
    {
        use bridge_daemon::infrastructure::gpio::mock::MockEdgeSource;
        let _ = config;
        info!("no GPIO support compiled in; joystick will stay idle");
        let (source, _feeder) = MockEdgeSource::new();
        Ok(Box::new(source))
    }
}

fn serial_connector(config: &BridgeConfig) -> Arc<dyn SerialConnector> {
    #[cfg(feature = "hardware")]
    {
        use bridge_daemon::infrastructure::serial::port::SystemSerialConnector;
        Arc::new(SystemSerialConnector::new(config.serial_baud))
    }
    #[cfg(not(feature = "hardware"))]
    {
        let _ = config;
        use bridge_daemon::infrastructure::serial::mock::MockConnector;
        info!("no serial support compiled in; serial link will report not found");
        Arc::new(MockConnector::empty())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config();
    info!("hardware bridge starting");

    // ── Devices ───────────────────────────────────────────────────────────────
    let pointer = Arc::new(VirtualPointer::new(pointer_device()?));

    // ── Plugins ───────────────────────────────────────────────────────────────
    let joystick = Arc::new(DigitalJoystickPlugin::new(
        edge_source(&config)?,
        Arc::clone(&pointer),
        config.cursor_step,
        config.tick_interval,
    ));
    let serial = Arc::new(SerialLinkPlugin::new(
        serial_connector(&config),
        Arc::clone(&pointer),
    ));
    let led = Arc::new(LedPlugin::new());
    let temp = Arc::new(TempPlugin::new());

    let registry = PluginRegistry::new();
    registry.register(Arc::clone(&joystick) as Arc<dyn Plugin>);
    registry.register(Arc::clone(&serial) as Arc<dyn Plugin>);
    registry.register(Arc::clone(&led) as Arc<dyn Plugin>);
    registry.register(Arc::clone(&temp) as Arc<dyn Plugin>);

    // ── Stores and services ───────────────────────────────────────────────────
    let connections = Arc::new(ConnectionStore::load(&config.connections_path));
    let catalog = Arc::new(CatalogStore::new(
        &config.catalog_path,
        &config.installed_path,
    ));
    let gate = PermissionGate::new(Arc::clone(&catalog), Arc::clone(&connections));
    let (supervisor, term_rx) = ShutdownSupervisor::spawn(
        Arc::clone(&connections),
        config.grace_period,
    );

    registry.start_all();

    let state = Arc::new(AppState {
        registry,
        connections,
        catalog,
        gate,
        supervisor,
        pointer,
        serial,
        led,
        temp,
    });
    let app = http::router(Arc::clone(&state));

    // ── HTTP gateway ──────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!("listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("ctrl-c received"),
                _ = term_rx => info!("shutdown supervisor fired"),
            }
        })
        .await
        .context("http server failed")?;

    state.registry.stop_all();
    info!("hardware bridge stopped");
    Ok(())
}
