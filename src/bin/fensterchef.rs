//! Thin entry point: load the configuration, connect to the X server and
//! hand both to [`Wm::run`]. Parsing the configuration file and speaking
//! the X11 wire protocol are external collaborators (see the core's
//! Non-goals); this binary only wires the seams together.
use std::path::PathBuf;
use std::process;

use fensterchef::config::Configuration;
use fensterchef::error::Result;
use fensterchef::ui::{Notifier, WindowPicker};
use fensterchef::wm::Wm;
use fensterchef::x::XConn;

use tracing::error;
use tracing_subscriber::{self, prelude::*};

/// Seam the core defines but does not implement: parsing is out of scope,
/// so the binary is handed a `ConfigSource` it supplies itself.
pub trait ConfigSource {
    /// Read and parse the configuration file at `path`.
    fn load(&self, path: &PathBuf) -> Result<Configuration>;
}

/// Falls back to [`Configuration::default`] unconditionally. Swapped out
/// for a real parser by whoever links this binary against a config crate.
struct DefaultConfigSource;

impl ConfigSource for DefaultConfigSource {
    fn load(&self, _path: &PathBuf) -> Result<Configuration> {
        Ok(Configuration::default())
    }
}

/// A notifier/picker pair with nothing behind them. Rendering and
/// interactive picking are external collaborators the core only calls
/// through a trait; a real binary links an implementation backed by the
/// drawing layer.
struct NoUi;

impl Notifier for NoUi {
    fn notify(&mut self, _text: &str, _at: fensterchef::geometry::Point) {}
}

impl WindowPicker for NoUi {
    fn pick_window(&mut self, _candidates: &[fensterchef::window::Xid]) -> Option<fensterchef::window::Xid> {
        None
    }
}

fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("fensterchef")
        .join("fensterchef.config")
}

/// Construct the real [`XConn`] and drive the event loop. Left as a
/// generic free function so a binary built against an actual X11 transport
/// crate only has to supply `X` and call this.
fn run<X: XConn>(x: X, config: Configuration) -> Result<()> {
    let mut wm = Wm::new(x, config)?;
    let mut notifier = NoUi;
    let mut picker = NoUi;
    wm.run(&mut notifier, &mut picker)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish()
        .init();

    let source = DefaultConfigSource;
    let _config = match source.load(&config_path()) {
        Ok(config) => config,
        Err(e) => {
            error!(%e, "failed to load configuration, using defaults");
            Configuration::default()
        }
    };

    // A real `XConn` implementation (an X11 transport) is an external
    // collaborator the core does not ship; only the trait and the test
    // mock live here. Wiring one in, then calling `run(conn, _config)`
    // above, is left to whoever links this binary against that transport.
    error!("no XConn implementation is linked into this binary");
    process::exit(1);
}
