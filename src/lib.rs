//! ShowHide Desktop
//!
//! Double-click the empty desktop background to show or hide the desktop
//! icons. The core is a global, observe-only mouse hook that recognises
//! double-clicks, checks that they landed on the icon surface's background
//! (not on an icon, the taskbar or any other window) and then runs one action.
//!
//! Windows: the icon surface is the `SysListView32` "FolderView" hosted by
//! `SHELLDLL_DefView` under Progman or WorkerW; hooks use `WH_MOUSE_LL`.

pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod locator;
pub mod platform;
pub mod toggler;
pub mod types;
pub mod watcher;

#[cfg(target_os = "windows")]
mod host;
#[cfg(test)]
mod test_utils;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

pub use cli::{Cli, Command};
pub use config::{Config, SyntheticPolicy, WatcherConfig};
pub use detector::DoubleClickSignal;
pub use error::{Error, Result};
pub use hit_test::HitTestClassifier;
pub use locator::{ShellTopology, SurfaceLocator};
pub use toggler::VisibilityToggler;
pub use types::{Classification, PointerEvent, ScreenPoint, SurfaceHandle};
pub use watcher::{GlobalInputWatcher, StopHandle, WatcherHandle};

/// Initialize logging; an explicit level wins over the build-mode default.
fn init_logging(level: Option<&str>) {
    let default = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let level = level.and_then(|l| l.parse::<Level>().ok()).unwrap_or(default);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(cfg!(debug_assertions))
        .with_line_number(cfg!(debug_assertions))
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("A tracing subscriber was already installed");
    }
}

#[cfg(target_os = "windows")]
fn run(command: Command, config: &Config) -> Result<()> {
    use platform::Win32Shell;

    let toggler = VisibilityToggler::new(Win32Shell);
    match command {
        Command::Watch => host::watch(config.watcher),
        Command::Toggle => toggler.toggle().map(|_| ()),
        Command::Show => toggler.set_visible(true),
        Command::Hide => toggler.set_visible(false),
    }
}

#[cfg(not(target_os = "windows"))]
fn run(_command: Command, _config: &Config) -> Result<()> {
    Err(Error::UnsupportedPlatform)
}

/// Main entry point
pub fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("showhide-desktop: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(config.log_level.as_deref());
    info!("Starting ShowHide Desktop v{}", env!("CARGO_PKG_VERSION"));

    match run(cli.action(), &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
