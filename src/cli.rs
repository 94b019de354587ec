//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, SyntheticPolicy};
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(name = "showhide-desktop", version)]
#[command(about = "Double-click the empty desktop to show or hide its icons")]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Let software-injected clicks trigger the toggle too
    #[arg(long)]
    pub accept_synthetic: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Watch for double-clicks on the empty desktop (default)
    #[default]
    Watch,
    /// Toggle the desktop icons once and exit
    Toggle,
    /// Show the desktop icons and exit
    Show,
    /// Hide the desktop icons and exit
    Hide,
}

impl Cli {
    /// Config file (if any) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if self.accept_synthetic {
            config.watcher.synthetic = SyntheticPolicy::AcceptAll;
        }
        if let Some(level) = &self.log_level {
            config.log_level = Some(level.clone());
        }
        Ok(config)
    }

    pub fn action(&self) -> Command {
        self.command.unwrap_or_default()
    }
}
