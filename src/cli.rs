// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Command-line arguments

use crate::settings;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "carto-editor")]
#[command(about = "Draw and annotate features on a map")]
#[command(version)]
pub struct Cli {
    /// Map to open
    #[arg(long)]
    pub map: i64,

    /// Base URL of the map API
    #[arg(long, default_value = settings::api::DEFAULT_BASE_URL)]
    pub api: String,

    /// Signed-in user id, attached to created features
    #[arg(long)]
    pub user: Option<i64>,

    /// Display name of the signed-in user
    #[arg(long, requires = "user")]
    pub username: Option<String>,

    /// TOML file with keybinding overrides
    #[arg(long, value_name = "FILE")]
    pub keybinds: Option<PathBuf>,

    /// Keep everything in memory instead of talking to the API
    #[arg(long)]
    pub offline: bool,

    /// Seconds between viewport saves
    #[arg(long, default_value_t = settings::autosave::INTERVAL.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub autosave_secs: u64,

    /// Read input events from FILE instead of stdin
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

impl Cli {
    /// Autosave period as a `Duration`
    pub fn autosave_period(&self) -> Duration {
        Duration::from_secs(self.autosave_secs)
    }
}
