// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Carto Editor: draw, annotate, and persist features on a map

pub mod autosave;
pub mod cli;
pub mod components;
pub mod data;
pub mod editing;
pub mod input;
pub mod keymap;
pub mod model;
pub mod settings;
pub mod sync;
pub mod views;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use data::{AppContext, AppPatch};
use keymap::{ActionMappings, KeybindOverrides, Keybinds};
use model::{MapId, UserId, View};
use std::sync::Arc;
use sync::{FeatureStore, HttpFeatureStore, MemoryStore};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use views::{Exit, MapEditor, MountOptions};

/// Entry point for the Carto Editor binary
pub fn run() -> anyhow::Result<()> {
    // Initialize tracing subscriber (can be controlled via RUST_LOG env var).
    // Logs go to stderr; stdout carries the editor's status lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("carto_editor=info,reqwest=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    runtime.block_on(run_editor(cli))
}

/// Mount editors for the requested map, remounting on navigation
async fn run_editor(cli: Cli) -> anyhow::Result<()> {
    let store: Arc<dyn FeatureStore> = if cli.offline {
        tracing::info!("Running offline with an in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        tracing::info!("Using map API at {}", cli.api);
        Arc::new(HttpFeatureStore::new(cli.api.clone()))
    };

    let overrides = match &cli.keybinds {
        Some(path) => KeybindOverrides::load(path)
            .with_context(|| format!("Failed to load keybindings from {}", path.display()))?,
        None => KeybindOverrides::none(),
    };
    let mappings = ActionMappings::build(&Keybinds::defaults(), &overrides);

    let context = AppContext::default();
    if let Some(user) = cli.user {
        context.set(AppPatch {
            user_id: Some(UserId(user)),
            username: cli.username.clone(),
            ..AppPatch::default()
        });
    }

    let input: Box<dyn AsyncBufRead + Unpin> = match &cli.script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    let mut lines = input.lines();
    let mut stdout = tokio::io::stdout();

    let mut map_id = MapId(cli.map);
    loop {
        let mut editor = MapEditor::mount(
            store.clone(),
            context.clone(),
            MountOptions {
                map_id,
                view: View::default(),
                mappings: mappings.clone(),
                hooks: Default::default(),
                autosave_period: cli.autosave_period(),
            },
        )
        .await?;

        let exit = editor.run(&mut lines, &mut stdout).await?;
        editor.unmount().await;

        match exit {
            Exit::Navigate(next) => {
                tracing::info!("Navigating from map {map_id} to map {next}");
                map_id = next;
            }
            Exit::Quit | Exit::EndOfInput => break,
        }
    }

    Ok(())
}
