// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor view - a mounted map editor and its event loop.
//!
//! Mounting creates the session, loads the map's features and starts the
//! viewport autosave. The loop then interleaves two sources on one thread:
//! input events read line by line, and sync results coming back from the
//! store. A plain-text status line is written after each of them.

use crate::autosave::{Autosave, AutosaveStop};
use crate::data::{AppContext, AppPatch};
use crate::editing::{EditSession, EditorHooks};
use crate::input::{InputEvent, parse_line};
use crate::keymap::ActionMappings;
use crate::model::{MapId, View};
use crate::sync::FeatureStore;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, Lines};
use tokio::task::JoinHandle;

/// What a caller provides to mount an editor
pub struct MountOptions {
    pub map_id: MapId,
    pub view: View,
    pub mappings: ActionMappings,
    pub hooks: EditorHooks,
    pub autosave_period: Duration,
}

/// Why the event loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    EndOfInput,
    /// The user asked for another map; the caller should remount
    Navigate(MapId),
}

/// A mounted editor
pub struct MapEditor {
    session: EditSession,
    autosave: JoinHandle<AutosaveStop>,
}

impl MapEditor {
    /// Render the map, load its features, and start autosave
    pub async fn mount(
        store: Arc<dyn FeatureStore>,
        context: AppContext,
        options: MountOptions,
    ) -> anyhow::Result<Self> {
        let MountOptions {
            map_id,
            view,
            mappings,
            hooks,
            autosave_period,
        } = options;

        context.set(AppPatch {
            map_id: Some(map_id),
            map_view: Some(view),
            ..AppPatch::default()
        });

        let mut session = EditSession::new(
            map_id,
            view,
            context.clone(),
            store.clone(),
            mappings,
            hooks,
        );

        // A map that fails to load still opens, empty.
        if let Err(err) = session.load_features().await {
            tracing::error!("Failed to load features for map {map_id}: {err}");
        }

        let autosave = Autosave {
            map_id,
            view: session.view_handle().downgrade(),
            context,
            store,
            period: autosave_period,
        }
        .spawn();

        tracing::info!("Mounted editor for map {map_id}");
        Ok(Self { session, autosave })
    }

    /// The mounted session
    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Mutable access to the mounted session
    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }

    /// Apply one input event.
    ///
    /// Returns `Some` when the event ends this editor's loop.
    pub fn handle(&mut self, event: InputEvent) -> Option<Exit> {
        match event {
            InputEvent::Key(key) => {
                self.session.handle_key(&key);
            }
            InputEvent::Click(point) => self.session.click_at(point),
            InputEvent::View { center, zoom } => {
                self.session.set_view(Some(center), Some(zoom));
            }
            InputEvent::Title(title) => self.session.editor_mut().set_title(title),
            InputEvent::Body(body) => self.session.editor_mut().set_body(body),
            InputEvent::Navigate(map_id) => {
                self.session.context().set(AppPatch::map(map_id));
                return Some(Exit::Navigate(map_id));
            }
            InputEvent::Help => {}
            InputEvent::Quit => return Some(Exit::Quit),
        }
        None
    }

    /// Drive the editor from `lines` until quit, navigation, or end of input
    pub async fn run<R, W>(&mut self, lines: &mut Lines<R>, out: &mut W) -> anyhow::Result<Exit>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.render(out, false).await?;

        let exit = loop {
            let mut show_help = false;
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read input")? else {
                        break Exit::EndOfInput;
                    };
                    match parse_line(&line) {
                        Ok(Some(InputEvent::Help)) => show_help = true,
                        Ok(Some(event)) => {
                            if let Some(exit) = self.handle(event) {
                                break exit;
                            }
                        }
                        Ok(None) => continue,
                        Err(err) => {
                            tracing::warn!("Ignoring input {line:?}: {err}");
                            continue;
                        }
                    }
                }
                event = self.session.next_sync_event() => {
                    tracing::debug!(?event, "sync event applied");
                }
            }
            self.render(out, show_help).await?;
        };

        // Let queued store calls land before the caller moves on.
        self.session.settle().await;
        self.render(out, false).await?;
        Ok(exit)
    }

    /// Stop autosave and drop the session
    pub async fn unmount(self) {
        let map_id = self.session.map_id();
        let Self { session, autosave } = self;
        drop(session);
        autosave.abort();
        let _ = autosave.await;
        tracing::info!("Unmounted editor for map {map_id}");
    }

    /// One status line, then any alerts and requested help
    async fn render<W: AsyncWrite + Unpin>(&mut self, out: &mut W, help: bool) -> anyhow::Result<()> {
        let mut text = status_line(&self.session);
        text.push('\n');
        for alert in self.session.status_mut().take_alerts() {
            text.push_str(&format!("! {alert}\n"));
        }
        if help {
            for line in self.session.help_lines() {
                text.push_str(&format!("  {line}\n"));
            }
        }
        out.write_all(text.as_bytes())
            .await
            .context("Failed to write status")?;
        out.flush().await.context("Failed to write status")?;
        Ok(())
    }
}

/// `[E] Saving... | 3 features | path 2 | selected #4 "Bridge"`
pub fn status_line(session: &EditSession) -> String {
    let status = session.status();
    let mut line = format!(
        "[{}] {} | {} features | path {}",
        status.mode(),
        status.text(),
        session.layer().len(),
        session.path().len(),
    );
    if let Some(saved) = status.last_saved() {
        line.push_str(&format!(" | saved {saved}"));
    }
    if let Some(key) = session.selected() {
        line.push_str(&format!(" | selected {key} {:?}", session.editor().title()));
    }
    line
}
