// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit session - the mode/selection state machine for one mounted map

mod keyboard;
mod pointer;
mod sync;

use super::edit_path::EditPath;
use super::edit_types::{CommitMode, MapMode};
use super::hooks::{EditorHooks, SelectionHooks};
use super::selection::Selection;
use crate::components::{FeatureLayer, MetadataEditor, StatusIndicator, TextEditor};
use crate::data::AppContext;
use crate::keymap::ActionMappings;
use crate::model::{FeatureKey, MapId, Point, View, ViewHandle};
use crate::settings;
use crate::sync::{FeatureStore, FeatureSyncController};
use std::sync::Arc;

/// Editing session for one map
///
/// Holds everything a mounted editor needs: the interaction mode, the path
/// under construction, the rendered features, the single selection with
/// its metadata editor, and the sync controller that persists changes.
///
/// All methods run on the editor's event loop. None of them wait on the
/// network; remote results arrive later as sync events.
pub struct EditSession {
    /// Map this session edits
    map_id: MapId,

    /// Select or Edit
    mode: MapMode,

    /// Primitive the edit path becomes on commit
    commit_mode: CommitMode,

    /// Points placed since the last commit
    path: EditPath,

    /// Every rendered feature
    layer: FeatureLayer,

    selection: Selection,

    /// Title/body editor bound to the selection
    editor: Box<dyn MetadataEditor>,

    /// Mode letter, save status, and alerts
    status: StatusIndicator,

    /// Resolved key tables
    mappings: ActionMappings,

    sync: FeatureSyncController,

    /// Live viewport, shared weakly with autosave
    view: ViewHandle,

    /// App-wide state (signed-in user, open map)
    context: AppContext,

    selection_hooks: SelectionHooks,
}

impl EditSession {
    /// Create a session in Select mode with nothing selected
    pub fn new(
        map_id: MapId,
        view: View,
        context: AppContext,
        store: Arc<dyn FeatureStore>,
        mappings: ActionMappings,
        hooks: EditorHooks,
    ) -> Self {
        let (feature_hooks, selection_hooks) = hooks.split();
        let mode = MapMode::default();
        let mut status = StatusIndicator::new();
        status.set_mode(mode.indicator());

        Self {
            map_id,
            mode,
            commit_mode: settings::editing::DEFAULT_COMMIT_MODE,
            path: EditPath::new(),
            layer: FeatureLayer::new(),
            selection: Selection::new(),
            editor: Box::new(TextEditor::new()),
            status,
            mappings,
            sync: FeatureSyncController::new(store, feature_hooks),
            view: ViewHandle::new(view),
            context,
            selection_hooks,
        }
    }

    /// Use a different metadata editor
    pub fn with_editor(mut self, editor: Box<dyn MetadataEditor>) -> Self {
        self.editor = editor;
        self
    }

    /// The map this session edits
    pub fn map_id(&self) -> MapId {
        self.map_id
    }

    /// Current interaction mode
    pub fn mode(&self) -> MapMode {
        self.mode
    }

    /// Primitive the next commit produces
    pub fn commit_mode(&self) -> CommitMode {
        self.commit_mode
    }

    /// Vertices placed since the last commit
    pub fn path(&self) -> &EditPath {
        &self.path
    }

    /// Rendered features
    pub fn layer(&self) -> &FeatureLayer {
        &self.layer
    }

    /// The selected feature, if any
    pub fn selected(&self) -> Option<FeatureKey> {
        self.selection.current()
    }

    /// The metadata editor showing the selection
    pub fn editor(&self) -> &dyn MetadataEditor {
        self.editor.as_ref()
    }

    /// The metadata editor, for typing into
    pub fn editor_mut(&mut self) -> &mut dyn MetadataEditor {
        self.editor.as_mut()
    }

    /// Mode letter, save state and alerts
    pub fn status(&self) -> &StatusIndicator {
        &self.status
    }

    /// Mutable status, for draining alerts
    pub fn status_mut(&mut self) -> &mut StatusIndicator {
        &mut self.status
    }

    /// Resolved key bindings
    pub fn mappings(&self) -> &ActionMappings {
        &self.mappings
    }

    /// Persistence queues for this session's features
    pub fn sync(&self) -> &FeatureSyncController {
        &self.sync
    }

    /// Shared app state
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Snapshot of the current view
    pub fn view(&self) -> View {
        self.view.get()
    }

    /// Shared handle to the live view
    pub fn view_handle(&self) -> &ViewHandle {
        &self.view
    }

    /// Move the viewport, keeping whatever is not given
    pub fn set_view(&mut self, center: Option<Point>, zoom: Option<f64>) {
        let next = self.view.get().merged(center, zoom);
        self.view.set(next);
    }

    /// Help listing for the active mode
    pub fn help_lines(&self) -> Vec<String> {
        self.mappings.help_lines(self.mode)
    }

    fn set_mode(&mut self, mode: MapMode) {
        if self.mode != mode {
            tracing::debug!("Mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
        self.status.set_mode(mode.indicator());
    }

    fn set_commit_mode(&mut self, commit_mode: CommitMode) {
        self.commit_mode = commit_mode;
        self.status.set_mode(commit_mode.indicator());
    }
}
