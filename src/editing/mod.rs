// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod commit;
pub mod edit_path;
pub mod edit_types;
pub mod hooks;
pub mod selection;
pub mod session;

pub use edit_path::EditPath;
pub use edit_types::{CommitMode, MapMode};
pub use hooks::{EditorHooks, FeatureHook, FeatureHooks, HookFuture, feature_hook};
pub use selection::{Selection, SelectionChange};
pub use session::EditSession;
