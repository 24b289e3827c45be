// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Application settings and configuration constants.
//!
//! This module holds compile-time defaults. Anything a user can change at
//! runtime (API base URL, keybinding overrides, autosave period) comes in
//! through the CLI in `cli.rs` and only falls back to these values.

use crate::editing::CommitMode;
use std::time::Duration;

// ============================================================================
// VIEWPORT SETTINGS
// ============================================================================
/// Latitude of the view shown before a map's saved view is known
const DEFAULT_VIEW_LAT: f64 = 25.725194867753334;

/// Longitude of the view shown before a map's saved view is known
const DEFAULT_VIEW_LNG: f64 = -100.31513482332231;

/// Zoom of the view shown before a map's saved view is known
const DEFAULT_VIEW_ZOOM: f64 = 10.0;

// ============================================================================
// BACKEND SETTINGS
// ============================================================================
/// Map API used when no `--api` is given
const DEFAULT_API_URL: &str = "http://localhost:8080/api";

// ============================================================================
// AUTOSAVE SETTINGS
// ============================================================================
/// How often the current view is pushed to the backend
const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(10);

// ============================================================================
// EDITING SETTINGS
// ============================================================================
/// Commit style active when an editor is mounted
const DEFAULT_COMMIT_MODE: CommitMode = CommitMode::Polyline;

/// Click tolerance for hitting lines and markers, in degrees
///
/// Roughly 10 m at the equator. Polygons are hit by containment and
/// ignore this value.
const HIT_TOLERANCE_DEGREES: f64 = 0.0001;

// ============================================================================
// STATUS TEXT
// ============================================================================
const STATUS_SAVED: &str = "Saved";
const STATUS_SAVING: &str = "Saving...";
const STATUS_ERROR: &str = "Error while saving";

const ALERT_CREATE_FAILED: &str = "An error occurred while trying to create the feature";
const ALERT_DELETE_FAILED: &str = "An error occurred while trying to delete the feature";

// ============================================================================
// PUBLIC API
// ============================================================================

/// Initial viewport
pub mod view {
    pub const DEFAULT_LAT: f64 = super::DEFAULT_VIEW_LAT;
    pub const DEFAULT_LNG: f64 = super::DEFAULT_VIEW_LNG;
    pub const DEFAULT_ZOOM: f64 = super::DEFAULT_VIEW_ZOOM;
}

/// Remote map API
pub mod api {
    pub const DEFAULT_BASE_URL: &str = super::DEFAULT_API_URL;
}

/// Viewport autosave loop
pub mod autosave {
    use std::time::Duration;

    /// Period between view pushes
    pub const INTERVAL: Duration = super::AUTOSAVE_INTERVAL;
}

/// Editing defaults
pub mod editing {
    use crate::editing::CommitMode;

    pub const DEFAULT_COMMIT_MODE: CommitMode = super::DEFAULT_COMMIT_MODE;

    /// Click tolerance for lines and markers (degrees)
    pub const HIT_TOLERANCE: f64 = super::HIT_TOLERANCE_DEGREES;
}

/// User-facing status and alert text
pub mod text {
    pub const SAVED: &str = super::STATUS_SAVED;
    pub const SAVING: &str = super::STATUS_SAVING;
    pub const ERROR: &str = super::STATUS_ERROR;

    pub const CREATE_FAILED: &str = super::ALERT_CREATE_FAILED;
    pub const DELETE_FAILED: &str = super::ALERT_DELETE_FAILED;
}
