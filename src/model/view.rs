// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Map viewport (center + zoom) and its shared handle.
//!
//! The editor mutates the view on every pan/zoom while the autosave task
//! reads it on each tick, so the live value sits behind `Arc<RwLock<View>>`.
//! The autosave task only ever holds a `Weak` to it: once the editor drops
//! its handle, the upgrade fails and the loop knows it has been unmounted.

use super::geometry::Point;
use crate::settings;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

/// Center point plus zoom level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub center: Point,
    pub zoom: f64,
}

impl Default for View {
    fn default() -> Self {
        Self {
            center: Point::new(settings::view::DEFAULT_LAT, settings::view::DEFAULT_LNG),
            zoom: settings::view::DEFAULT_ZOOM,
        }
    }
}

impl View {
    /// A view centred on `center`
    pub fn new(center: Point, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Apply a partial update, keeping whatever is not given
    pub fn merged(self, center: Option<Point>, zoom: Option<f64>) -> Self {
        Self {
            center: center.unwrap_or(self.center),
            zoom: zoom.unwrap_or(self.zoom),
        }
    }
}

/// Shared, live view owned by a mounted editor
#[derive(Debug, Clone)]
pub struct ViewHandle {
    inner: Arc<RwLock<View>>,
}

impl ViewHandle {
    pub fn new(view: View) -> Self {
        Self {
            inner: Arc::new(RwLock::new(view)),
        }
    }

    /// Snapshot of the current view
    pub fn get(&self) -> View {
        *read_view(&self.inner)
    }

    /// Replace the shared view
    pub fn set(&self, view: View) {
        *write_view(&self.inner) = view;
    }

    /// Non-owning reference for background readers
    pub fn downgrade(&self) -> Weak<RwLock<View>> {
        Arc::downgrade(&self.inner)
    }
}

/// Acquire a read lock on a shared view, recovering from poison.
pub fn read_view(view: &RwLock<View>) -> RwLockReadGuard<'_, View> {
    view.read().unwrap_or_else(|poisoned| {
        tracing::warn!("View RwLock was poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Acquire a write lock on a shared view, recovering from poison.
pub fn write_view(view: &RwLock<View>) -> RwLockWriteGuard<'_, View> {
    view.write().unwrap_or_else(|poisoned| {
        tracing::warn!("View RwLock was poisoned, recovering");
        poisoned.into_inner()
    })
}
