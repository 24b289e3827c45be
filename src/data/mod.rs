// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Application-level state shared between the editor and its surroundings.
//!
//! `AppContext` holds who is signed in and which map is open. It is owned by
//! the caller and handed to each view that needs it; clones share one
//! underlying value. Writes notify every subscriber, which is how the
//! autosave loop learns that the user navigated to another map.

use crate::model::{MapId, UserId, View};
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot of the application state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSnapshot {
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub map_id: Option<MapId>,
    pub map_view: Option<View>,
}

/// Partial update; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppPatch {
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub map_id: Option<MapId>,
    pub map_view: Option<View>,
}

impl AppPatch {
    /// Patch that switches the open map
    pub fn map(map_id: MapId) -> Self {
        Self {
            map_id: Some(map_id),
            ..Self::default()
        }
    }

    /// Patch that signs a user in
    pub fn user(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            username: Some(username.into()),
            ..Self::default()
        }
    }
}

/// Shared handle to the application state
#[derive(Debug, Clone)]
pub struct AppContext {
    state: Arc<watch::Sender<AppSnapshot>>,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(AppSnapshot::default())
    }
}

impl AppContext {
    /// Context seeded with `initial`
    pub fn new(initial: AppSnapshot) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state: Arc::new(state),
        }
    }

    /// Current state
    pub fn get(&self) -> AppSnapshot {
        self.state.borrow().clone()
    }

    /// The open map, if any
    pub fn map_id(&self) -> Option<MapId> {
        self.state.borrow().map_id
    }

    /// Merge `patch` into the state and notify subscribers
    pub fn set(&self, patch: AppPatch) {
        self.state.send_modify(|state| {
            if let Some(user_id) = patch.user_id {
                state.user_id = Some(user_id);
            }
            if let Some(username) = patch.username {
                state.username = Some(username);
            }
            if let Some(map_id) = patch.map_id {
                state.map_id = Some(map_id);
            }
            if let Some(view) = patch.map_view {
                state.map_view = Some(view);
            }
        });
    }

    /// Forget the signed-in user
    pub fn sign_out(&self) {
        self.state.send_modify(|state| {
            state.user_id = None;
            state.username = None;
        });
    }

    /// Receiver that observes every later change
    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_merges_partial_patch() {
        let ctx = AppContext::default();
        ctx.set(AppPatch::user(UserId(4), "ana"));
        ctx.set(AppPatch::map(MapId(9)));

        let state = ctx.get();
        assert_eq!(state.user_id, Some(UserId(4)));
        assert_eq!(state.username.as_deref(), Some("ana"));
        assert_eq!(state.map_id, Some(MapId(9)));

        ctx.sign_out();
        assert_eq!(ctx.get().user_id, None);
        assert_eq!(ctx.map_id(), Some(MapId(9)));
    }

    #[test]
    fn clones_share_state() {
        let ctx = AppContext::default();
        let other = ctx.clone();
        other.set(AppPatch::map(MapId(2)));
        assert_eq!(ctx.map_id(), Some(MapId(2)));
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let ctx = AppContext::default();
        let mut rx = ctx.subscribe();

        ctx.set(AppPatch::map(MapId(3)));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().map_id, Some(MapId(3)));
    }
}
