// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Caller-supplied callbacks on feature lifecycle and selection events.
//!
//! Create and delete hooks are asynchronous gates: the sync task awaits them
//! before contacting the store, and a `false` answer vetoes the remote call.
//! Selection hooks are plain notifications run on the editor loop.

use crate::model::{Feature, FeatureKey};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by a gating hook; `false` vetoes the operation
pub type HookFuture = Pin<Box<dyn Future<Output = bool> + Send + 'static>>;

/// Hook run before a feature is created or deleted remotely
pub type FeatureHook = Arc<dyn Fn(&Feature) -> HookFuture + Send + Sync>;

/// Hook run after the selection moves from the first key to the second
pub type SelectionChangeHook = Box<dyn FnMut(Option<FeatureKey>, Option<FeatureKey>)>;

/// Hook run with the new selection
pub type SelectionHook = Box<dyn FnMut(Option<FeatureKey>)>;

/// A hook future that accepts immediately
pub fn accept() -> HookFuture {
    Box::pin(std::future::ready(true))
}

/// Wrap a closure as a [`FeatureHook`]
pub fn feature_hook<F, Fut>(f: F) -> FeatureHook
where
    F: Fn(&Feature) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    Arc::new(move |feature: &Feature| -> HookFuture { Box::pin(f(feature)) })
}

/// Hooks gating remote create and delete, cloned into each sync task
#[derive(Clone, Default)]
pub struct FeatureHooks {
    pub on_create: Option<FeatureHook>,
    pub on_delete: Option<FeatureHook>,
}

impl FeatureHooks {
    /// Future that resolves to whether the create may proceed
    pub(crate) fn create_gate(&self, feature: &Feature) -> HookFuture {
        match &self.on_create {
            Some(hook) => hook(feature),
            None => accept(),
        }
    }

    /// Future that resolves to whether the delete may proceed
    pub(crate) fn delete_gate(&self, feature: &Feature) -> HookFuture {
        match &self.on_delete {
            Some(hook) => hook(feature),
            None => accept(),
        }
    }
}

impl std::fmt::Debug for FeatureHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureHooks")
            .field("on_create", &self.on_create.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .finish()
    }
}

/// Every hook an editor can be mounted with
#[derive(Default)]
pub struct EditorHooks {
    pub on_feature_create: Option<FeatureHook>,
    pub on_feature_delete: Option<FeatureHook>,
    pub on_selection_change: Option<SelectionChangeHook>,
    pub on_selection: Option<SelectionHook>,
}

impl EditorHooks {
    /// Split into the gating half owned by sync and the selection half
    /// owned by the session
    pub(crate) fn split(self) -> (FeatureHooks, SelectionHooks) {
        (
            FeatureHooks {
                on_create: self.on_feature_create,
                on_delete: self.on_feature_delete,
            },
            SelectionHooks {
                on_change: self.on_selection_change,
                on_select: self.on_selection,
            },
        )
    }
}

#[derive(Default)]
pub(crate) struct SelectionHooks {
    on_change: Option<SelectionChangeHook>,
    on_select: Option<SelectionHook>,
}

impl SelectionHooks {
    /// The selection moved from `previous` to `next`
    pub(crate) fn changed(&mut self, previous: Option<FeatureKey>, next: Option<FeatureKey>) {
        if let Some(hook) = self.on_change.as_mut() {
            hook(previous, next);
        }
    }

    /// A selection was made, even if it matches the current one
    pub(crate) fn selected(&mut self, next: Option<FeatureKey>) {
        if let Some(hook) = self.on_select.as_mut() {
            hook(next);
        }
    }
}
