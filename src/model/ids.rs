// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Identifiers for features, maps, and users.
//!
//! Two kinds of identity exist for a feature. `FeatureKey` is local: it is
//! minted from a global atomic counter the moment a feature enters the
//! rendered layer and is never reused within a process, so queued sync work
//! can always find its feature even before the store has answered.
//! `FeatureId` is durable: the remote store assigns it on create, and every
//! update or delete must be keyed by it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Local handle for a rendered feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureKey(u64);

static FEATURE_COUNTER: AtomicU64 = AtomicU64::new(1);

impl FeatureKey {
    /// Mint a new unique feature key
    pub fn next() -> Self {
        Self(FEATURE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Durable feature identifier assigned by the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub i64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote map identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(pub i64);

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
