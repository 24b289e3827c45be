// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Persistence of features and map views to the remote store

pub mod controller;
pub mod dto;
pub mod http;
pub mod memory;
pub mod store;

pub use controller::{FeatureSyncController, SyncError, SyncEvent};
pub use http::HttpFeatureStore;
pub use memory::{MemoryStore, StoreCall, StoreOp};
pub use store::{FeaturePatch, FeatureStore, NewFeature, StoreError, StoredFeature};
