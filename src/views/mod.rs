// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Views that mount editing sessions

pub mod editor;

pub use editor::{Exit, MapEditor, MountOptions, status_line};
