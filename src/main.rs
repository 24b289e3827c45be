// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Carto Editor: draw, annotate, and persist features on a map

fn main() -> anyhow::Result<()> {
    carto_editor::run()
}
