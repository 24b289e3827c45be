// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! User keybinding overrides, usually read from a TOML file:
//!
//! ```toml
//! [select]
//! deleteFeature = "x"
//!
//! [edit]
//! commitFeature = " "
//! ```

use super::{ActionId, Key, Keybinds};
use crate::editing::MapMode;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Error loading a keybinding override file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read keybindings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid keybindings file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Partial per-mode action → key tables
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeybindOverrides {
    #[serde(default)]
    select: IndexMap<ActionId, Key>,
    #[serde(default)]
    edit: IndexMap<ActionId, Key>,
}

impl KeybindOverrides {
    /// No overrides
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder-style override of a single action
    pub fn with(mut self, mode: MapMode, action: ActionId, key: impl Into<Key>) -> Self {
        self.table_mut(mode).insert(action, key.into());
        self
    }

    /// Parse overrides from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse an overrides file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn is_empty(&self) -> bool {
        self.select.is_empty() && self.edit.is_empty()
    }

    fn table(&self, mode: MapMode) -> &IndexMap<ActionId, Key> {
        match mode {
            MapMode::Select => &self.select,
            MapMode::Edit => &self.edit,
        }
    }

    fn table_mut(&mut self, mode: MapMode) -> &mut IndexMap<ActionId, Key> {
        match mode {
            MapMode::Select => &mut self.select,
            MapMode::Edit => &mut self.edit,
        }
    }

    /// Overlay these overrides onto `base`.
    ///
    /// Overridden actions keep their declared position; only the key changes.
    /// An action listed under a mode it does not belong to is skipped.
    pub fn apply_to(&self, base: &Keybinds) -> Keybinds {
        let mut merged = base.clone();
        for mode in MapMode::ALL {
            let target = merged.for_mode_mut(mode);
            for (action, key) in self.table(mode) {
                if action.mode() != mode {
                    tracing::warn!(%action, %mode, "Ignoring keybinding override for action outside its mode");
                    continue;
                }
                target.insert(*action, key.clone());
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_toml_tables() {
        let overrides = KeybindOverrides::from_toml_str(
            r#"
            [select]
            deleteFeature = "x"

            [edit]
            commitFeature = " "
            "#,
        )
        .unwrap();

        let expected = KeybindOverrides::none()
            .with(MapMode::Select, ActionId::DeleteFeature, "x")
            .with(MapMode::Edit, ActionId::CommitFeature, " ");
        assert_eq!(overrides, expected);
    }

    #[test]
    fn unknown_action_is_a_parse_error() {
        let result = KeybindOverrides::from_toml_str("[select]\nexplode = \"x\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn overlay_keeps_declaration_order() {
        let merged = KeybindOverrides::none()
            .with(MapMode::Edit, ActionId::UndoAllEdits, "u")
            .with(MapMode::Edit, ActionId::SwitchToSelectMode, "Escape")
            .apply_to(&Keybinds::defaults());

        let edit = merged.for_mode(MapMode::Edit);
        assert_eq!(edit.get_index(0), Some((&ActionId::SwitchToSelectMode, &Key::from("Escape"))));
        assert_eq!(edit.get_index(6), Some((&ActionId::UndoAllEdits, &Key::from("u"))));
        assert_eq!(edit.len(), 7);
    }

    #[test]
    fn override_in_wrong_mode_is_skipped() {
        let merged = KeybindOverrides::none()
            .with(MapMode::Select, ActionId::CommitFeature, "c")
            .apply_to(&Keybinds::defaults());

        assert!(!merged.for_mode(MapMode::Select).contains_key(&ActionId::CommitFeature));
        assert_eq!(merged, Keybinds::defaults());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[edit]\nundoPreviousEdit = \"z\"").unwrap();

        let overrides = KeybindOverrides::load(file.path()).unwrap();
        assert_eq!(
            overrides,
            KeybindOverrides::none().with(MapMode::Edit, ActionId::UndoPreviousEdit, "z")
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let err = KeybindOverrides::load(Path::new("/nonexistent/keys.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/keys.toml"));
    }
}
