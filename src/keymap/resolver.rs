// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Key → action lookup built from keybinding tables

use super::{ActionId, Key, KeybindOverrides, Keybinds, ModeBindings};
use crate::editing::MapMode;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Two or more actions bound to the same key within one mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindConflict {
    pub mode: MapMode,
    pub key: Key,
    /// Colliding actions in declaration order; the first one is kept
    pub actions: Vec<ActionId>,
}

impl KeybindConflict {
    /// The action that keeps the key, `None` for an empty conflict
    pub fn kept(&self) -> Option<ActionId> {
        self.actions.first().copied()
    }
}

impl fmt::Display for KeybindConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.actions.iter().map(ToString::to_string).collect();
        write!(
            f,
            "key {:?} mapped to multiple actions [{}] in {} mode",
            self.key.as_str(),
            names.join(", "),
            self.mode
        )
    }
}

/// Resolved per-mode key → action tables
#[derive(Debug, Clone)]
pub struct ActionMappings {
    select: HashMap<Key, ActionId>,
    edit: HashMap<Key, ActionId>,
    bindings: Keybinds,
    conflicts: Vec<KeybindConflict>,
}

impl ActionMappings {
    /// Overlay `overrides` onto `defaults` and invert each mode's table.
    ///
    /// Conflicts are logged and kept for inspection; they never fail the build.
    pub fn build(defaults: &Keybinds, overrides: &KeybindOverrides) -> Self {
        let bindings = overrides.apply_to(defaults);
        let mut conflicts = Vec::new();

        let (select, mut select_conflicts) = invert(MapMode::Select, bindings.for_mode(MapMode::Select));
        let (edit, mut edit_conflicts) = invert(MapMode::Edit, bindings.for_mode(MapMode::Edit));
        conflicts.append(&mut select_conflicts);
        conflicts.append(&mut edit_conflicts);

        for conflict in &conflicts {
            if let Some(kept) = conflict.kept() {
                tracing::warn!("{conflict}; keeping {kept}");
            }
        }

        Self {
            select,
            edit,
            bindings,
            conflicts,
        }
    }

    /// Default bindings with no overrides
    pub fn defaults() -> Self {
        Self::build(&Keybinds::defaults(), &KeybindOverrides::none())
    }

    /// Action bound to `key` in `mode`, if any
    pub fn resolve(&self, mode: MapMode, key: &str) -> Option<ActionId> {
        self.table(mode).get(key).copied()
    }

    /// Every collision found while building
    pub fn conflicts(&self) -> &[KeybindConflict] {
        &self.conflicts
    }

    /// The merged action → key tables the lookup was built from
    pub fn bindings(&self) -> &Keybinds {
        &self.bindings
    }

    /// One `key  label` line per reachable action in `mode`, in declaration
    /// order. Actions shadowed by a conflict are left out.
    pub fn help_lines(&self, mode: MapMode) -> Vec<String> {
        self.bindings
            .for_mode(mode)
            .iter()
            .filter(|(action, key)| self.resolve(mode, key.as_str()) == Some(**action))
            .map(|(action, key)| format!("{key:<10} {}", action.label()))
            .collect()
    }

    fn table(&self, mode: MapMode) -> &HashMap<Key, ActionId> {
        match mode {
            MapMode::Select => &self.select,
            MapMode::Edit => &self.edit,
        }
    }
}

impl Default for ActionMappings {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Invert action → key into key → action, first-declared action winning
fn invert(mode: MapMode, bindings: &ModeBindings) -> (HashMap<Key, ActionId>, Vec<KeybindConflict>) {
    let mut by_key: IndexMap<&Key, Vec<ActionId>> = IndexMap::new();
    for (action, key) in bindings {
        by_key.entry(key).or_default().push(*action);
    }

    let mut table = HashMap::with_capacity(by_key.len());
    let mut conflicts = Vec::new();
    for (key, actions) in by_key {
        table.insert(key.clone(), actions[0]);
        if actions.len() > 1 {
            conflicts.push(KeybindConflict {
                mode,
                key: key.clone(),
                actions,
            });
        }
    }
    (table, conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_conflicts() {
        let mappings = ActionMappings::defaults();
        assert!(mappings.conflicts().is_empty());
        assert_eq!(mappings.resolve(MapMode::Select, "e"), Some(ActionId::SwitchToEditMode));
        assert_eq!(mappings.resolve(MapMode::Edit, "s"), Some(ActionId::SwitchToSelectMode));
    }

    #[test]
    fn same_key_means_different_things_per_mode() {
        let mappings = ActionMappings::defaults();
        assert_eq!(mappings.resolve(MapMode::Select, "Backspace"), Some(ActionId::DeleteFeature));
        assert_eq!(mappings.resolve(MapMode::Edit, "Backspace"), Some(ActionId::UndoPreviousEdit));
    }

    #[test]
    fn unbound_key_resolves_to_nothing() {
        let mappings = ActionMappings::defaults();
        assert_eq!(mappings.resolve(MapMode::Select, "q"), None);
        assert_eq!(mappings.resolve(MapMode::Select, "Enter"), None);
    }

    #[test]
    fn override_moves_action_to_new_key() {
        let overrides =
            KeybindOverrides::none().with(MapMode::Select, ActionId::DeleteFeature, "x");
        let mappings = ActionMappings::build(&Keybinds::defaults(), &overrides);

        assert_eq!(mappings.resolve(MapMode::Select, "x"), Some(ActionId::DeleteFeature));
        assert_eq!(mappings.resolve(MapMode::Select, "Backspace"), None);
        // Other mode untouched
        assert_eq!(mappings.resolve(MapMode::Edit, "Backspace"), Some(ActionId::UndoPreviousEdit));
    }

    #[test]
    fn conflict_keeps_first_declared_action() {
        // commitToPolygon is declared before commitFeature
        let overrides =
            KeybindOverrides::none().with(MapMode::Edit, ActionId::CommitFeature, "p");
        let mappings = ActionMappings::build(&Keybinds::defaults(), &overrides);

        assert_eq!(mappings.resolve(MapMode::Edit, "p"), Some(ActionId::CommitToPolygon));
        assert_eq!(mappings.resolve(MapMode::Edit, "Enter"), None);

        let conflicts = mappings.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].mode, MapMode::Edit);
        assert_eq!(conflicts[0].key, Key::from("p"));
        assert_eq!(
            conflicts[0].actions,
            vec![ActionId::CommitToPolygon, ActionId::CommitFeature]
        );
        assert!(conflicts[0].to_string().contains("commitFeature"));
        assert_eq!(conflicts[0].kept(), Some(ActionId::CommitToPolygon));
    }

    #[test]
    fn empty_conflict_keeps_nothing() {
        let conflict = KeybindConflict {
            mode: MapMode::Select,
            key: Key::from("x"),
            actions: Vec::new(),
        };
        assert_eq!(conflict.kept(), None);
    }

    #[test]
    fn build_is_deterministic() {
        let overrides = KeybindOverrides::none()
            .with(MapMode::Edit, ActionId::UndoAllEdits, "l")
            .with(MapMode::Edit, ActionId::CommitToMarker, "l");
        for _ in 0..10 {
            let mappings = ActionMappings::build(&Keybinds::defaults(), &overrides);
            assert_eq!(mappings.resolve(MapMode::Edit, "l"), Some(ActionId::CommitToPolyline));
            assert_eq!(mappings.conflicts()[0].actions.len(), 3);
        }
    }

    #[test]
    fn help_lists_reachable_actions_only() {
        let overrides =
            KeybindOverrides::none().with(MapMode::Edit, ActionId::CommitFeature, "p");
        let mappings = ActionMappings::build(&Keybinds::defaults(), &overrides);

        let help = mappings.help_lines(MapMode::Edit);
        assert_eq!(help.len(), 6);
        assert!(help.iter().any(|line| line.starts_with("p") && line.ends_with("Polygon")));
        assert!(!help.iter().any(|line| line.ends_with("Save feature")));
    }
}
