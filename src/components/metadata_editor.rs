// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Title/body editor for the selected feature's metadata

use crate::model::FeatureProperties;

/// Surface where the user edits a feature's name and description
///
/// The editor session reads it when a feature is deselected and fills it
/// when a feature is selected.
pub trait MetadataEditor {
    fn title(&self) -> String;
    fn set_title(&mut self, title: String);
    fn body(&self) -> String;
    fn set_body(&mut self, body: String);

    /// Current contents as feature properties
    fn contents(&self) -> FeatureProperties {
        FeatureProperties::new(self.title(), self.body())
    }

    /// Show `properties`
    fn show(&mut self, properties: &FeatureProperties) {
        self.set_title(properties.name.clone());
        self.set_body(properties.description.clone());
    }

    fn clear(&mut self) {
        self.set_title(String::new());
        self.set_body(String::new());
    }
}

/// Plain two-field text editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEditor {
    title: String,
    body: String,
}

impl TextEditor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataEditor for TextEditor {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: String) {
        self.title = title;
    }

    fn body(&self) -> String {
        self.body.clone()
    }

    fn set_body(&mut self, body: String) {
        self.body = body;
    }
}
