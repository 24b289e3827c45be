// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Line-oriented input events for driving an editor without a map widget.
//!
//! One event per line:
//!
//! ```text
//! key Enter
//! click 25.72 -100.31
//! view 25.72 -100.31 12
//! title Old bridge
//! body Built in 1890
//! navigate 7
//! quit
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::model::{MapId, Point};
use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;

/// Failure to understand an input line
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("`{command}` is missing its {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("`{command}` takes no more than {expected} arguments")]
    TrailingArguments {
        command: &'static str,
        expected: usize,
    },

    #[error("invalid number `{value}`")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("invalid map id `{value}`")]
    InvalidMapId {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// A single user action fed to the editor
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A named key press, e.g. `e` or `Backspace`
    Key(String),
    /// A pointer click at a map position
    Click(Point),
    /// Pan and zoom the map
    View { center: Point, zoom: f64 },
    /// Replace the metadata editor's title
    Title(String),
    /// Replace the metadata editor's body
    Body(String),
    /// Switch the app to another map
    Navigate(MapId),
    /// Print the key bindings for the current mode
    Help,
    Quit,
}

impl FromStr for InputEvent {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "key" => {
                let key = word(rest, "key", "key name")?;
                Ok(InputEvent::Key(key.to_string()))
            }
            "click" => {
                let [lat, lng] = numbers::<2>(rest, "click")?;
                Ok(InputEvent::Click(Point::new(lat, lng)))
            }
            "view" => {
                let [lat, lng, zoom] = numbers::<3>(rest, "view")?;
                Ok(InputEvent::View {
                    center: Point::new(lat, lng),
                    zoom,
                })
            }
            "title" => Ok(InputEvent::Title(rest.to_string())),
            "body" => Ok(InputEvent::Body(rest.to_string())),
            "navigate" => {
                let value = word(rest, "navigate", "map id")?;
                let id = value.parse().map_err(|source| InputError::InvalidMapId {
                    value: value.to_string(),
                    source,
                })?;
                Ok(InputEvent::Navigate(MapId(id)))
            }
            "help" => Ok(InputEvent::Help),
            "quit" | "exit" => Ok(InputEvent::Quit),
            other => Err(InputError::UnknownCommand(other.to_string())),
        }
    }
}

/// Parse one line, skipping blanks and comments
pub fn parse_line(line: &str) -> Result<Option<InputEvent>, InputError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

fn word<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, InputError> {
    let mut words = rest.split_whitespace();
    let first = words.next().ok_or(InputError::MissingArgument { command, argument })?;
    if words.next().is_some() {
        return Err(InputError::TrailingArguments {
            command,
            expected: 1,
        });
    }
    Ok(first)
}

fn numbers<const N: usize>(rest: &str, command: &'static str) -> Result<[f64; N], InputError> {
    const NAMES: [&str; 3] = ["latitude", "longitude", "zoom"];

    let mut values = [0.0; N];
    let mut words = rest.split_whitespace();
    for (i, slot) in values.iter_mut().enumerate() {
        let value = words.next().ok_or(InputError::MissingArgument {
            command,
            argument: NAMES[i.min(NAMES.len() - 1)],
        })?;
        *slot = value.parse().map_err(|source| InputError::InvalidNumber {
            value: value.to_string(),
            source,
        })?;
    }
    if words.next().is_some() {
        return Err(InputError::TrailingArguments {
            command,
            expected: N,
        });
    }
    Ok(values)
}
