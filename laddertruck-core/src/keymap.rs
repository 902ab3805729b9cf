/// Key bindings and the keymap file parser
///
/// A keymap file holds one `key = command` binding per line. Keys are bare
/// symbolic names (`ArrowUp`, `q`, `0`) or a quoted single character
/// (`' '`). `#` starts a comment.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{anychar, char, space0},
    combinator::{all_consuming, map, opt, rest},
    sequence::{delimited, preceded},
    IResult,
};
use tracing::debug;

use crate::error::SceneError;
use crate::input::Command;

const DEFAULT_BINDINGS: [(&str, Command); 24] = [
    ("h", Command::ToggleHelp),
    ("0", Command::ToggleQuadView),
    ("1", Command::FrontView),
    ("2", Command::LeftView),
    ("3", Command::TopView),
    ("4", Command::OrbitView),
    (" ", Command::ToggleWireframe),
    ("q", Command::RotateLadderCcw),
    ("e", Command::RotateLadderCw),
    ("w", Command::RaiseLadder),
    ("s", Command::LowerLadder),
    ("o", Command::ExtendLadder),
    ("p", Command::RetractLadder),
    ("a", Command::MoveForward),
    ("d", Command::MoveBackward),
    ("r", Command::ResetView),
    ("ArrowLeft", Command::AzimuthIncrease),
    ("ArrowRight", Command::AzimuthDecrease),
    ("ArrowUp", Command::ElevationIncrease),
    ("ArrowDown", Command::ElevationDecrease),
    ("j", Command::ToggleBeacon),
    ("k", Command::ToggleLeftBlinker),
    ("l", Command::ToggleRightBlinker),
    ("n", Command::ToggleDangerLights),
];

/// Symbolic key name to command
#[derive(Debug, Clone, PartialEq)]
pub struct Keymap {
    bindings: HashMap<String, Command>,
}

impl Keymap {
    /// A keymap with no bindings
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn lookup(&self, key: &str) -> Option<Command> {
        self.bindings.get(key).copied()
    }

    pub fn bind(&mut self, key: impl Into<String>, command: Command) {
        self.bindings.insert(key.into(), command);
    }

    /// Keys bound to `command`, sorted
    pub fn keys_for(&self, command: Command) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .bindings
            .iter()
            .filter(|(_, c)| **c == command)
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Apply the bindings in `source` on top of this keymap
    pub fn apply_overrides(&mut self, source: &str) -> Result<usize, SceneError> {
        let mut applied = 0;
        for (index, line) in source.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (_, (key, name)) =
                all_consuming(binding)(trimmed).map_err(|_| SceneError::Keymap {
                    line: index + 1,
                    message: format!("expected `key = command`, found `{trimmed}`"),
                })?;
            let command = Command::from_name(name).ok_or_else(|| SceneError::UnknownCommand {
                line: index + 1,
                name: name.to_string(),
            })?;
            debug!(key = key.as_str(), command = command.name(), "keymap override");
            self.bind(key, command);
            applied += 1;
        }
        Ok(applied)
    }

    /// Default bindings with the overrides from the file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut keymap = Self::default();
        keymap.apply_overrides(&source)?;
        Ok(keymap)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::empty();
        for (key, command) in DEFAULT_BINDINGS {
            keymap.bind(key, command);
        }
        keymap
    }
}

fn quoted_key(input: &str) -> IResult<&str, String> {
    map(delimited(char('\''), anychar, char('\'')), String::from)(input)
}

fn bare_key(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.')),
        String::from,
    )(input)
}

fn command_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_lowercase() || c == '_')(input)
}

/// `key = command [# comment]`
fn binding(input: &str) -> IResult<&str, (String, &str)> {
    let (input, key) = alt((quoted_key, bare_key))(input)?;
    let (input, _) = delimited(space0, char('='), space0)(input)?;
    let (input, name) = command_name(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = opt(preceded(char('#'), rest))(input)?;
    Ok((input, (key, name)))
}
