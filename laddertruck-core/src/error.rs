/// Configuration errors reported during scene setup
use std::path::PathBuf;

use crate::render::PrimitiveKind;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The renderer cannot draw a primitive the assembly needs
    #[error("renderer has no primitive registered for {0}")]
    MissingPrimitive(PrimitiveKind),

    /// A keymap line did not have the `key = command` shape
    #[error("keymap line {line}: {message}")]
    Keymap { line: usize, message: String },

    /// A keymap line named a command that does not exist
    #[error("keymap line {line}: unknown command `{name}`")]
    UnknownCommand { line: usize, name: String },

    #[error("failed to read keymap {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
