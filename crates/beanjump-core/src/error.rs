/// Failure while assembling the assets a scene needs. Fatal for scene setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// A sprite referenced by the scene is not in the asset library.
    MissingAsset(String),
    /// Sprite metadata could not be parsed.
    Metadata { name: String, reason: String },
    /// The browser failed to fetch or decode a file.
    Fetch { path: String, reason: String },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAsset(name) => write!(f, "missing sprite asset '{name}'"),
            Self::Metadata { name, reason } => {
                write!(f, "bad sprite metadata for '{name}': {reason}")
            },
            Self::Fetch { path, reason } => write!(f, "failed to load {path}: {reason}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Failure to start an animation on a sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimError {
    Undefined { sheet: String, anim: String },
}

impl std::fmt::Display for AnimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined { sheet, anim } => {
                write!(f, "sprite '{sheet}' has no animation '{anim}'")
            },
        }
    }
}

impl std::error::Error for AnimError {}
