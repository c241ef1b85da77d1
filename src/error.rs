use std::path::PathBuf;
use thiserror::Error;

/// Shown for any failure that is not a server-reported error.
pub const UNEXPECTED_ERROR: &str = "Unexpected error occurred.";

/// Errors from a single dispatch against the recipe service.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Non-2xx response; `message` is the server's `detail` or the fallback
    /// for the request kind.
    #[error("Recipe service error: HTTP {status} - {message}")]
    Server { status: u16, message: String },

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Text stored as the view's error state.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Server { message, .. } => message.clone(),
            FetchError::Transport(_) | FetchError::Decode(_) => UNEXPECTED_ERROR.to_string(),
        }
    }
}

/// Errors while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors while attaching an image file.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("No image path given")]
    NoPath,

    #[error("Image file is empty: {0}")]
    Empty(PathBuf),

    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors from the non-interactive `lookup` command.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{}", crate::app::INPUT_REQUIRED)]
    InputRequired,

    #[error(transparent)]
    Image(#[from] ImageError),

    /// The message the view would have shown as its error state.
    #[error("{0}")]
    Fetch(String),
}

impl LookupError {
    /// Usage problems exit with 2, like clap's own argument errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            LookupError::InputRequired => 2,
            LookupError::Image(_) | LookupError::Fetch(_) => 1,
        }
    }
}
