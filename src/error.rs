use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::renderer::DrawTarget;

/// Anything that stops the window from ever appearing.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid grid geometry: {0}")]
    InvalidGeometry(String),

    #[error("font could not be loaded from {}: {source}", path.display())]
    FontMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("font could not be registered with the text system: {0}")]
    FontRegistration(String),

    #[error("window could not be created: {0}")]
    Window(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to rasterize {target}: {message}")]
    Rasterize { target: DrawTarget, message: String },
}
