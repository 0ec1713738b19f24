//! Renderer error types

use thiserror::Error;

/// Errors from the rendering-engine wrapper.
#[derive(Error, Debug)]
pub enum RendererError {
    /// A margin string in the configuration could not be parsed.
    #[error("invalid length '{0}' (expected e.g. \"10mm\", \"0.5in\", \"36pt\")")]
    InvalidLength(String),

    /// The browser launch configuration was rejected before launch.
    #[error("invalid browser launch configuration: {0}")]
    LaunchConfig(String),

    /// Any failure inside the browser: launch, navigation, printing.
    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
