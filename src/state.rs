//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::renderer::{PdfOptions, Renderer, RendererError};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to initialize renderer: {0}")]
    RendererInit(#[from] RendererError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    renderer: Renderer,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Resolves the PDF options up front so a bad margin configuration
    /// fails at startup instead of on the first request. The browser
    /// itself is not launched here; the renderer starts it lazily.
    pub fn new(config: Config) -> Result<Self, StateError> {
        let options = PdfOptions::from_config(&config.pdf)?;
        let renderer = Renderer::new(config.renderer.clone(), options);

        Ok(Self {
            inner: Arc::new(AppStateInner { config, renderer }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the shared renderer
    pub fn renderer(&self) -> &Renderer {
        &self.inner.renderer
    }

    /// Shutdown the renderer gracefully
    ///
    /// Called before the process exits so the browser child process is
    /// not left behind.
    pub async fn shutdown(&self) -> Result<(), RendererError> {
        tracing::info!("Shutting down application state...");
        self.inner.renderer.shutdown().await
    }
}
