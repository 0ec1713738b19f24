//! Rendering engine wrapper
//!
//! Drives a shared headless Chromium process over the DevTools protocol.
//! The browser is expensive to launch, so one instance is started lazily
//! on the first conversion and reused by every later request; each
//! request gets its own short-lived page so concurrent conversions do
//! not interfere.
//!
//! # Lifecycle
//!
//! ```text
//! Renderer::new()          cheap, nothing launched
//!     │
//! render_html() ──► engine() ──► launch once (OnceCell guard)
//!     │                              │
//!     │                        handler event loop task
//!     ▼
//! new page → set content → print to PDF → close page
//!     │
//! shutdown() ──► close browser, join event loop
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::{Mutex, OnceCell};
use tokio::task::JoinHandle;

mod error;
mod options;

pub use error::RendererError;
pub use options::{PdfOptions, A4_HEIGHT_IN, A4_WIDTH_IN};

use crate::config::RendererConfig;

/// Shared HTML→PDF renderer.
///
/// Cheap to create and clone-free: wrap it in the application state and
/// share by reference. The underlying browser launches on first use.
pub struct Renderer {
    config: RendererConfig,
    options: PdfOptions,
    engine: OnceCell<Engine>,
    launches: AtomicUsize,
}

/// The live browser plus the task draining its event stream.
struct Engine {
    browser: Mutex<Browser>,
    event_loop: Mutex<Option<JoinHandle<()>>>,
}

impl Renderer {
    /// Create a renderer. Does not launch the browser.
    pub fn new(config: RendererConfig, options: PdfOptions) -> Self {
        Self {
            config,
            options,
            engine: OnceCell::new(),
            launches: AtomicUsize::new(0),
        }
    }

    /// Render an HTML string to A4 PDF bytes.
    pub async fn render_html(&self, html: &str) -> Result<Vec<u8>, RendererError> {
        let engine = self.engine().await?;

        // Each conversion gets an isolated page. The browser lock is
        // held only for target creation, not for the render itself.
        let page = {
            let browser = engine.browser.lock().await;
            browser.new_page("about:blank").await?
        };

        let rendered = self.print_page(&page, html).await;

        if let Err(e) = page.close().await {
            tracing::warn!("Failed to close rendering page: {}", e);
        }

        rendered
    }

    /// Read an HTML file from disk and render it to A4 PDF bytes.
    pub async fn render_file(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, RendererError> {
        let html = tokio::fs::read_to_string(path.as_ref()).await?;
        self.render_html(&html).await
    }

    /// How many times a browser has been launched. Stays at 1 for the
    /// lifetime of a healthy process.
    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::Relaxed)
    }

    /// Close the browser process and join its event loop.
    ///
    /// Called once from `main` after the HTTP server has drained. A
    /// renderer that never served a request has nothing to close.
    pub async fn shutdown(&self) -> Result<(), RendererError> {
        let Some(engine) = self.engine.get() else {
            return Ok(());
        };

        tracing::info!("Closing Chromium browser...");
        {
            let mut browser = engine.browser.lock().await;
            browser.close().await?;
        }

        // The event stream ends once the browser is gone, so the task
        // finishes on its own.
        if let Some(task) = engine.event_loop.lock().await.take() {
            let _ = task.await;
        }

        tracing::info!("Chromium browser closed");
        Ok(())
    }

    /// Get the shared engine, launching it on first use.
    ///
    /// `OnceCell` gives the check-lock-check semantics we need under
    /// concurrent first requests: exactly one caller runs `launch`, the
    /// rest wait for its result. A failed launch leaves the cell empty
    /// so the next request retries.
    async fn engine(&self) -> Result<&Engine, RendererError> {
        self.engine.get_or_try_init(|| self.launch()).await
    }

    async fn launch(&self) -> Result<Engine, RendererError> {
        let mut builder = BrowserConfig::builder();
        if let Some(executable) = &self.config.executable {
            builder = builder.chrome_executable(executable);
        }
        if self.config.no_sandbox {
            builder = builder.no_sandbox();
        }
        let browser_config = builder.build().map_err(RendererError::LaunchConfig)?;

        tracing::info!("Launching headless Chromium...");
        let (browser, mut handler) = Browser::launch(browser_config).await?;

        // The handler multiplexes every CDP message; it must be polled
        // for the browser connection to make progress.
        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        self.launches.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Chromium browser ready");

        Ok(Engine {
            browser: Mutex::new(browser),
            event_loop: Mutex::new(Some(event_loop)),
        })
    }

    async fn print_page(&self, page: &Page, html: &str) -> Result<Vec<u8>, RendererError> {
        page.set_content(html).await?;
        page.wait_for_navigation().await?;

        let pdf = page.pdf(self.options.print_params()).await?;
        Ok(pdf)
    }
}
