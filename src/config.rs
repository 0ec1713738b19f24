//! Configuration management for Pdfpress Server

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub renderer: RendererConfig,
    pub pdf: PdfOptionsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// How the headless Chromium process is launched.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Explicit browser executable. When unset the engine auto-detects
    /// an installed Chrome/Chromium.
    pub executable: Option<PathBuf>,
    /// Pass `--no-sandbox` to the browser. Required in most containers.
    pub no_sandbox: bool,
}

/// Options forwarded to the engine's print-to-PDF call.
///
/// Margins are CSS-style length strings (`"10mm"`, `"0.5in"`, `"36pt"`,
/// `"96px"`, or a bare number of inches). They are parsed once at startup.
#[derive(Debug, Clone)]
pub struct PdfOptionsConfig {
    pub print_background: bool,
    pub margin_top: String,
    pub margin_bottom: String,
    pub margin_left: String,
    pub margin_right: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            renderer: RendererConfig {
                executable: None,
                no_sandbox: false,
            },
            pdf: PdfOptionsConfig {
                print_background: true,
                margin_top: "10mm".to_string(),
                margin_bottom: "10mm".to_string(),
                margin_left: "10mm".to_string(),
                margin_right: "10mm".to_string(),
            },
        }
    }
}

impl Config {
    /// Build a configuration from the process environment.
    ///
    /// Every key is optional; missing or unparseable values fall back to
    /// the defaults above.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            renderer: RendererConfig {
                executable: env::var("CHROME_PATH").ok().map(PathBuf::from),
                no_sandbox: env::var("CHROME_NO_SANDBOX")
                    .ok()
                    .and_then(|v| parse_bool(&v))
                    .unwrap_or(defaults.renderer.no_sandbox),
            },
            pdf: PdfOptionsConfig {
                print_background: env::var("PDF_PRINT_BACKGROUND")
                    .ok()
                    .and_then(|v| parse_bool(&v))
                    .unwrap_or(defaults.pdf.print_background),
                margin_top: env::var("PDF_MARGIN_TOP").unwrap_or(defaults.pdf.margin_top),
                margin_bottom: env::var("PDF_MARGIN_BOTTOM").unwrap_or(defaults.pdf.margin_bottom),
                margin_left: env::var("PDF_MARGIN_LEFT").unwrap_or(defaults.pdf.margin_left),
                margin_right: env::var("PDF_MARGIN_RIGHT").unwrap_or(defaults.pdf.margin_right),
            },
        }
    }
}

/// Lenient boolean parsing for env flags.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
