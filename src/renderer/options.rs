//! Print-to-PDF options
//!
//! Converts the margin strings from the configuration into the inch
//! floats the DevTools `Page.printToPDF` call expects, and builds the
//! final parameter struct. Paper size is fixed A4.

use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;

use super::RendererError;
use crate::config::PdfOptionsConfig;

/// A4 paper width in inches (210mm).
pub const A4_WIDTH_IN: f64 = 8.27;
/// A4 paper height in inches (297mm).
pub const A4_HEIGHT_IN: f64 = 11.69;

/// Resolved PDF rendering options. All lengths are in inches.
#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub print_background: bool,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
}

impl PdfOptions {
    /// Parse the configured margin strings. Fails fast on malformed
    /// values so a bad deployment never reaches the first request.
    pub fn from_config(config: &PdfOptionsConfig) -> Result<Self, RendererError> {
        Ok(Self {
            print_background: config.print_background,
            margin_top: parse_length(&config.margin_top)?,
            margin_bottom: parse_length(&config.margin_bottom)?,
            margin_left: parse_length(&config.margin_left)?,
            margin_right: parse_length(&config.margin_right)?,
        })
    }

    /// Build the DevTools print parameters for one conversion.
    pub fn print_params(&self) -> PrintToPdfParams {
        PrintToPdfParams {
            print_background: Some(self.print_background),
            paper_width: Some(A4_WIDTH_IN),
            paper_height: Some(A4_HEIGHT_IN),
            margin_top: Some(self.margin_top),
            margin_bottom: Some(self.margin_bottom),
            margin_left: Some(self.margin_left),
            margin_right: Some(self.margin_right),
            ..Default::default()
        }
    }
}

/// Conversion factors to inches, keyed by unit suffix.
const UNITS: [(&str, f64); 5] = [
    ("mm", 25.4),
    ("cm", 2.54),
    ("in", 1.0),
    ("pt", 72.0),
    ("px", 96.0),
];

/// Parse a CSS-style length string into inches.
///
/// Accepts `mm`, `cm`, `in`, `pt` and `px` suffixes; a bare number is
/// taken as inches (the protocol's native unit). Negative and
/// non-finite values are rejected.
pub fn parse_length(value: &str) -> Result<f64, RendererError> {
    let trimmed = value.trim();

    for (suffix, per_inch) in UNITS {
        if let Some(number) = trimmed.strip_suffix(suffix) {
            return to_inches(number.trim_end(), per_inch, value);
        }
    }

    to_inches(trimmed, 1.0, value)
}

fn to_inches(number: &str, per_inch: f64, original: &str) -> Result<f64, RendererError> {
    let parsed: f64 = number
        .parse()
        .map_err(|_| RendererError::InvalidLength(original.to_string()))?;

    if !parsed.is_finite() || parsed < 0.0 {
        return Err(RendererError::InvalidLength(original.to_string()));
    }

    Ok(parsed / per_inch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PdfOptionsConfig;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_parse_length_units() {
        assert!(close(parse_length("25.4mm").unwrap(), 1.0));
        assert!(close(parse_length("2.54cm").unwrap(), 1.0));
        assert!(close(parse_length("1in").unwrap(), 1.0));
        assert!(close(parse_length("72pt").unwrap(), 1.0));
        assert!(close(parse_length("96px").unwrap(), 1.0));
        assert!(close(parse_length("10mm").unwrap(), 10.0 / 25.4));
    }

    #[test]
    fn test_parse_length_bare_number_is_inches() {
        assert!(close(parse_length("0.5").unwrap(), 0.5));
        assert!(close(parse_length(" 2 ").unwrap(), 2.0));
    }

    #[test]
    fn test_parse_length_spacing() {
        assert!(close(parse_length(" 10 mm ").unwrap(), 10.0 / 25.4));
    }

    #[test]
    fn test_parse_length_rejects_garbage() {
        assert!(parse_length("abc").is_err());
        assert!(parse_length("10km").is_err());
        assert!(parse_length("").is_err());
        assert!(parse_length("-1in").is_err());
        assert!(parse_length("NaN").is_err());
    }

    #[test]
    fn test_print_params_a4_with_margins() {
        let config = PdfOptionsConfig {
            print_background: false,
            margin_top: "1in".to_string(),
            margin_bottom: "0".to_string(),
            margin_left: "25.4mm".to_string(),
            margin_right: "72pt".to_string(),
        };

        let options = PdfOptions::from_config(&config).unwrap();
        let params = options.print_params();

        assert_eq!(params.print_background, Some(false));
        assert_eq!(params.paper_width, Some(A4_WIDTH_IN));
        assert_eq!(params.paper_height, Some(A4_HEIGHT_IN));
        assert_eq!(params.margin_top, Some(1.0));
        assert_eq!(params.margin_bottom, Some(0.0));
        assert_eq!(params.margin_left, Some(1.0));
        assert_eq!(params.margin_right, Some(1.0));
        assert_eq!(params.landscape, None);
        assert_eq!(params.page_ranges, None);
    }

    #[test]
    fn test_from_config_surfaces_bad_margin() {
        let config = PdfOptionsConfig {
            print_background: true,
            margin_top: "wide".to_string(),
            margin_bottom: "10mm".to_string(),
            margin_left: "10mm".to_string(),
            margin_right: "10mm".to_string(),
        };

        assert!(matches!(
            PdfOptions::from_config(&config),
            Err(RendererError::InvalidLength(v)) if v == "wide"
        ));
    }
}
