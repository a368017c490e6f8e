use std::str::FromStr;

use palette::Srgb;
use plotters::style::RGBColor;

use crate::error::TopoError;

// ---------------------------------------------------------------------------
// Color parsing: config string → RGBColor
// ---------------------------------------------------------------------------

/// Parse a marker color.
///
/// Accepts the CSS/SVG color names matplotlib understands (`orange`,
/// `green`, `black`, ...) and `#rrggbb` hex.
pub fn parse_color(spec: &str) -> Result<RGBColor, TopoError> {
    let spec = spec.trim();
    let rgb: Srgb<u8> = if spec.starts_with('#') {
        Srgb::from_str(spec).map_err(|_| TopoError::UnknownColor(spec.to_string()))?
    } else {
        palette::named::from_str(&spec.to_ascii_lowercase())
            .ok_or_else(|| TopoError::UnknownColor(spec.to_string()))?
    };
    Ok(RGBColor(rgb.red, rgb.green, rgb.blue))
}
