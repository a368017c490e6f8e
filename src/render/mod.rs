/// Rendering: topology → pixels → PNG.
///
/// ```text
///   Topology ──► plot::render ──► RgbImage ──► export::crop_tight ──► export::save_png
///                    │
///                    └── font::ensure_registered (tick labels, annotations)
/// ```

pub mod export;
pub mod font;
pub mod plot;
