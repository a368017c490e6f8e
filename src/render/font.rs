use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::style::{register_font, FontStyle};

use crate::error::TopoError;

/// Family name every text element is drawn with.
pub const FAMILY: &str = "sans-serif";

const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED: OnceLock<PathBuf> = OnceLock::new();

/// sfnt version tags: TrueType, OpenType/CFF, Apple TrueType, collection.
const SFNT_TAGS: [[u8; 4]; 4] = [[0, 1, 0, 0], *b"OTTO", *b"true", *b"ttcf"];

/// Make a font available to plotters under [`FAMILY`].
///
/// The registry is process-wide and only the first successful call loads
/// anything. An explicit font is always read and checked, so a bad path is
/// reported even after another font was registered; a valid one that differs
/// from the registered font is logged and ignored. Returns `Ok(false)` when
/// no font was given and none of the usual system fonts exist.
pub fn ensure_registered(explicit: Option<&Path>) -> Result<bool, TopoError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            if let Some(path) = REGISTERED.get() {
                log::debug!("Font already registered from {}", path.display());
                return Ok(true);
            }
            match CANDIDATES.iter().map(Path::new).find(|p| p.is_file()) {
                Some(p) => p.to_path_buf(),
                None => return Ok(false),
            }
        }
    };

    let bytes = read_font(&path)?;

    if let Some(current) = REGISTERED.get() {
        if *current != path {
            log::warn!(
                "Font {} ignored, {} is already in use for this process",
                path.display(),
                current.display()
            );
        }
        return Ok(true);
    }

    // plotters keeps a reference for the rest of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FAMILY, FontStyle::Normal, bytes).map_err(|_| TopoError::Font {
        path: path.clone(),
        reason: "not a valid TrueType font".into(),
    })?;

    log::info!("Using font {}", path.display());
    let _ = REGISTERED.set(path);
    Ok(true)
}

fn read_font(path: &Path) -> Result<Vec<u8>, TopoError> {
    let bytes = std::fs::read(path).map_err(|e| TopoError::io(path, e))?;
    let tagged = bytes
        .get(..4)
        .is_some_and(|tag| SFNT_TAGS.iter().any(|t| t == tag));
    if !tagged {
        return Err(TopoError::Font {
            path: path.to_path_buf(),
            reason: "not a TrueType or OpenType file".into(),
        });
    }
    Ok(bytes)
}
