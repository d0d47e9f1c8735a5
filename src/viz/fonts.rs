//! Font registration for bitmap output.
//!
//! The `ab_glyph` text path does not discover OS fonts. SVG output only
//! writes `<text>` elements and needs no font data, but rasterizing PNGs does,
//! so a TrueType/OpenType file has to be registered first.

use anyhow::{Context, Result, anyhow};
use log::debug;
use plotters::style::{FontStyle, register_font};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

static FONT_READY: AtomicBool = AtomicBool::new(false);

/// Register `path` as the `sans-serif` family used by all chart text.
pub fn register_font_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    // Plotters keeps a reference for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font("sans-serif", FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("{} is not a usable TrueType/OpenType font", path.display()))?;
    FONT_READY.store(true, Ordering::SeqCst);
    debug!("registered font {}", path.display());
    Ok(())
}

pub fn font_registered() -> bool {
    FONT_READY.load(Ordering::SeqCst)
}
