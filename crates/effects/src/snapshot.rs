//! PNG snapshots of a [`RasterSurface`].
//!
//! This module is feature-gated behind `png` (default on) so that WASM
//! builds can depend on the `effects` crate without pulling in the `image`
//! crate. The pixel production itself lives in [`crate::raster`] (always
//! available).

use std::path::Path;

use storyline_fx_core::error::FxError;

use crate::raster::RasterSurface;

/// Writes the surface contents as a PNG image.
///
/// Returns `FxError::Io` if the dimensions overflow the PNG limits or the
/// file cannot be written.
pub fn write_png(surface: &RasterSurface, path: &Path) -> Result<(), FxError> {
    let w = u32::try_from(surface.width())
        .map_err(|_| FxError::Io("surface width overflows u32".into()))?;
    let h = u32::try_from(surface.height())
        .map_err(|_| FxError::Io("surface height overflows u32".into()))?;
    let img = image::RgbaImage::from_raw(w, h, surface.pixels().to_vec())
        .ok_or_else(|| FxError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FxError::Io(e.to_string()))
}
