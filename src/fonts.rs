use std::{
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
};

use crate::foundation::{
    error::{InsigniaError, InsigniaResult},
    math::Fnv1a64,
};

/// Shipped primary face: an opaque byte blob under `<fonts_dir>/`.
const PRIMARY_SOURCE: &str = "primary.font";
/// Fallback face, read directly.
const FALLBACK_FILE: &str = "fallback.ttf";

/// The two font faces of the mark, loaded once per process.
///
/// The primary face is materialized to a derived file in the OS temp
/// directory before loading; a repeated initialization finds the derived
/// file already present and skips the write. The derived name is keyed on
/// the fonts directory so distinct roots never collide.
#[derive(Clone, Debug)]
pub struct FontLibrary {
    pub primary: Arc<Vec<u8>>,
    pub fallback: Arc<Vec<u8>>,
}

static LIBRARY: OnceLock<FontLibrary> = OnceLock::new();

/// Acquire the process-wide [`FontLibrary`], loading it on first call.
///
/// Safe under concurrent first-call races: losers of the race drop their
/// load and observe the winner's library.
pub fn font_library(fonts_dir: &Path) -> InsigniaResult<&'static FontLibrary> {
    if let Some(lib) = LIBRARY.get() {
        return Ok(lib);
    }
    let loaded = load_library(fonts_dir)?;
    Ok(LIBRARY.get_or_init(|| loaded))
}

fn load_library(fonts_dir: &Path) -> InsigniaResult<FontLibrary> {
    let derived = materialize_primary(fonts_dir)?;
    let primary = read_font(&derived)?;
    let fallback = read_font(&fonts_dir.join(FALLBACK_FILE))?;
    Ok(FontLibrary {
        primary: Arc::new(primary),
        fallback: Arc::new(fallback),
    })
}

/// Write the shipped primary blob to its derived location, once.
fn materialize_primary(fonts_dir: &Path) -> InsigniaResult<PathBuf> {
    let derived = derived_primary_path(fonts_dir);
    if derived.exists() {
        return Ok(derived);
    }

    let source = fonts_dir.join(PRIMARY_SOURCE);
    let bytes = std::fs::read(&source).map_err(|e| {
        InsigniaError::asset_load(format!("read primary font '{}': {e}", source.display()))
    })?;
    std::fs::write(&derived, &bytes).map_err(|e| {
        InsigniaError::asset_load(format!(
            "materialize primary font to '{}': {e}",
            derived.display()
        ))
    })?;
    Ok(derived)
}

fn derived_primary_path(fonts_dir: &Path) -> PathBuf {
    let mut hasher = Fnv1a64::new_default();
    hasher.write_bytes(fonts_dir.as_os_str().as_encoded_bytes());
    std::env::temp_dir().join(format!("insignia-primary-{:016x}.otf", hasher.finish()))
}

fn read_font(path: &Path) -> InsigniaResult<Vec<u8>> {
    let bytes = std::fs::read(path).map_err(|e| {
        InsigniaError::asset_load(format!("read font '{}': {e}", path.display()))
    })?;
    if bytes.is_empty() {
        return Err(InsigniaError::asset_load(format!(
            "font '{}' is empty",
            path.display()
        )));
    }
    Ok(bytes)
}
