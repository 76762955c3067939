//! Locating and binding the pdfium shared library.
//!
//! Resolution order (first match wins):
//!
//! 1. `PDFIUM_LIB_PATH`: a library file, or a directory holding the
//!    platform-named library (`libpdfium.so`, `libpdfium.dylib`, `pdfium.dll`).
//! 2. The platform-named library in the current working directory.
//! 3. The system library search path.

use crate::error::StitchError;
use pdfium_render::prelude::Pdfium;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit pdfium library or directory.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to pdfium following the resolution order above.
pub fn bind_pdfium() -> Result<Pdfium, StitchError> {
    if let Ok(env_path) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        let p = PathBuf::from(env_path);
        if p.exists() {
            return bind_pdfium_from_path(&library_path(&p));
        }
        // Fall through: env var set but path missing → try the defaults.
        warn!(
            "{} '{}' not found; falling back to the default search",
            PDFIUM_LIB_PATH_ENV,
            p.display()
        );
    }

    let local = Pdfium::pdfium_platform_library_name_at_path("./");
    Pdfium::bind_to_library(&local)
        .inspect(|_| debug!("Bound pdfium from {}", local.display()))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| StitchError::PdfiumBindingFailed(e.to_string()))
}

/// Bind to a pdfium library at an explicit `path`.
pub fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, StitchError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| {
            StitchError::PdfiumBindingFailed(format!("'{}': {}", path.display(), e))
        })
}

/// A directory resolves to the platform-named library inside it.
fn library_path(p: &Path) -> PathBuf {
    if p.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(p)
    } else {
        p.to_path_buf()
    }
}
