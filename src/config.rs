//! Configuration types for batch stitching.
//!
//! All batch behaviour is controlled through [`StitchConfig`], built via its
//! [`StitchConfigBuilder`]. The resolution is the only knob that reaches the
//! document pipeline; the rest shapes how the input folder is walked.

use crate::error::StitchError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Default rendering resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 200;

/// Default document extension, matched case-insensitively.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Configuration for a batch run.
///
/// Built via [`StitchConfig::builder()`] or using [`StitchConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfstitch::StitchConfig;
///
/// let config = StitchConfig::builder()
///     .dpi(300)
///     .sorted(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 300);
/// ```
#[derive(Clone)]
pub struct StitchConfig {
    /// Resolution used both to rasterise pages and to size the output page.
    /// Must be at least 1. Default: 200.
    pub dpi: u32,

    /// File extension (without the dot) that selects documents. Default: "pdf".
    pub extension: String,

    /// Process entries in file-name order instead of directory-listing order.
    /// Default: false.
    pub sorted: bool,

    /// Optional per-document progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            extension: DEFAULT_EXTENSION.to_string(),
            sorted: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for StitchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StitchConfig")
            .field("dpi", &self.dpi)
            .field("extension", &self.extension)
            .field("sorted", &self.sorted)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl StitchConfig {
    /// Create a new builder for `StitchConfig`.
    pub fn builder() -> StitchConfigBuilder {
        StitchConfigBuilder {
            config: Self::default(),
        }
    }

    /// The `.ext` suffix compared against lower-cased file names.
    pub fn extension_suffix(&self) -> String {
        format!(".{}", self.extension.to_lowercase())
    }
}

/// Builder for [`StitchConfig`].
pub struct StitchConfigBuilder {
    config: StitchConfig,
}

impl fmt::Debug for StitchConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StitchConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl StitchConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    /// Accepts `"pdf"` or `".pdf"`.
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        self.config.extension = ext.trim().trim_start_matches('.').to_string();
        self
    }

    pub fn sorted(mut self, v: bool) -> Self {
        self.config.sorted = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<StitchConfig, StitchError> {
        let c = &self.config;
        if c.dpi == 0 {
            return Err(StitchError::InvalidConfig("DPI must be ≥ 1, got 0".into()));
        }
        if c.extension.is_empty() {
            return Err(StitchError::InvalidConfig(
                "Document extension must not be empty".into(),
            ));
        }
        if c.extension.contains(['/', '\\']) {
            return Err(StitchError::InvalidConfig(format!(
                "Document extension must not contain a path separator, got '{}'",
                c.extension
            )));
        }
        Ok(self.config)
    }
}
