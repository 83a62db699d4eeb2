//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available —
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Backend endpoints
  pub default_server: String,
  pub search_path: String,
  pub download_path: String,
  /// Save name used when the response carries no usable content-disposition.
  pub fallback_filename: String,

  // Render loop
  pub tick_ms: u64,
  pub spinner_frames: Vec<String>,

  // Rain effect
  pub rain_fade_step: u8,
  pub rain_reset_chance: f64,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
