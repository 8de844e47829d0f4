//! Font configuration and glyph metrics for text drawn along paths.

mod config;
mod metrics;

pub use config::{font_config_to_fontdb, CustomFont, FontConfig, GenericFamilyMap, ResolvedFontConfig};
pub use metrics::{FaceMetrics, FixedPitchMetrics, FontMetrics};
