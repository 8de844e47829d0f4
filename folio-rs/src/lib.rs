// Allow uninlined format args for cleaner bail!/anyhow! macros
#![allow(clippy::uninlined_format_args)]
#![doc = include_str!("../README.md")]

pub mod converter;
pub mod document;
pub mod error;
pub mod fonts;
pub mod render;
pub mod style;

pub use converter::FolioConverter;
pub use document::{Document, Element};
pub use error::{RenderError, RenderResult};
pub use fonts::{FontConfig, ResolvedFontConfig};
pub use render::{
    CancellationToken, ElementFailure, Measurement, RenderConfig, RenderReport, Renderer,
};
pub use style::{PaintFlags, Style, TransformOp};

pub use anyhow;
pub use folio_canvas;
pub use serde_json;
