use anyhow::{anyhow, bail};
use folio_canvas::{
    Canvas, Color, DrawingExt, FillRule, GraphicsContext, PathData, RasterCanvas, Rectangle,
};
use folio_pdf::PdfCanvas;

use crate::document::Document;
use crate::fonts::{FontConfig, ResolvedFontConfig};
use crate::render::{CancellationToken, Measurement, RenderConfig, RenderReport, Renderer};

/// Converts documents to PNG and PDF.
///
/// Fonts are resolved once when the converter is created and shared by
/// every conversion.
pub struct FolioConverter {
    fonts: ResolvedFontConfig,
    config: RenderConfig,
    cancellation: CancellationToken,
}

impl Default for FolioConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl FolioConverter {
    /// A converter using the system fonts.
    pub fn new() -> Self {
        Self::with_font_config(&FontConfig::default())
    }

    pub fn with_font_config(font_config: &FontConfig) -> Self {
        Self {
            fonts: font_config.resolve(),
            config: RenderConfig::default(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_render_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Token that stops conversions in progress.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    fn renderer(&self) -> Renderer<'_> {
        Renderer::new()
            .with_fonts(&self.fonts)
            .with_config(self.config.clone())
            .with_cancellation(self.cancellation.clone())
    }

    /// Dry-run the document and report its page size and content.
    pub fn measure(&self, doc: &Document) -> Result<Measurement, anyhow::Error> {
        Ok(self.renderer().measure(doc)?)
    }

    /// Report every element that would fail to draw.
    pub fn check(&self, doc: &Document) -> Result<RenderReport, anyhow::Error> {
        Ok(self.renderer().validate(doc)?)
    }

    fn finish_report(&self, report: RenderReport) -> Result<RenderReport, anyhow::Error> {
        if report.cancelled {
            bail!("Conversion cancelled after {} elements", report.rendered);
        }
        if self.config.strict {
            if let Some(failure) = report.failures.first() {
                bail!("Failed to draw element {}: {}", failure.id, failure.message);
            }
        }
        Ok(report)
    }

    fn page_size(&self, doc: &Document) -> Result<(f64, f64), anyhow::Error> {
        match (doc.width, doc.height) {
            (Some(width), Some(height)) => Ok((width, height)),
            _ => {
                let measurement = self.measure(doc)?;
                Ok((measurement.width, measurement.height))
            }
        }
    }

    fn background(&self, doc: &Document) -> Result<Option<Color>, anyhow::Error> {
        doc.background
            .as_deref()
            .map(|bg| Color::parse(bg).map_err(|err| anyhow!("Invalid background: {}", err)))
            .transpose()
    }

    /// Render the document to PNG bytes.
    ///
    /// `scale` multiplies the page size in pixels; `ppi` is written to the
    /// PNG metadata.
    pub fn document_to_png(
        &self,
        doc: &Document,
        scale: Option<f32>,
        ppi: Option<f32>,
    ) -> Result<Vec<u8>, anyhow::Error> {
        let (width, height) = self.page_size(doc)?;
        let scale = scale.unwrap_or(1.0);
        let mut builder = RasterCanvas::builder(width.ceil() as u32, height.ceil() as u32)
            .with_scale(f64::from(scale));
        if let Some(background) = self.background(doc)? {
            builder = builder.with_background(background);
        }
        let mut canvas = match builder.build() {
            Ok(canvas) => canvas,
            Err(err) => bail!("Failed to create canvas: {}", err),
        };

        let report = self.renderer().render(&mut canvas, doc)?;
        self.finish_report(report)?;
        match canvas.to_png(ppi) {
            Ok(png) => Ok(png),
            Err(err) => bail!("Failed to encode PNG: {}", err),
        }
    }

    /// Render the document to a single-page PDF.
    pub fn document_to_pdf(&self, doc: &Document) -> Result<Vec<u8>, anyhow::Error> {
        let (width, height) = self.page_size(doc)?;
        let mut canvas = PdfCanvas::new(width, height)?;
        if let Some(background) = self.background(doc)? {
            canvas.scoped(|canvas| {
                canvas.set_fill_paint(background.into());
                let mut page = PathData::new();
                page.rect(&Rectangle::new(0.0, 0.0, width, height));
                canvas.fill_path(&page, FillRule::NonZero)
            })?;
        }

        let report = self.renderer().render(&mut canvas, doc)?;
        self.finish_report(report)?;
        Ok(canvas.finish())
    }
}
