//! Rendering
//!
//! Invoice documents go through a handlebars template into HTML, get their stylesheets
//! injected, and are handed to a [`PdfEngine`] for pagination.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::RenderConfig;

pub(crate) mod css;
pub mod engine;
pub(crate) mod html;
pub mod stylesheet;
pub mod templates;

pub use engine::{ChromiumEngine, PdfEngine, TextLayoutEngine};
pub use stylesheet::{Stylesheet, Stylesheets};
pub use templates::{TemplateKind, Templates};

/// Rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A template failed to parse.
    #[error("invalid template: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// Substituting the document failed, e.g. a referenced field is missing.
    #[error("failed to render template: {0}")]
    Render(#[from] handlebars::RenderError),

    /// The HTML handed to the text layout engine is not well-formed.
    #[error("malformed document markup: {0}")]
    Markup(#[from] quick_xml::Error),

    /// The PDF could not be encoded.
    #[error("failed to encode PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Reading overrides or talking to the PDF engine failed.
    #[error("render IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Chromium exited unsuccessfully.
    #[error("chromium exited with {status}: {stderr}")]
    Chromium { status: String, stderr: String },
}

/// HTML and PDF produced for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    pub pdf: Vec<u8>,
}

/// Templates, stylesheets and the PDF engine used to render documents.
#[derive(Debug)]
pub struct InvoiceRenderer {
    templates: Templates,
    stylesheets: Stylesheets,
    engine: Box<dyn PdfEngine>,
}

impl InvoiceRenderer {
    #[must_use]
    pub fn new(templates: Templates, stylesheets: Stylesheets, engine: Box<dyn PdfEngine>) -> Self {
        Self {
            templates,
            stylesheets,
            engine,
        }
    }

    /// Build a renderer from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when a template or stylesheet override cannot be loaded.
    pub fn from_config(config: &RenderConfig) -> Result<Self, RenderError> {
        let dir = config.template_dir.as_deref();

        Ok(Self::new(
            Templates::load(dir)?,
            Stylesheets::load(dir, &config.remote_stylesheets)?,
            engine::from_config(config),
        ))
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Render the HTML page for a document, stylesheets included.
    ///
    /// # Errors
    ///
    /// Returns an error when the template cannot be filled from `document`.
    pub fn render_html<T: Serialize>(
        &self,
        kind: TemplateKind,
        document: &T,
    ) -> Result<String, RenderError> {
        let html = self.templates.render(kind, document)?;

        Ok(stylesheet::inject(&html, self.stylesheets.for_kind(kind)))
    }

    /// Render a document into HTML and PDF.
    ///
    /// # Errors
    ///
    /// Returns an error when templating or the PDF engine fails.
    pub async fn render<T: Serialize + Sync>(
        &self,
        kind: TemplateKind,
        document: &T,
    ) -> Result<Rendered, RenderError> {
        let html = self.render_html(kind, document)?;
        let pdf = self.engine.render(&html).await?;

        info!(
            template = kind.name(),
            engine = self.engine.name(),
            bytes = pdf.len(),
            "rendered document"
        );

        Ok(Rendered { html, pdf })
    }

    /// Render an arbitrary template source with the given stylesheets straight to PDF.
    ///
    /// # Errors
    ///
    /// Returns an error when templating or the PDF engine fails.
    pub async fn render_source<T: Serialize + Sync>(
        &self,
        source: &str,
        document: &T,
        stylesheets: &[Stylesheet],
    ) -> Result<Vec<u8>, RenderError> {
        let html = self.templates.render_source(source, document)?;
        let html = stylesheet::inject(&html, stylesheets);

        debug!(engine = self.engine.name(), "rendering ad-hoc template");

        self.engine.render(&html).await
    }
}
