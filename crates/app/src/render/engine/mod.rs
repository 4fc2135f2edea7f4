//! PDF Engines

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::warn;

use crate::{
    config::{PdfEngineKind, RenderConfig},
    render::RenderError,
};

mod chromium;
mod text;

pub use chromium::ChromiumEngine;
pub use text::TextLayoutEngine;

/// Turns a complete HTML page into PDF bytes.
#[async_trait]
pub trait PdfEngine: Send + Sync + Debug {
    /// Render `html` into a PDF.
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Engine selected by the render configuration. Chromium falls back to the text layout
/// engine when its binary cannot be found.
pub fn from_config(config: &RenderConfig) -> Box<dyn PdfEngine> {
    match config.pdf_engine {
        PdfEngineKind::Text => Box::new(TextLayoutEngine::new()),
        PdfEngineKind::Chromium => match chromium::locate(&config.chromium_bin) {
            Some(binary) => Box::new(ChromiumEngine::new(binary)),
            None => {
                warn!(
                    binary = %config.chromium_bin.display(),
                    "chromium not found, falling back to the text layout engine"
                );

                Box::new(TextLayoutEngine::new())
            }
        },
    }
}
