//! Render Config

use std::path::{self, PathBuf};

use clap::Args;
use doruken::prelude::{Storefront, StorefrontError};
use url::Url;

/// Bootstrap stylesheet linked into every invoice.
pub const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@4.6.2/dist/css/bootstrap.min.css";

/// Font Awesome stylesheet linked into every invoice.
pub const FONT_AWESOME_CSS: &str =
    "https://maxcdn.bootstrapcdn.com/font-awesome/4.3.0/css/font-awesome.min.css";

/// Logo file looked up in the assets directory.
pub const LOGO_FILE: &str = "logo.svg";

/// Which engine turns HTML into PDF.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum PdfEngineKind {
    /// Built-in text layout; no external programs.
    Text,

    /// Headless Chromium `--print-to-pdf`, or the text layout when Chromium is missing.
    Chromium,
}

/// Template, stylesheet and PDF engine settings.
#[derive(Debug, Clone, Args)]
pub struct RenderConfig {
    /// PDF engine (chromium, text)
    #[arg(long, env = "INVOICE_PDF_ENGINE", value_enum, default_value_t = PdfEngineKind::Chromium)]
    pub pdf_engine: PdfEngineKind,

    /// Chromium or Chrome binary used by the chromium engine
    #[arg(long, env = "CHROMIUM_BIN", default_value = "chromium")]
    pub chromium_bin: PathBuf,

    /// Directory with `invoice.hbs`/`shipping.hbs` and `invoice.css`/`shipping.css` overrides
    #[arg(long, env = "INVOICE_TEMPLATE_DIR")]
    pub template_dir: Option<PathBuf>,

    /// Directory containing the logo
    #[arg(long, env = "INVOICE_ASSETS_DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Storefront YAML file; built-in defaults when omitted
    #[arg(long, env = "INVOICE_STOREFRONT")]
    pub storefront: Option<PathBuf>,

    /// Remote stylesheets linked after the local one (comma separated)
    #[arg(
        long = "remote-stylesheet",
        env = "INVOICE_REMOTE_STYLESHEETS",
        value_delimiter = ',',
        default_values = [BOOTSTRAP_CSS, FONT_AWESOME_CSS]
    )]
    pub remote_stylesheets: Vec<String>,
}

impl RenderConfig {
    /// Assets directory, defaulting to the one shipped with this crate.
    pub fn assets_dir(&self) -> PathBuf {
        self.assets_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")))
    }

    /// Percent-encoded `file://` URI of the logo, resolved to an absolute path.
    pub fn logo_uri(&self) -> String {
        let logo = self.assets_dir().join(LOGO_FILE);
        let logo = path::absolute(&logo).unwrap_or(logo);

        Url::from_file_path(&logo)
            .map(String::from)
            .unwrap_or_else(|()| format!("file://{}", logo.display()))
    }

    /// Load the configured storefront, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error when the storefront file cannot be read or parsed.
    pub fn load_storefront(&self) -> Result<Storefront, StorefrontError> {
        match &self.storefront {
            Some(path) => Storefront::from_path(path),
            None => Ok(Storefront::default()),
        }
    }
}
