//! Stylesheets injected into rendered HTML.

use std::{fs, path::Path};

use crate::render::{RenderError, TemplateKind};

const INVOICE_CSS: &str = include_str!("../../static/invoice.css");
const SHIPPING_CSS: &str = include_str!("../../static/shipping.css");

/// A stylesheet placed into the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stylesheet {
    /// CSS text wrapped in a `<style>` element.
    Inline(String),

    /// URL linked with `<link rel="stylesheet"/>`.
    Remote(String),
}

impl Stylesheet {
    fn to_html(&self) -> String {
        match self {
            Stylesheet::Inline(css) => format!("<style>\n{css}\n</style>\n"),
            Stylesheet::Remote(url) => {
                let href = url.replace('&', "&amp;").replace('"', "%22");

                format!("<link rel=\"stylesheet\" href=\"{href}\"/>\n")
            }
        }
    }
}

/// Ordered stylesheets for each template kind: the local sheet first, then remote ones.
#[derive(Debug, Clone)]
pub struct Stylesheets {
    invoice: Vec<Stylesheet>,
    shipping: Vec<Stylesheet>,
}

impl Stylesheets {
    /// Embedded local sheets, replaced by `invoice.css`/`shipping.css` from `dir` when present.
    ///
    /// # Errors
    ///
    /// Returns an error if an override file exists but cannot be read.
    pub fn load(dir: Option<&Path>, remote: &[String]) -> Result<Self, RenderError> {
        let local = |kind: TemplateKind, embedded: &str| -> Result<Vec<Stylesheet>, RenderError> {
            let css = match dir.map(|dir| dir.join(kind.stylesheet_file())) {
                Some(path) if path.is_file() => fs::read_to_string(path)?,
                _ => embedded.to_string(),
            };

            let mut sheets = vec![Stylesheet::Inline(css)];
            sheets.extend(remote.iter().cloned().map(Stylesheet::Remote));

            Ok(sheets)
        };

        Ok(Self {
            invoice: local(TemplateKind::Invoice, INVOICE_CSS)?,
            shipping: local(TemplateKind::Shipping, SHIPPING_CSS)?,
        })
    }

    pub fn for_kind(&self, kind: TemplateKind) -> &[Stylesheet] {
        match kind {
            TemplateKind::Invoice => &self.invoice,
            TemplateKind::Shipping => &self.shipping,
        }
    }
}

/// Insert `stylesheets`, in order, at the end of the document head.
pub fn inject(html: &str, stylesheets: &[Stylesheet]) -> String {
    if stylesheets.is_empty() {
        return html.to_string();
    }

    let tags: String = stylesheets.iter().map(Stylesheet::to_html).collect();
    let lowered = html.to_ascii_lowercase();

    if let Some(at) = lowered.find("</head>") {
        return format!("{}{tags}{}", &html[..at], &html[at..]);
    }

    match lowered.find("<body") {
        Some(at) => format!("{}<head>\n{tags}</head>\n{}", &html[..at], &html[at..]),
        None => format!("<head>\n{tags}</head>\n{html}"),
    }
}
