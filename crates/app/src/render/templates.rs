//! Handlebars templates for invoices and shipping labels.

use std::{fmt, fs, path::Path};

use doruken::prelude::format_currency;
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde::Serialize;
use tracing::debug;

use crate::render::RenderError;

const INVOICE_TEMPLATE: &str = include_str!("../../templates/invoice.hbs");
const SHIPPING_TEMPLATE: &str = include_str!("../../templates/shipping.hbs");

/// Which document a template renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Invoice,
    Shipping,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 2] = [TemplateKind::Invoice, TemplateKind::Shipping];

    pub const fn name(self) -> &'static str {
        match self {
            TemplateKind::Invoice => "invoice",
            TemplateKind::Shipping => "shipping",
        }
    }

    const fn embedded(self) -> &'static str {
        match self {
            TemplateKind::Invoice => INVOICE_TEMPLATE,
            TemplateKind::Shipping => SHIPPING_TEMPLATE,
        }
    }

    pub(crate) const fn template_file(self) -> &'static str {
        match self {
            TemplateKind::Invoice => "invoice.hbs",
            TemplateKind::Shipping => "shipping.hbs",
        }
    }

    pub(crate) const fn stylesheet_file(self) -> &'static str {
        match self {
            TemplateKind::Invoice => "invoice.css",
            TemplateKind::Shipping => "shipping.css",
        }
    }
}

/// `{{currency amount}}` renders whole rupiah, e.g. `Rp 150.000`.
fn currency_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let amount = h
        .param(0)
        .and_then(|v| v.value().as_i64())
        .ok_or(RenderErrorReason::InvalidParamType("integer amount"))?;

    out.write(&format_currency(amount))?;

    Ok(())
}

/// Strict-mode registry holding both document templates.
pub struct Templates {
    registry: Handlebars<'static>,
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Templates")
            .field("templates", &self.registry.get_templates().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Templates {
    /// Register the embedded templates, preferring files in `dir` when present.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be read or a template does not parse.
    pub fn load(dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_helper("currency", Box::new(currency_helper));

        for kind in TemplateKind::ALL {
            let source = match dir.map(|dir| dir.join(kind.template_file())) {
                Some(path) if path.is_file() => {
                    debug!(template = kind.name(), path = %path.display(), "using template override");
                    fs::read_to_string(path)?
                }
                _ => kind.embedded().to_string(),
            };

            registry
                .register_template_string(kind.name(), source)
                .map_err(Box::new)?;
        }

        Ok(Self { registry })
    }

    /// Render a registered template.
    ///
    /// # Errors
    ///
    /// Fails when the document lacks a field the template references.
    pub fn render<T: Serialize>(&self, kind: TemplateKind, data: &T) -> Result<String, RenderError> {
        Ok(self.registry.render(kind.name(), data)?)
    }

    /// Render an ad-hoc template source with the same helpers and strictness.
    ///
    /// # Errors
    ///
    /// Fails when the source does not parse or references a missing field.
    pub fn render_source<T: Serialize>(&self, source: &str, data: &T) -> Result<String, RenderError> {
        Ok(self.registry.render_template(source, data)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn currency_helper_formats_rupiah() -> TestResult {
        let templates = Templates::load(None)?;

        let out = templates.render_source("{{currency total}}", &json!({ "total": 1_500_000 }))?;

        assert_eq!(out, "Rp 1.500.000");

        Ok(())
    }

    #[test]
    fn currency_helper_rejects_non_numbers() -> TestResult {
        let templates = Templates::load(None)?;

        let result = templates.render_source("{{currency total}}", &json!({ "total": "lots" }));

        assert!(result.is_err(), "text amounts should fail");

        Ok(())
    }

    #[test]
    fn missing_fields_fail_the_render() -> TestResult {
        let templates = Templates::load(None)?;

        let result = templates.render(TemplateKind::Shipping, &json!({ "invoiceNumber": 3 }));

        assert!(
            matches!(result, Err(RenderError::Render(_))),
            "strict mode should reject missing client block, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn override_directory_replaces_embedded_template() -> TestResult {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("shipping.hbs"), "Label {{invoiceNumber}}")?;

        let templates = Templates::load(Some(dir.path()))?;

        assert_eq!(
            templates.render(TemplateKind::Shipping, &json!({ "invoiceNumber": 9 }))?,
            "Label 9"
        );

        Ok(())
    }

    #[test]
    fn broken_override_is_a_template_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("invoice.hbs"), "{{#each itemList}}")?;

        let result = Templates::load(Some(dir.path()));

        assert!(
            matches!(result, Err(RenderError::Template(_))),
            "expected Template error, got {result:?}"
        );

        Ok(())
    }
}
