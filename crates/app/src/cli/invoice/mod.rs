use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use doruken_app::{context::AppContext, domain::invoices::RenderedInvoice};
use tokio::fs;
use tracing::info;

use crate::cli::LookupArgs;

#[derive(Debug, Args)]
pub(crate) struct InvoiceCommand {
    #[command(subcommand)]
    command: InvoiceSubcommand,
}

#[derive(Debug, Subcommand)]
enum InvoiceSubcommand {
    /// Render the standard invoice
    Generate(RenderArgs),
    /// Render the shipping label for an order that ships
    Shipping(RenderArgs),
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[command(flatten)]
    lookup: LookupArgs,

    /// Directory the PDF is written to
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Also write the intermediate HTML next to the PDF
    #[arg(long)]
    html: bool,
}

pub(crate) async fn run(command: InvoiceCommand, context: &AppContext) -> Result<(), String> {
    match command.command {
        InvoiceSubcommand::Generate(args) => {
            let lookup = args.lookup.lookup()?;
            let rendered = context
                .invoices
                .render_invoice(lookup)
                .await
                .map_err(|error| format!("failed to generate invoice: {error}"))?;

            write(&rendered, &args.out, args.html).await
        }
        InvoiceSubcommand::Shipping(args) => {
            let lookup = args.lookup.lookup()?;
            let rendered = context
                .invoices
                .render_shipping(lookup)
                .await
                .map_err(|error| format!("failed to generate shipping label: {error}"))?;

            write(&rendered, &args.out, args.html).await
        }
    }
}

async fn write(rendered: &RenderedInvoice, out: &Path, html: bool) -> Result<(), String> {
    fs::create_dir_all(out)
        .await
        .map_err(|error| format!("failed to create {}: {error}", out.display()))?;

    let pdf_path = out.join(&rendered.file_name);

    fs::write(&pdf_path, &rendered.pdf)
        .await
        .map_err(|error| format!("failed to write {}: {error}", pdf_path.display()))?;

    info!(path = %pdf_path.display(), bytes = rendered.pdf.len(), "wrote pdf");
    println!("{}", pdf_path.display());

    if html {
        let html_path = pdf_path.with_extension("html");

        fs::write(&html_path, &rendered.html)
            .await
            .map_err(|error| format!("failed to write {}: {error}", html_path.display()))?;

        println!("{}", html_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn writes_pdf_and_optional_html() -> TestResult {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("invoices");
        let rendered = RenderedInvoice {
            file_name: "invoice-pira-3-Sari.pdf".to_string(),
            html: "<p>hi</p>".to_string(),
            pdf: b"%PDF-1.5".to_vec(),
        };

        write(&rendered, &out, true).await?;

        assert_eq!(std::fs::read(out.join("invoice-pira-3-Sari.pdf"))?, b"%PDF-1.5");
        assert_eq!(
            std::fs::read_to_string(out.join("invoice-pira-3-Sari.html"))?,
            "<p>hi</p>"
        );

        Ok(())
    }
}
