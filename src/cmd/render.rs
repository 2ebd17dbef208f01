//! Render command - export one billing record to a PDF

use crate::cmd::read_bill;
use crate::export::{self, ExportOptions};
use crate::render::Wkhtmltopdf;
use anyhow::Context;
use chrono::Local;
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RenderCommand {
    /// JSON file containing the billing record (or "-" for stdin)
    #[arg(short, long)]
    bill: PathBuf,

    /// Directory containing the HTML template (default: template/ next to the executable)
    #[arg(short, long)]
    template_dir: Option<PathBuf>,

    /// Directory to write the PDF into (default: pdfs/ next to the executable, created if missing)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Write the substituted HTML to this path instead of rendering a PDF
    #[arg(long)]
    html_out: Option<PathBuf>,

    /// Path to the wkhtmltopdf binary (default: discovered on PATH)
    #[arg(long)]
    wkhtmltopdf: Option<PathBuf>,

    /// Open the rendered PDF when done
    #[arg(long)]
    open: bool,
}

impl RenderCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let bill = read_bill(&self.bill)?;
        let options = ExportOptions {
            template_dir: self.template_dir.clone(),
            pdf_dir: self.out_dir.clone(),
        };

        if let Some(ref html_path) = self.html_out {
            let template_dir = options.resolve_template_dir()?;
            let prepared = export::prepare(&bill, &template_dir, Local::now().date_naive())?;
            for warning in &prepared.warnings {
                log::warn!("{warning}");
            }
            fs::write(html_path, &prepared.html)?;
            println!("HTML written to: {}", html_path.display());
            return Ok(());
        }

        let renderer = match &self.wkhtmltopdf {
            Some(path) => Wkhtmltopdf::with_binary(path.clone()),
            None => Wkhtmltopdf::discover()
                .context("wkhtmltopdf not found; install it or pass --wkhtmltopdf")?,
        };

        let output = export::export(&bill, &options, &renderer)?;
        println!("PDF written to: {}", output.display());

        if self.open {
            opener::open(&output)?;
        }
        Ok(())
    }
}
