//! Export orchestration: directory resolution, output naming and the hand-off
//! to the PDF renderer.

use crate::bill::{Bill, FieldValue};
use crate::render::PdfRenderer;
use crate::template::{self, Warning};
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};

const CUSTOMER_ID: &str = "customer_id";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not find the template directory: {}", .0.display())]
    TemplateDirNotFound(PathBuf),
    #[error("template directory must be an absolute path: {}", .0.display())]
    TemplateDirNotAbsolute(PathBuf),
    #[error("could not find the template: {}", .0.display())]
    TemplateNotFound(PathBuf),
    #[error("could not find a directory to output pdfs: {}", .0.display())]
    OutputDirUnavailable(PathBuf),
    #[error("bill is missing required field '{0}'")]
    MissingField(&'static str),
    #[error(
        "pdf rendering failed for customer {customer_id} (template {}, output {})",
        .template_dir.display(),
        .output.display()
    )]
    Render {
        customer_id: String,
        template_dir: PathBuf,
        output: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Template and output locations for an export.
///
/// Unset fields fall back to defaults next to the running executable:
/// `template/` for the template directory and `pdfs/` (created on demand)
/// for the output directory. An explicitly supplied directory must already
/// exist.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub template_dir: Option<PathBuf>,
    pub pdf_dir: Option<PathBuf>,
}

impl ExportOptions {
    /// Resolved, absolute template directory. Absolute so that rewritten
    /// asset URLs stay valid wherever the renderer runs.
    pub fn resolve_template_dir(&self) -> Result<PathBuf, ExportError> {
        let dir = match &self.template_dir {
            Some(dir) => dir.clone(),
            None => default_base_dir()?.join("template"),
        };
        if !dir.is_dir() {
            return Err(ExportError::TemplateDirNotFound(dir));
        }
        Ok(fs::canonicalize(dir)?)
    }

    pub fn resolve_pdf_dir(&self) -> Result<PathBuf, ExportError> {
        match &self.pdf_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(ExportError::OutputDirUnavailable(dir.clone()));
                }
                Ok(dir.clone())
            }
            None => {
                let dir = default_base_dir()?.join("pdfs");
                fs::create_dir_all(&dir)
                    .map_err(|_| ExportError::OutputDirUnavailable(dir.clone()))?;
                Ok(dir)
            }
        }
    }
}

fn default_base_dir() -> Result<PathBuf, ExportError> {
    let exe = std::env::current_exe()?;
    Ok(exe.parent().unwrap_or_else(|| Path::new(".")).to_path_buf())
}

/// Output filename for a bill: `Customer_<customer_id>_<YYYYMMDD>.pdf`.
///
/// The date is the render date, not a field from the record.
pub fn report_name(bill: &Bill, date: NaiveDate) -> Result<String, ExportError> {
    let customer_id = bill
        .get(CUSTOMER_ID)
        .ok_or(ExportError::MissingField(CUSTOMER_ID))?;
    Ok(format!(
        "Customer_{}_{}.pdf",
        customer_id.format(),
        date.format("%Y%m%d")
    ))
}

/// Substituted template plus the derived output name, ready to render.
#[derive(Debug)]
pub struct PreparedBill {
    pub html: String,
    pub file_name: String,
    pub warnings: Vec<Warning>,
}

/// Load the template, substitute the bill's fields and derive the output
/// name. Touches nothing but the template file; repeated calls with the same
/// inputs produce byte-identical HTML.
pub fn prepare(
    bill: &Bill,
    template_dir: &Path,
    date: NaiveDate,
) -> Result<PreparedBill, ExportError> {
    let template = template::load(template_dir)?;
    let template = template::rewrite_asset_paths(&template, template_dir)?;
    let (html, warnings) = template::fill(&template, bill);
    let file_name = report_name(bill, date)?;
    Ok(PreparedBill {
        html,
        file_name,
        warnings,
    })
}

/// Export one bill to a PDF in the resolved output directory.
///
/// Configuration and missing-field errors are raised before anything is
/// written. A renderer failure is terminal for this call and carries the
/// customer id, template path and output path; it is never retried.
pub fn export(
    bill: &Bill,
    options: &ExportOptions,
    renderer: &dyn PdfRenderer,
) -> Result<PathBuf, ExportError> {
    let template_dir = options.resolve_template_dir()?;
    let pdf_dir = options.resolve_pdf_dir()?;

    let prepared = prepare(bill, &template_dir, Local::now().date_naive())?;
    for warning in &prepared.warnings {
        log::warn!("{warning}");
    }

    let output = pdf_dir.join(&prepared.file_name);
    renderer
        .render(&prepared.html, &output)
        .map_err(|source| ExportError::Render {
            customer_id: bill
                .get(CUSTOMER_ID)
                .map(FieldValue::format)
                .unwrap_or_default(),
            template_dir: template_dir.clone(),
            output: output.clone(),
            source,
        })?;

    log::info!("exported {}", output.display());
    Ok(output)
}
