//! Check command - surface substitution issues without rendering a PDF

use crate::cmd::read_bill;
use crate::export::ExportOptions;
use crate::template::{self, Warning};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct CheckCommand {
    /// JSON file containing the billing record (or "-" for stdin)
    #[arg(short, long)]
    bill: PathBuf,

    /// Directory containing the HTML template (default: template/ next to the executable)
    #[arg(short, long)]
    template_dir: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A substitution issue for output
#[derive(Debug, Tabled, Serialize)]
struct CheckIssue {
    #[tabled(rename = "Issue")]
    #[serde(rename = "type")]
    issue_type: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Detail")]
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct CheckOutput {
    issue_count: usize,
    issues: Vec<CheckIssue>,
}

impl CheckCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let bill = read_bill(&self.bill)?;
        let options = ExportOptions {
            template_dir: self.template_dir.clone(),
            pdf_dir: None,
        };
        let template_dir = options.resolve_template_dir()?;

        let template = template::load(&template_dir)?;
        let template = template::rewrite_asset_paths(&template, &template_dir)?;
        let (_, warnings) = template::fill(&template, &bill);

        let mut issues: Vec<CheckIssue> = warnings.iter().map(issue_from_warning).collect();
        if bill.get("customer_id").is_none() {
            issues.push(CheckIssue {
                issue_type: "missing_field".into(),
                subject: "customer_id".into(),
                message: "required for the output filename".into(),
            });
        }

        let has_issues = !issues.is_empty();
        if self.json {
            let output = CheckOutput {
                issue_count: issues.len(),
                issues,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if !has_issues {
            println!("No issues found");
        } else {
            let table = Table::new(&issues).with(Style::rounded()).to_string();
            println!("{table}");
        }

        // Exit with code 1 if issues found
        if has_issues {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn issue_from_warning(warning: &Warning) -> CheckIssue {
    match warning {
        Warning::UnusedField { field } => CheckIssue {
            issue_type: "unused_field".into(),
            subject: field.clone(),
            message: "bill field has no placeholder in the template".into(),
        },
        Warning::UnmatchedPlaceholder { token } => CheckIssue {
            issue_type: "unmatched_placeholder".into(),
            subject: token.clone(),
            message: "placeholder has no matching bill field".into(),
        },
    }
}
