//! Template loading, asset path rewriting and placeholder substitution.
//!
//! Placeholders are literal `__<field_name>` substrings in the HTML. There is
//! no templating language; substitution is plain ordered find/replace.

use crate::bill::Bill;
use crate::export::ExportError;
use regex::Regex;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;
use url::Url;

/// Read `<template_dir>/templates/template.html` as UTF-8.
pub fn load(template_dir: &Path) -> Result<String, ExportError> {
    let path = template_dir.join("templates").join("template.html");
    fs::read_to_string(&path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ExportError::TemplateNotFound(path)
        } else {
            ExportError::Io(e)
        }
    })
}

/// Replace relative asset references with the absolute `file:` URL of the
/// template directory, so images and stylesheets resolve wherever the
/// renderer happens to run.
///
/// Only `../` (with the slash) is rewritten, leaving other uses of `..` such
/// as an ellipsis in regular text untouched.
pub fn rewrite_asset_paths(html: &str, template_dir: &Path) -> Result<String, ExportError> {
    let base = Url::from_directory_path(template_dir)
        .map_err(|()| ExportError::TemplateDirNotAbsolute(template_dir.to_path_buf()))?;
    Ok(html.replace("../", base.as_str()))
}

/// A lenient substitution outcome, surfaced to the caller instead of failing
/// the render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Bill field with no matching placeholder in the template.
    UnusedField { field: String },
    /// Placeholder token left in the output with no matching bill field.
    UnmatchedPlaceholder { token: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnusedField { field } => {
                write!(f, "bill field '{field}' has no placeholder in the template")
            }
            Warning::UnmatchedPlaceholder { token } => {
                write!(f, "template placeholder '{token}' has no matching bill field")
            }
        }
    }
}

/// Substitute every `__<field_name>` token with the formatted field value.
///
/// Fields are processed longest name first so a field whose name is a prefix
/// of another (e.g. `rebate` and `rebate_closing_balance`) never consumes
/// part of the longer token. The sort is stable, so ties keep the bill's key
/// order and the output is deterministic.
pub fn fill(template: &str, bill: &Bill) -> (String, Vec<Warning>) {
    let mut fields: Vec<_> = bill.iter().collect();
    fields.sort_by_key(|(name, _)| Reverse(name.len()));

    let mut html = template.to_owned();
    let mut warnings = Vec::new();
    for (name, value) in fields {
        let token = format!("__{name}");
        if html.contains(&token) {
            html = html.replace(&token, &value.format());
        } else {
            warnings.push(Warning::UnusedField {
                field: name.clone(),
            });
        }
    }

    for token in leftover_placeholders(&html) {
        warnings.push(Warning::UnmatchedPlaceholder { token });
    }
    (html, warnings)
}

static PLACEHOLDER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__[A-Za-z][A-Za-z0-9_]*").expect("valid placeholder pattern"));

/// Distinct `__<ident>` tokens remaining after substitution.
fn leftover_placeholders(html: &str) -> Vec<String> {
    let distinct: BTreeSet<String> = PLACEHOLDER_TOKEN
        .find_iter(html)
        .map(|m| m.as_str().to_owned())
        .collect();
    distinct.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::FieldValue;
    use rust_decimal_macros::dec;

    fn bill(fields: &[(&str, FieldValue)]) -> Bill {
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn longer_field_names_are_substituted_first() {
        let bill = bill(&[
            ("rebate", FieldValue::Money(dec!(5.00))),
            ("rebate_closing_balance", FieldValue::Money(dec!(10.00))),
        ]);
        let (html, warnings) = fill("Rebate: __rebate Balance: __rebate_closing_balance", &bill);

        assert_eq!(html, "Rebate: 5.00 Balance: 10.00");
        assert!(!html.contains("_closing_balance"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn every_occurrence_of_a_token_is_replaced() {
        let bill = bill(&[("customer_id", FieldValue::Integer(100))]);
        let (html, warnings) = fill("__customer_id and again __customer_id", &bill);

        assert_eq!(html, "100 and again 100");
        assert!(warnings.is_empty());
    }

    #[test]
    fn unused_field_is_a_warning_not_an_error() {
        let bill = bill(&[
            ("customer_id", FieldValue::Integer(100)),
            ("loyalty_bonus", FieldValue::Money(dec!(2.50))),
        ]);
        let (html, warnings) = fill("Customer __customer_id", &bill);

        assert_eq!(html, "Customer 100");
        assert_eq!(
            warnings,
            vec![Warning::UnusedField {
                field: "loyalty_bonus".into()
            }]
        );
    }

    #[test]
    fn unmatched_placeholder_is_left_as_literal_text_and_flagged() {
        let bill = bill(&[("customer_id", FieldValue::Integer(100))]);
        let (html, warnings) = fill("__customer_id owes __final_cost", &bill);

        assert_eq!(html, "100 owes __final_cost");
        assert_eq!(
            warnings,
            vec![Warning::UnmatchedPlaceholder {
                token: "__final_cost".into()
            }]
        );
    }

    #[test]
    fn fill_is_deterministic() {
        let bill = bill(&[
            ("rebate", FieldValue::Money(dec!(5.00))),
            ("report_date", FieldValue::from("today")),
        ]);
        let template = "__rebate on __report_date";

        let (first, _) = fill(template, &bill);
        let (second, _) = fill(template, &bill);
        assert_eq!(first, second);
    }

    #[test]
    fn relative_asset_paths_become_file_urls() {
        let html = r#"<img src="../assets/logo.png"> to be continued..."#;
        let rewritten = rewrite_asset_paths(html, Path::new("/srv/bills/template")).unwrap();

        assert_eq!(
            rewritten,
            r#"<img src="file:///srv/bills/template/assets/logo.png"> to be continued..."#
        );
    }

    #[test]
    fn relative_template_dir_is_rejected() {
        let err = rewrite_asset_paths("<html></html>", Path::new("template")).unwrap_err();
        assert!(matches!(err, ExportError::TemplateDirNotAbsolute(_)));
    }
}
