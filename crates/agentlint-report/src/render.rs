//! Pure, deterministic renderings of an [`ErrorReport`].
//!
//! All four renderers are functions of the report alone; rendering the
//! same report twice yields byte-identical output.

use agentlint_core::Severity;
use serde_json::{Value, json};

use crate::report::{ErrorReport, FormattedError};

/// Toggles for the line-oriented text rendering.
#[derive(Debug, Clone, Copy)]
pub struct TextOptions {
    pub remediation: bool,
    pub doc_links: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            remediation: true,
            doc_links: false,
        }
    }
}

/// Line-oriented text rendering.
pub fn render_text(report: &ErrorReport, options: &TextOptions) -> String {
    let mut lines = Vec::new();

    for entry in severity_ordered(report) {
        lines.push(format!(
            "{}[{}] {}: {}",
            entry.severity, entry.code, entry.path, entry.message
        ));
        if options.remediation && !entry.remediation.is_empty() {
            lines.push(format!("    remediation: {}", entry.remediation));
        }
        if options.doc_links && !entry.docs.is_empty() {
            lines.push(format!("    docs: {}", entry.docs));
        }
    }

    let summary = report.summary();
    lines.push(format!(
        "summary: {} error(s), {} warning(s), {} info",
        summary.errors, summary.warnings, summary.info
    ));
    lines.push(format!(
        "valid: {}",
        if report.valid() { "yes" } else { "no" }
    ));
    lines.join("\n")
}

/// Structured machine form mirroring the report.
pub fn render_json(report: &ErrorReport) -> Value {
    let summary = report.summary();
    json!({
        "valid": report.valid(),
        "errors": report.errors().collect::<Vec<_>>(),
        "warnings": report.warnings().collect::<Vec<_>>(),
        "info": report.info().collect::<Vec<_>>(),
        "summary": {
            "errors": summary.errors,
            "warnings": summary.warnings,
            "info": summary.info,
            "total": summary.total,
        }
    })
}

/// Document-style markup with a heading per issue.
pub fn render_markdown(report: &ErrorReport) -> String {
    let mut lines = Vec::new();
    let summary = report.summary();

    lines.push("# Manifest validation report".to_string());
    lines.push(String::new());
    lines.push(format!(
        "- valid: {}",
        if report.valid() { "yes" } else { "no" }
    ));
    lines.push(format!("- errors: {}", summary.errors));
    lines.push(format!("- warnings: {}", summary.warnings));
    lines.push(format!("- info: {}", summary.info));
    lines.push(String::new());

    for entry in severity_ordered(report) {
        lines.push(format!("## {} `{}`", entry.code, entry.path));
        lines.push(String::new());
        lines.push(format!("severity: {}", entry.severity));
        lines.push(String::new());
        lines.push(entry.message.clone());
        if !entry.remediation.is_empty() {
            lines.push(String::new());
            lines.push(format!("> {}", entry.remediation));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Severity-grouped styled page with embedded doc links.
pub fn render_html(report: &ErrorReport) -> String {
    let mut out = String::new();
    out.push_str("<!doctype html>\n<html>\n<head><title>Manifest validation report</title></head>\n<body>\n");
    out.push_str("<h1>Manifest validation report</h1>\n");

    let summary = report.summary();
    out.push_str(&format!(
        "<p class=\"summary\">valid: {} &mdash; {} error(s), {} warning(s), {} info</p>\n",
        report.valid(),
        summary.errors,
        summary.warnings,
        summary.info
    ));

    for (severity, heading) in [
        (Severity::Error, "Errors"),
        (Severity::Warning, "Warnings"),
        (Severity::Info, "Info"),
    ] {
        let entries: Vec<_> = report
            .entries
            .iter()
            .filter(|entry| entry.severity == severity)
            .collect();
        if entries.is_empty() {
            continue;
        }

        out.push_str(&format!(
            "<section class=\"{}\">\n<h2>{}</h2>\n<ul>\n",
            severity, heading
        ));
        for entry in entries {
            out.push_str(&format!(
                "<li><a href=\"{}\">{}</a> <code>{}</code> {}</li>\n",
                escape(&entry.docs),
                escape(&entry.code),
                escape(&entry.path),
                escape(&entry.message)
            ));
        }
        out.push_str("</ul>\n</section>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn severity_ordered(report: &ErrorReport) -> impl Iterator<Item = &FormattedError> {
    report
        .errors()
        .chain(report.warnings())
        .chain(report.info())
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ErrorReport {
        ErrorReport::new(vec![
            FormattedError {
                code: "LINT_NAME_FORMAT".to_string(),
                severity: Severity::Error,
                path: "/metadata/name".to_string(),
                message: "name 'My Agent' is not a DNS-label-like name".to_string(),
                remediation: "use lowercase alphanumerics and hyphens".to_string(),
                docs: "docs/codes/lint_name_format.md".to_string(),
                source: None,
            },
            FormattedError {
                code: "ADVICE_DESCRIPTION_MISSING".to_string(),
                severity: Severity::Info,
                path: "/metadata/description".to_string(),
                message: "metadata.description is empty".to_string(),
                remediation: String::new(),
                docs: "docs/codes/advice_description_missing.md".to_string(),
                source: None,
            },
        ])
    }

    #[test]
    fn text_rendering_is_deterministic() {
        let report = sample_report();
        let options = TextOptions::default();
        assert_eq!(
            render_text(&report, &options),
            render_text(&report, &options)
        );
    }

    #[test]
    fn text_toggles_control_remediation_and_docs() {
        let report = sample_report();
        let bare = render_text(
            &report,
            &TextOptions {
                remediation: false,
                doc_links: false,
            },
        );
        assert!(!bare.contains("remediation:"));
        assert!(!bare.contains("docs:"));

        let full = render_text(
            &report,
            &TextOptions {
                remediation: true,
                doc_links: true,
            },
        );
        assert!(full.contains("remediation:"));
        assert!(full.contains("docs:"));
    }

    #[test]
    fn json_rendering_mirrors_the_report() {
        let report = sample_report();
        let value = render_json(&report);
        assert_eq!(value["valid"], json!(false));
        assert_eq!(value["errors"].as_array().unwrap().len(), 1);
        assert_eq!(value["info"].as_array().unwrap().len(), 1);
        assert_eq!(value["summary"]["total"], json!(2));
    }

    #[test]
    fn markdown_has_a_heading_per_issue() {
        let report = sample_report();
        let markdown = render_markdown(&report);
        assert!(markdown.contains("## LINT_NAME_FORMAT `/metadata/name`"));
        assert!(markdown.contains("## ADVICE_DESCRIPTION_MISSING"));
    }

    #[test]
    fn html_groups_by_severity_and_escapes() {
        let mut report = sample_report();
        report.push(FormattedError {
            code: "SCHEMA_TYPE".to_string(),
            severity: Severity::Error,
            path: "/spec".to_string(),
            message: "expected <object>".to_string(),
            remediation: String::new(),
            docs: String::new(),
            source: None,
        });

        let html = render_html(&report);
        assert!(html.contains("<h2>Errors</h2>"));
        assert!(html.contains("<h2>Info</h2>"));
        assert!(!html.contains("<object>"));
        assert!(html.contains("&lt;object&gt;"));
        assert_eq!(html, render_html(&report));
    }
}
