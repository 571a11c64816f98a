//! Terminal rendering of queue items, detection results and service health.

use console::Style;
use guardvision_core::types::ServiceStatus;
use guardvision_core::{DetectionResult, ImageStatus, IssueKind, ProcessedImage, StatusReport};
use std::fmt::Write;

/// Localized badge label for an issue's `type`; unknown kinds show raw.
pub fn badge_label(kind: &str) -> &str {
    match IssueKind::parse(kind) {
        Some(IssueKind::Spelling) => "拼写",
        Some(IssueKind::Grammar) => "语法",
        Some(IssueKind::Terminology) => "术语",
        Some(IssueKind::Style) => "风格",
        None => kind,
    }
}

fn badge_style(kind: &str) -> Style {
    match IssueKind::parse(kind) {
        Some(IssueKind::Spelling) => Style::new().red(),
        Some(IssueKind::Grammar) => Style::new().yellow(),
        Some(IssueKind::Terminology) => Style::new().blue(),
        Some(IssueKind::Style) => Style::new().magenta(),
        None => Style::new().dim(),
    }
}

/// Status word for an item, e.g. `completed (score 92)`.
pub fn status_text(image: &ProcessedImage) -> String {
    match image.status() {
        ImageStatus::Pending => "pending".to_string(),
        ImageStatus::Processing => match image.current_step() {
            Some(step) => format!("processing ({step})"),
            None => "processing".to_string(),
        },
        ImageStatus::Completed => match image.result() {
            Some(result) => format!("completed (score {})", result.score),
            None => "completed".to_string(),
        },
        ImageStatus::Error => format!("error: {}", image.error_message().unwrap_or("unknown")),
    }
}

/// One line per item: marker, file name, status.
pub fn item_line(image: &ProcessedImage) -> String {
    let (marker, style) = match image.status() {
        ImageStatus::Pending => ("·", Style::new().dim()),
        ImageStatus::Processing => ("…", Style::new().cyan()),
        ImageStatus::Completed => ("✓", Style::new().green()),
        ImageStatus::Error => ("✗", Style::new().red()),
    };
    format!(
        "{} {}  {}",
        style.apply_to(marker),
        Style::new().bold().apply_to(image.preview()),
        style.apply_to(status_text(image))
    )
}

/// Issue list for a result, or a clean bill when there are none.
pub fn result_block(result: &DetectionResult) -> String {
    let mut out = String::new();
    let verdict = if result.is_professional {
        Style::new().green().apply_to("professional")
    } else {
        Style::new().yellow().apply_to("needs work")
    };
    let _ = writeln!(out, "  Score {} · {}", result.score, verdict);

    if result.errors.is_empty() {
        let _ = writeln!(out, "  No issues found");
        return out;
    }

    let dim = Style::new().dim();
    for issue in &result.errors {
        let badge = badge_style(&issue.kind).apply_to(format!("[{}]", badge_label(&issue.kind)));
        let _ = writeln!(out, "  {} {} → {}", badge, issue.text, issue.suggestion);
        if !issue.alternatives.is_empty() {
            let _ = writeln!(
                out,
                "      {} {}",
                dim.apply_to("alternatives:"),
                issue.alternatives.join(", ")
            );
        }
        if !issue.explanation.is_empty() {
            let _ = writeln!(out, "      {}", dim.apply_to(&issue.explanation));
        }
    }
    out
}

/// Recognized text, shown above the issue list for scanned images.
pub fn ocr_block(text: &str) -> String {
    let mut out = String::new();
    let dim = Style::new().dim();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let _ = writeln!(out, "  {} {}", dim.apply_to("│"), line);
    }
    out
}

/// Final `scan` report: one block per item, in queue order.
pub fn scan_report(images: &[ProcessedImage]) -> String {
    let mut out = String::new();
    for image in images {
        let _ = writeln!(out, "{}", item_line(image));
        if let Some(text) = image.raw_ocr_text() {
            out.push_str(&ocr_block(text));
        }
        if let Some(result) = image.result() {
            out.push_str(&result_block(result));
        }
        out.push('\n');
    }
    out
}

fn service_state(status: &ServiceStatus) -> String {
    match (status.configured, status.working, &status.error) {
        (false, _, _) => Style::new().dim().apply_to("not configured").to_string(),
        (true, _, Some(error)) => Style::new().red().apply_to(format!("error: {error}")).to_string(),
        (true, Some(true), None) => Style::new().green().apply_to("working").to_string(),
        (true, Some(false), None) => Style::new().red().apply_to("not responding").to_string(),
        (true, None, None) => Style::new().yellow().apply_to("configured").to_string(),
    }
}

/// `/api/test` report as an aligned table.
pub fn status_table(report: &StatusReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Checked at {}", report.timestamp);
    for (name, status) in report.services.entries() {
        let _ = writeln!(out, "  {:<10} {}", name, service_state(status));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardvision_core::types::Services;
    use guardvision_core::{DetectionError, OcrProvider};
    use std::path::PathBuf;

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).into_owned()
    }

    fn issue(kind: &str) -> DetectionError {
        DetectionError {
            text: "camra".into(),
            kind: kind.into(),
            suggestion: "camera".into(),
            alternatives: vec!["cam".into()],
            explanation: "Misspelling".into(),
            location: None,
        }
    }

    #[test]
    fn test_badge_labels() {
        assert_eq!(badge_label("spelling"), "拼写");
        assert_eq!(badge_label("grammar"), "语法");
        assert_eq!(badge_label("terminology"), "术语");
        assert_eq!(badge_label("style"), "风格");
        assert_eq!(badge_label("tone"), "tone");
    }

    #[test]
    fn test_status_text_follows_item_state() {
        let mut image = ProcessedImage::new("1-1".into(), PathBuf::from("/tmp/poster.png"));
        assert_eq!(status_text(&image), "pending");

        image.mark_processing(OcrProvider::Baidu);
        image.set_step("Running OCR...");
        assert_eq!(status_text(&image), "processing (Running OCR...)");

        image.mark_completed(DetectionResult {
            original_text: "ok".into(),
            errors: vec![],
            is_professional: true,
            score: 92.0,
        });
        assert_eq!(status_text(&image), "completed (score 92)");
        assert!(plain(&item_line(&image)).contains("poster.png"));

        let mut failed = ProcessedImage::new("1-2".into(), PathBuf::from("b.png"));
        failed.mark_processing(OcrProvider::Gemini);
        failed.mark_failed("OCR request failed".into());
        assert_eq!(status_text(&failed), "error: OCR request failed");
    }

    #[test]
    fn test_result_block_lists_issues() {
        let result = DetectionResult {
            original_text: "4K camra".into(),
            errors: vec![issue("spelling"), issue("tone")],
            is_professional: false,
            score: 70.0,
        };
        let text = plain(&result_block(&result));
        assert!(text.contains("Score 70 · needs work"));
        assert!(text.contains("[拼写] camra → camera"));
        assert!(text.contains("[tone] camra → camera"));
        assert!(text.contains("alternatives: cam"));
        assert!(text.contains("Misspelling"));
    }

    #[test]
    fn test_result_block_without_issues() {
        let result = DetectionResult {
            original_text: "fine".into(),
            errors: vec![],
            is_professional: true,
            score: 100.0,
        };
        assert!(plain(&result_block(&result)).contains("No issues found"));
    }

    #[test]
    fn test_scan_report_lists_each_item_once() {
        let mut done = ProcessedImage::new("1-1".into(), PathBuf::from("/tmp/poster.png"));
        done.mark_processing(OcrProvider::Gemini);
        done.record_ocr_text("IP67 camra".into());
        done.mark_completed(DetectionResult {
            original_text: "IP67 camra".into(),
            errors: vec![issue("spelling")],
            is_professional: false,
            score: 85.0,
        });
        let mut failed = ProcessedImage::new("1-2".into(), PathBuf::from("/tmp/flyer.png"));
        failed.mark_processing(OcrProvider::Gemini);
        failed.mark_failed("OCR request failed".into());

        let report = plain(&scan_report(&[done, failed]));
        assert_eq!(report.matches("poster.png").count(), 1);
        assert_eq!(report.matches("flyer.png").count(), 1);
        assert!(report.contains("│ IP67 camra"));
        assert!(report.contains("[拼写] camra → camera"));
        assert!(report.find("poster.png") < report.find("flyer.png"));
    }

    #[test]
    fn test_status_table_states() {
        let report = StatusReport {
            timestamp: "2024-01-01T00:00:00.000Z".into(),
            services: Services {
                gemini: ServiceStatus::probed(true),
                doubao: ServiceStatus::probed(false),
                baidu: ServiceStatus::failed("Baidu authentication failed: bad key".into()),
                alibaba: ServiceStatus::configured(),
                ..Services::default()
            },
        };
        let table = plain(&status_table(&report));
        assert!(table.contains("gemini     working"));
        assert!(table.contains("doubao     not responding"));
        assert!(table.contains("baidu      error: Baidu authentication failed: bad key"));
        assert!(table.contains("alibaba    configured"));
        assert!(table.contains("qwen       not configured"));
    }
}
