//! Output formatters for screening reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{ExtractionStatus, ScreeningReport};
use colored::{Color, Colorize};
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

const BAR_WIDTH: usize = 20;
const PREVIEW_GRAPHEMES: usize = 300;

/// Trait for formatting screening reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String>;
}

/// Console formatter with colors and score bars
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharing results
pub struct MarkdownFormatter;

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".color(Color::Blue).bold(), title.color(Color::Blue).bold())
        } else {
            format!("\n# {}\n", title)
        }
    }

    fn score_color(score: f32) -> Color {
        match score {
            s if s >= 0.6 => Color::Green,
            s if s >= 0.4 => Color::Yellow,
            s if s >= 0.2 => Color::BrightYellow,
            _ => Color::Red,
        }
    }

    fn format_bar(&self, score: f32) -> String {
        let filled = ((score.max(0.0) * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
        let bar = format!("{}{}", "■".repeat(filled), "·".repeat(BAR_WIDTH - filled));
        self.colorize(&bar, Self::score_color(score))
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME SCREENING RESULTS"));
        output.push_str(&format!(
            "Resume: {} | Model: {} ({} dims) | {}ms\n",
            report.resume, report.model.name, report.model.dimension, report.metadata.processing_time_ms
        ));

        match report.extraction.status {
            ExtractionStatus::Extracted => {
                output.push_str(&format!(
                    "Extracted {} words ({} characters)\n",
                    report.extraction.words, report.extraction.characters
                ));
            }
            ExtractionStatus::Empty => {
                output.push_str(&self.colorize(
                    "⚠ The document contains no extractable text; scores below are not meaningful\n",
                    Color::Yellow,
                ));
            }
            ExtractionStatus::Failed => {
                let reason = report.extraction.error.as_deref().unwrap_or("unknown error");
                output.push_str(&self.colorize(
                    &format!("⚠ Text extraction failed ({}); scores below are not meaningful\n", reason),
                    Color::Red,
                ));
            }
        }

        output.push_str(&self.format_header("TOP ROLES"));
        if report.scores.is_empty() {
            output.push_str("  No roles to rank\n");
        }

        let title_width = report
            .scores
            .entries()
            .iter()
            .map(|e| e.title.chars().count())
            .max()
            .unwrap_or(0);

        for (i, entry) in report.scores.entries().iter().enumerate() {
            output.push_str(&format!(
                "  {}. {:<width$}  {}  {}\n",
                i + 1,
                entry.title,
                self.format_bar(entry.score),
                self.colorize(&format!("{:.3}", entry.score), Self::score_color(entry.score)),
                width = title_width
            ));
        }

        if self.detailed {
            if let Some(text) = &report.resume_text {
                output.push_str(&self.format_header("RESUME PREVIEW"));
                output.push_str(&truncate_text(text, PREVIEW_GRAPHEMES));
                output.push('\n');
            }
            output.push_str(&format!("\nGenerated: {}\n", report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Screening Results\n\n");
        output.push_str(&format!("- **Resume:** {}\n", report.resume));
        output.push_str(&format!(
            "- **Model:** {} ({} dimensions)\n",
            report.model.name, report.model.dimension
        ));
        output.push_str(&format!(
            "- **Generated:** {}\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        match report.extraction.status {
            ExtractionStatus::Extracted => output.push_str(&format!(
                "- **Extracted:** {} words\n",
                report.extraction.words
            )),
            ExtractionStatus::Empty => {
                output.push_str("\n> **Warning:** the document contains no extractable text.\n")
            }
            ExtractionStatus::Failed => output.push_str(&format!(
                "\n> **Warning:** text extraction failed: {}\n",
                report.extraction.error.as_deref().unwrap_or("unknown error")
            )),
        }

        output.push_str("\n## Top Roles\n\n");
        output.push_str("| Rank | Role | Score |\n");
        output.push_str("|-----:|------|------:|\n");
        for (i, entry) in report.scores.entries().iter().enumerate() {
            output.push_str(&format!("| {} | {} | {:.3} |\n", i + 1, entry.title, entry.score));
        }

        Ok(output)
    }
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter,
        }
    }

    pub fn generate(&self, report: &ScreeningReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };
        formatter.format_report(report)
    }

    pub fn save(&self, content: &str, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Truncate text to a number of graphemes, preferring a word boundary
pub fn truncate_text(text: &str, max_graphemes: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max_graphemes {
        return text.to_string();
    }

    let truncated: String = graphemes[..max_graphemes].concat();
    let cut = truncated.rfind(char::is_whitespace).unwrap_or(truncated.len());
    format!("{}...", truncated[..cut].trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::{ExtractionSummary, ModelSummary, ReportMetadata};
    use crate::processing::matcher::{RankedResult, ScoredRole};
    use chrono::Utc;

    fn sample_report(status: ExtractionStatus) -> ScreeningReport {
        let scores = RankedResult::from_scores(
            vec![
                ScoredRole { id: "web_developer".into(), title: "Web Developer".into(), score: 0.41 },
                ScoredRole { id: "data_scientist".into(), title: "Data Scientist".into(), score: 0.72 },
            ],
            5,
        );

        ScreeningReport {
            resume: "cv.pdf".to_string(),
            scores,
            extraction: ExtractionSummary {
                status,
                characters: 42,
                words: 7,
                error_kind: None,
                error: (status == ExtractionStatus::Failed).then(|| "bad xref table".to_string()),
            },
            model: ModelSummary { name: "potion-base-8M".to_string(), dimension: 256 },
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                processing_time_ms: 12,
                version: "0.1.0".to_string(),
            },
            resume_text: Some("Data scientist with Python".to_string()),
        }
    }

    #[test]
    fn test_console_output_lists_roles_in_order() {
        let formatter = ConsoleFormatter::new(false, false);
        let output = formatter.format_report(&sample_report(ExtractionStatus::Extracted)).unwrap();

        let data = output.find("Data Scientist").unwrap();
        let web = output.find("Web Developer").unwrap();
        assert!(data < web);
        assert!(output.contains("0.720"));
        assert!(!output.contains("RESUME PREVIEW"));
    }

    #[test]
    fn test_console_output_warns_on_failed_extraction() {
        let formatter = ConsoleFormatter::new(false, true);
        let output = formatter.format_report(&sample_report(ExtractionStatus::Failed)).unwrap();
        assert!(output.contains("bad xref table"));
        assert!(output.contains("RESUME PREVIEW"));
    }

    #[test]
    fn test_json_output_shape() {
        let generator = ReportGenerator::new(false, false);
        let json = generator
            .generate(&sample_report(ExtractionStatus::Extracted), OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["scores"][0]["title"], "Data Scientist");
        assert_eq!(value["extraction"]["status"], "extracted");
        assert!(value["extraction"].get("error").is_none());
    }

    #[test]
    fn test_markdown_table() {
        let generator = ReportGenerator::new(false, false);
        let md = generator
            .generate(&sample_report(ExtractionStatus::Empty), OutputFormat::Markdown)
            .unwrap();
        assert!(md.contains("| 1 | Data Scientist | 0.720 |"));
        assert!(md.contains("no extractable text"));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("hello brave new world", 13), "hello brave...");
        assert_eq!(truncate_text("ééééé", 3), "ééé...");
    }

    #[test]
    fn test_bar_is_bounded() {
        let formatter = ConsoleFormatter::new(false, false);
        assert_eq!(formatter.format_bar(1.5).chars().count(), BAR_WIDTH);
        assert_eq!(formatter.format_bar(-0.3).chars().count(), BAR_WIDTH);
    }
}
