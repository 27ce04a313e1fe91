//! Output formatters for console, JSON and Markdown reports

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{Result, ResumeScorerError};
use crate::processing::analyzer::AnalysisReport;
use crate::processing::feedback::MatchBand;
use colored::{Color, Colorize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Trait for rendering an analysis report
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal output
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON for scripts and HTTP handlers. The plain form is exactly the
/// `AnalysisResult`; the detailed form is the whole report.
pub struct JsonFormatter {
    pretty: bool,
    detailed: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates the formatters
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

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_band_badge(&self, band: MatchBand) -> String {
        let color = match band {
            MatchBand::Strong => Color::Green,
            MatchBand::Moderate => Color::Yellow,
            MatchBand::Weak => Color::Red,
        };
        let badge = band.label().to_uppercase();

        if self.use_colors {
            format!("[{}]", badge.as_str().color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn push_list(&self, output: &mut String, title: &str, items: &[String], color: Color) {
        if items.is_empty() {
            return;
        }
        output.push_str(&self.format_header(title, 3));
        for item in items {
            output.push_str(&format!("  • {}\n", self.colorize(item, color)));
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let metadata = &report.metadata;
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME COMPATIBILITY ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Overall", 2));
        output.push_str(&format!(
            "Overall Score: {:.1}/100 {}\n",
            result.overall_score,
            self.format_band_badge(report.band)
        ));
        output.push_str(&format!(
            "Semantic Similarity: {:.1}% (weight: {:.0}%)\n",
            result.semantic_similarity_score * 100.0,
            metadata.semantic_weight * 100.0
        ));
        output.push_str(&format!(
            "Keyword Match: {:.1}% (weight: {:.0}%)\n",
            result.keyword_match_score * 100.0,
            metadata.keyword_weight * 100.0
        ));
        for line in &result.feedback.overall_summary {
            output.push_str(&format!("{}\n", self.colorize(line, Color::Cyan)));
        }

        self.push_list(&mut output, "Strengths", &result.feedback.strengths, Color::Green);
        self.push_list(
            &mut output,
            "Areas for Improvement",
            &result.feedback.areas_for_improvement,
            Color::Yellow,
        );
        if !result.feedback.missing_keywords_suggestions.is_empty() {
            output.push_str(&self.format_header("Missing Keywords", 3));
            output.push_str(&format!(
                "  {}\n",
                self.colorize(&result.feedback.missing_keywords_suggestions.join(", "), Color::Red)
            ));
        }

        if self.detailed {
            output.push_str(&self.format_header("Detailed Analysis", 2));
            output.push_str(&format!("Job keywords:    {}\n", result.jd_keywords.join(", ")));
            output.push_str(&format!("Resume keywords: {}\n", result.resume_keywords.join(", ")));
            if !report.breakdown.matched_keywords.is_empty() {
                output.push_str(&format!(
                    "Matched:         {}\n",
                    self.colorize(&report.breakdown.matched_keywords.join(", "), Color::Green)
                ));
            }
            output.push_str(&format!(
                "Tokens: resume {} | job {}\n",
                metadata.resume_tokens, metadata.jd_tokens
            ));
            if metadata.input_truncated {
                output.push_str(&format!(
                    "{}\n",
                    self.colorize("Input was truncated before analysis.", Color::Yellow)
                ));
            }
        }

        output.push_str(&format!(
            "\n{} resume-scorer v{} | Model: {}\n",
            self.colorize("ℹ", Color::Blue),
            env!("CARGO_PKG_VERSION"),
            metadata.model_name
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool, detailed: bool) -> Self {
        Self { pretty, detailed }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let json = match (self.detailed, self.pretty) {
            (true, true) => serde_json::to_string_pretty(report)?,
            (true, false) => serde_json::to_string(report)?,
            (false, true) => serde_json::to_string_pretty(&report.result)?,
            (false, false) => serde_json::to_string(&report.result)?,
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn push_section(output: &mut String, title: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        output.push_str(&format!("## {}\n\n", title));
        for item in items {
            output.push_str(&format!("- {}\n", item));
        }
        output.push('\n');
    }

    fn code_list(terms: &[String]) -> String {
        if terms.is_empty() {
            return "_none_".to_string();
        }
        terms
            .iter()
            .map(|term| format!("`{}`", term))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let metadata = &report.metadata;
        let mut output = String::new();

        output.push_str("# Resume Compatibility Report\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms | **Model:** {}\n\n",
                metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                metadata.processing_time_ms,
                metadata.model_name
            ));
        }

        output.push_str(&format!(
            "**Overall Score:** {:.1}/100 ({})\n\n",
            result.overall_score,
            report.band.label()
        ));
        output.push_str("| Signal | Score | Weight |\n");
        output.push_str("|--------|-------|--------|\n");
        output.push_str(&format!(
            "| Semantic similarity | {:.1}% | {:.0}% |\n",
            result.semantic_similarity_score * 100.0,
            metadata.semantic_weight * 100.0
        ));
        output.push_str(&format!(
            "| Keyword match | {:.1}% | {:.0}% |\n\n",
            result.keyword_match_score * 100.0,
            metadata.keyword_weight * 100.0
        ));

        Self::push_section(&mut output, "Summary", &result.feedback.overall_summary);
        Self::push_section(&mut output, "Strengths", &result.feedback.strengths);
        Self::push_section(
            &mut output,
            "Areas for Improvement",
            &result.feedback.areas_for_improvement,
        );
        if !result.feedback.missing_keywords_suggestions.is_empty() {
            output.push_str("## Missing Keywords\n\n");
            output.push_str(&Self::code_list(&result.feedback.missing_keywords_suggestions));
            output.push_str("\n\n");
        }

        output.push_str("## Keywords\n\n");
        output.push_str(&format!("**Job description:** {}\n\n", Self::code_list(&result.jd_keywords)));
        output.push_str(&format!("**Resume:** {}\n\n", Self::code_list(&result.resume_keywords)));

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by resume-scorer v{}*\n",
                env!("CARGO_PKG_VERSION")
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json, detailed),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::with_options(config.color_output, config.detailed, true, true)
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `content` atomically: a temp file in the target directory is
/// renamed over `file_path`.
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    let parent = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.persist(file_path).map_err(|e| {
        ResumeScorerError::OutputFormatting(format!(
            "Failed to write report to {}: {}",
            file_path.display(),
            e.error
        ))
    })?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_analysis{}.{}", base_name, timestamp_suffix, extension)
}

/// A directory target gets a generated, timestamped file name derived from
/// the resume; anything else is used as the file path itself.
pub fn resolve_save_path(save: &Path, format: OutputFormat, resume: &Path) -> PathBuf {
    if save.is_dir() {
        save.join(suggest_filename(format, &resume.to_string_lossy(), true))
    } else {
        save.to_path_buf()
    }
}
