// Report formatting and terminal styling

use chunkreview_pipeline::AnalysisResult;
use colored::Colorize;

use crate::error::{CliError, CliResult};

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format header
    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Highlight the `===`/`---` section headers of a rendered report
    pub fn report(&self, rendered: &str) -> String {
        if !self.use_colors {
            return rendered.to_string();
        }
        rendered
            .lines()
            .map(|line| {
                if line.starts_with("=== ") {
                    self.header(line)
                } else if line.starts_with("--- ") {
                    line.cyan().to_string()
                } else if line == "(no response)" {
                    line.yellow().to_string()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render a result as text or pretty JSON
pub fn format_result(result: &AnalysisResult, json: bool, style: &OutputStyle) -> CliResult<String> {
    if json {
        serde_json::to_string_pretty(result).map_err(|e| CliError::Output(e.to_string()))
    } else {
        Ok(style.report(result.render().trim_end()))
    }
}

#[cfg(test)]
mod tests {
    use chunkreview_pipeline::{AnalysisKind, ChunkResult};

    use super::*;

    fn result() -> AnalysisResult {
        AnalysisResult {
            kind: AnalysisKind::Review {
                document: "main.rs".to_string(),
            },
            summaries: vec![],
            sections: vec![ChunkResult::new(1, "Fine.")],
            skipped: vec![],
        }
    }

    #[test]
    fn test_plain_text_report() {
        let text = format_result(&result(), false, &OutputStyle::plain()).unwrap();
        assert_eq!(text, "=== Code review of file main.rs ===\n--- Result of part 1 ---\nFine.");
    }

    #[test]
    fn test_json_report() {
        let text = format_result(&result(), true, &OutputStyle::plain()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["sections"][0]["text"], "Fine.");
    }

    #[test]
    fn test_plain_style_has_no_escapes() {
        let style = OutputStyle::plain();
        assert_eq!(style.error("boom"), "✗ boom");
        assert!(!style.report("=== x ===").contains('\u{1b}'));
    }
}
