use colored::Colorize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Structured log events for a refinement run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    RunStarted {
        tool: String,
        candidate_preview: String,
        max_iterations: usize,
        threshold: f64,
    },
    IterationStarted {
        iteration: usize,
        max_iterations: usize,
    },
    /// Score for this candidate was already known from variant testing
    CachedScoreReused {
        iteration: usize,
        score: f64,
    },
    AttemptCompleted {
        iteration: usize,
        kind: String,
        score: f64,
        needs_improvement: bool,
    },
    AttemptFailed {
        iteration: usize,
        kind: String,
        error: String,
    },
    VariantsGenerated {
        iteration: usize,
        count: usize,
    },
    VariantAdopted {
        iteration: usize,
        score: f64,
    },
    ThresholdMet {
        iteration: usize,
        score: f64,
    },
    MaxIterationsReached {
        iterations: usize,
    },
    RunCompleted {
        iterations: usize,
        best_score: f64,
        success: bool,
        duration_secs: f64,
    },
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for refinement events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // File sink is always JSON lines
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        match self.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Pretty => self.log_pretty(event),
            LogFormat::Compact => self.log_compact(event),
        }
    }

    fn log_json(&self, event: &LogEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{}", json);
        }
    }

    fn log_pretty(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        match event {
            LogEvent::RunStarted {
                tool,
                candidate_preview,
                max_iterations,
                threshold,
            } => {
                let _ = writeln!(stderr);
                let _ = writeln!(stderr, "{} {}", "▶".bright_blue(), tool.bold());
                let _ = writeln!(
                    stderr,
                    "  {} {}",
                    "Candidate:".dimmed(),
                    Self::truncate(candidate_preview, 70).dimmed()
                );
                let _ = writeln!(
                    stderr,
                    "  {} {}  {} {}",
                    "Max iterations:".dimmed(),
                    max_iterations,
                    "Threshold:".dimmed(),
                    threshold
                );
            }
            LogEvent::IterationStarted {
                iteration,
                max_iterations,
            } => {
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "{}",
                    format!("── Iteration {}/{} ──", iteration, max_iterations).bright_blue()
                );
            }
            LogEvent::CachedScoreReused { score, .. } => {
                let _ = writeln!(
                    stderr,
                    "  {} score {:.2} carried over from variant testing",
                    "↺".yellow(),
                    score
                );
            }
            LogEvent::AttemptCompleted {
                kind,
                score,
                needs_improvement,
                ..
            } => {
                let verdict = if *needs_improvement {
                    "needs improvement".yellow()
                } else {
                    "acceptable".green()
                };
                let _ = writeln!(
                    stderr,
                    "  {} {} scored {:.2} ({})",
                    "✓".green(),
                    kind,
                    score,
                    verdict
                );
            }
            LogEvent::AttemptFailed { kind, error, .. } => {
                let _ = writeln!(stderr, "  {} {} failed: {}", "✗".red(), kind, error);
            }
            LogEvent::VariantsGenerated { count, .. } => {
                let _ = writeln!(stderr, "  {} testing {} variant(s)", "⋯".dimmed(), count);
            }
            LogEvent::VariantAdopted { score, .. } => {
                let _ = writeln!(
                    stderr,
                    "  {} adopted variant with score {:.2}",
                    "→".bright_blue(),
                    score
                );
            }
            LogEvent::ThresholdMet { iteration, score } => {
                let _ = writeln!(
                    stderr,
                    "  {} quality threshold met on iteration {} (score {:.2})",
                    "★".green().bold(),
                    iteration,
                    score
                );
            }
            LogEvent::MaxIterationsReached { iterations } => {
                let _ = writeln!(
                    stderr,
                    "  {} reached maximum iterations ({})",
                    "⚠".yellow(),
                    iterations
                );
            }
            LogEvent::RunCompleted {
                iterations,
                best_score,
                success,
                duration_secs,
            } => {
                let status = if *success {
                    "complete".green().bold()
                } else {
                    "failed".red().bold()
                };
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "{} Run {} after {} iteration(s): best score {:.2} in {:.1}s",
                    "▪".bright_blue(),
                    status,
                    iterations,
                    best_score,
                    duration_secs
                );
            }
        }
    }

    fn log_compact(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        let line = match event {
            LogEvent::RunStarted {
                tool,
                max_iterations,
                ..
            } => format!("start {} max_iter={}", tool, max_iterations),
            LogEvent::IterationStarted { iteration, .. } => format!("iter {}", iteration),
            LogEvent::CachedScoreReused { iteration, score } => {
                format!("iter {} cached score={:.2}", iteration, score)
            }
            LogEvent::AttemptCompleted {
                iteration,
                kind,
                score,
                ..
            } => format!("iter {} {} score={:.2}", iteration, kind, score),
            LogEvent::AttemptFailed {
                iteration,
                kind,
                error,
            } => format!("iter {} {} error: {}", iteration, kind, error),
            LogEvent::VariantsGenerated { iteration, count } => {
                format!("iter {} variants={}", iteration, count)
            }
            LogEvent::VariantAdopted { iteration, score } => {
                format!("iter {} adopted score={:.2}", iteration, score)
            }
            LogEvent::ThresholdMet { iteration, score } => {
                format!("iter {} threshold met score={:.2}", iteration, score)
            }
            LogEvent::MaxIterationsReached { iterations } => {
                format!("max iterations ({})", iterations)
            }
            LogEvent::RunCompleted {
                iterations,
                best_score,
                success,
                duration_secs,
            } => format!(
                "done success={} iters={} best={:.2} {:.1}s",
                success, iterations, best_score, duration_secs
            ),
        };
        let _ = writeln!(stderr, "{}", line);
    }

    fn truncate(s: &str, max: usize) -> String {
        let flat = s.replace('\n', " ");
        if flat.chars().count() <= max {
            flat
        } else {
            let cut: String = flat.chars().take(max).collect();
            format!("{}...", cut)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("verbose".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = LogEvent::ThresholdMet {
            iteration: 1,
            score: 9.0,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "threshold_met");
        assert_eq!(json["iteration"], 1);
    }

    #[test]
    fn test_file_sink_writes_json_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run.jsonl");
        let logger = Logger::with_file(LogFormat::Compact, &path).unwrap();
        logger.log(&LogEvent::MaxIterationsReached { iterations: 2 });
        logger.log(&LogEvent::RunCompleted {
            iterations: 2,
            best_score: 0.5,
            success: true,
            duration_secs: 1.0,
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "max_iterations_reached");
        assert!(first["timestamp"].is_string());
    }
}
