use serde::{Deserialize, Serialize};

use crate::tempo::{Confidence, TempoAnalysis, TempoEstimate};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per source
    #[default]
    Json,
    /// Human-readable lines
    Text,
}

/// Result for one source, shaped as `{bpm, duration, confidence}` or `{error}`.
#[derive(Debug, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Success(Success),
    Failure { error: String },
}

#[derive(Debug, Serialize)]
pub struct Success {
    #[serde(flatten)]
    pub estimate: TempoEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onsets: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_interval: Option<f64>,
}

impl Report {
    pub fn success(source: Option<String>, analysis: TempoAnalysis, with_onsets: bool) -> Self {
        let (onsets, dominant_interval) = if with_onsets {
            (Some(analysis.onsets), analysis.dominant_interval)
        } else {
            (None, None)
        };
        Self {
            source,
            outcome: Outcome::Success(Success {
                estimate: analysis.estimate,
                onsets,
                dominant_interval,
            }),
        }
    }

    pub fn failure(source: Option<String>, error: &anyhow::Error) -> Self {
        Self {
            source,
            outcome: Outcome::Failure {
                error: format!("{:#}", error),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string(self)
                .unwrap_or_else(|e| format!(r#"{{"error":"failed to serialize report: {}"}}"#, e)),
            OutputFormat::Text => self.render_text(),
        }
    }

    fn render_text(&self) -> String {
        let prefix = self
            .source
            .as_ref()
            .map(|s| format!("{}: ", s))
            .unwrap_or_default();
        match &self.outcome {
            Outcome::Success(success) => {
                let estimate = &success.estimate;
                let confidence = match estimate.confidence {
                    Confidence::Low => "low confidence",
                    Confidence::Estimated => "estimated",
                };
                let mut line = format!(
                    "{}{} BPM ({}, {:.2}s)",
                    prefix, estimate.bpm, confidence, estimate.duration
                );
                if let Some(ref onsets) = success.onsets {
                    line.push_str(&format!(", {} onsets", onsets.len()));
                }
                line
            }
            Outcome::Failure { error } => format!("{}error: {}", prefix, error),
        }
    }
}
