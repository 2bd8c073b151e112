//! External drug-target-interaction scoring.
//!
//! The DTI predictor is a black box behind [`DtiScorer`]: target sequence
//! and structures in, one optional score per structure out. The shipped
//! adapter spawns an external command; a scorer failure degrades the run
//! (missing DTI column) without touching any computed descriptor.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DtiError {
    #[error("DTI command failed to start: {0}")]
    Spawn(std::io::Error),

    #[error("DTI command exited with status {0}")]
    NonZeroExit(String),

    #[error("DTI command returned {returned} scores for {expected} structures")]
    LengthMismatch { expected: usize, returned: usize },

    #[error("Unparseable DTI score on line {line}: '{content}'")]
    Malformed { line: usize, content: String },

    #[error("IO error talking to DTI command: {0}")]
    Io(#[from] std::io::Error),
}

/// A drug-target-interaction predictor.
pub trait DtiScorer {
    /// Human-readable scorer name for logs and reports.
    fn name(&self) -> &str;

    /// Score each structure against the target sequence. Returns exactly
    /// one entry per input structure, `None` where the predictor could not
    /// score that structure.
    fn score(
        &self,
        target_sequence: &str,
        structures: &[String],
    ) -> Result<Vec<Option<f64>>, DtiError>;
}

/// Adapter that invokes an external predictor executable.
///
/// Protocol: the target sequence is passed as the first argument, the
/// structures are written to stdin one per line, and the command prints one
/// score per line on stdout - a float, or `NA` for structures it cannot
/// score.
pub struct CommandDtiScorer {
    command: PathBuf,
}

impl CommandDtiScorer {
    pub fn new(command: PathBuf) -> Self {
        CommandDtiScorer { command }
    }
}

impl DtiScorer for CommandDtiScorer {
    fn name(&self) -> &str {
        self.command.to_str().unwrap_or("dti-command")
    }

    fn score(
        &self,
        target_sequence: &str,
        structures: &[String],
    ) -> Result<Vec<Option<f64>>, DtiError> {
        let mut child = Command::new(&self.command)
            .arg(target_sequence)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(DtiError::Spawn)?;

        if let Some(stdin) = child.stdin.as_mut() {
            for structure in structures {
                writeln!(stdin, "{structure}")?;
            }
        }
        // Close stdin so the child sees EOF.
        drop(child.stdin.take());

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(DtiError::NonZeroExit(output.status.to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut scores = Vec::with_capacity(structures.len());
        for (i, line) in stdout.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.eq_ignore_ascii_case("na") {
                scores.push(None);
            } else {
                let value = trimmed.parse::<f64>().map_err(|_| DtiError::Malformed {
                    line: i + 1,
                    content: trimmed.to_string(),
                })?;
                scores.push(Some(value));
            }
        }

        if scores.len() != structures.len() {
            return Err(DtiError::LengthMismatch {
                expected: structures.len(),
                returned: scores.len(),
            });
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-process fake for unit tests.
    struct FixedScorer(Vec<Option<f64>>);

    impl DtiScorer for FixedScorer {
        fn name(&self) -> &str {
            "fixed"
        }

        fn score(
            &self,
            _target: &str,
            structures: &[String],
        ) -> Result<Vec<Option<f64>>, DtiError> {
            assert_eq!(structures.len(), self.0.len());
            Ok(self.0.clone())
        }
    }

    #[test]
    fn fixed_scorer_round_trip() {
        let scorer = FixedScorer(vec![Some(6.2), None]);
        let scores = scorer
            .score("MKT", &["CCO".to_string(), "bad".to_string()])
            .unwrap();
        assert_eq!(scores, vec![Some(6.2), None]);
    }

    #[test]
    fn missing_command_is_a_spawn_error() {
        let scorer = CommandDtiScorer::new(PathBuf::from("/nonexistent/dti-predictor"));
        let err = scorer.score("MKT", &["CCO".to_string()]).unwrap_err();
        assert!(matches!(err, DtiError::Spawn(_)));
    }
}
