//! Guarded batch edits of a dhcpd.conf.
//!
//! ## Stages
//!
//! 1. **Read** the current file into one owned buffer
//! 2. **Pre-validate** it with the syntax oracle; an already broken file is
//!    never edited
//! 3. **Back up** the file under a timestamped name
//! 4. **Apply** every record in input order to the buffer; a bad record fails
//!    on its own without stopping the batch
//! 5. **Persist** the buffer atomically (skipped when nothing changed)
//! 6. **Post-validate** the written file and restore the backup if the oracle
//!    rejects it
//!
//! Validation and backup can each be switched off. Stage failures other than
//! per-record problems abort the run with a [`PipelineFailure`], which still
//! carries the per-record results once the apply stage has run.

use std::fs;
use std::path::{Path, PathBuf};

use dhcpd_conf::{
    Confirm, ConflictPolicy, EditError, Outcome, RecordError, ReservationEditor,
    ReservationRecord,
};
use thiserror::Error;

use crate::backup::{create_backup, persist, restore_backup};
use crate::batch::BatchRow;
use crate::oracle::{SyntaxOracle, Verdict};

/// What to do with each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    Add,
    Remove,
}

/// Safety switches for one run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub backup: bool,
    pub validate: bool,
    pub policy: ConflictPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            backup: true,
            validate: true,
            policy: ConflictPolicy::Prompt,
        }
    }
}

/// Outcome of one input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    /// Source line, 0 for a record given on the command line.
    pub line: usize,
    pub host: String,
    pub outcome: Outcome,
}

/// Result of a run that reached the end of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub records: Vec<RecordReport>,
    pub backup: Option<PathBuf>,
    /// Whether the file on disk was rewritten.
    pub changed: bool,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn succeeded(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    /// Failed records, including skipped ones.
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn skipped(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Skipped { .. }))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Errors that stop a run as a whole.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed reading config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("current dhcpd.conf has syntax errors; fix them before using this tool:\n{diagnostic}")]
    PreValidation { diagnostic: String },
    #[error("failed to create backup of {path}: {source}")]
    Backup {
        path: String,
        source: std::io::Error,
    },
    #[error("failed writing config {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("updated dhcpd.conf has syntax errors; configuration restored from backup {backup}:\n{diagnostic}")]
    PostValidation { backup: String, diagnostic: String },
    #[error("UNRECOVERABLE: updated dhcpd.conf has syntax errors and no backup was taken; {path} is left invalid and must be repaired by hand:\n{diagnostic}")]
    PostValidationNoBackup { path: String, diagnostic: String },
    #[error("UNRECOVERABLE: updated dhcpd.conf has syntax errors and restoring {backup} failed ({source}); {path} must be repaired by hand:\n{diagnostic}")]
    RollbackFailed {
        path: String,
        backup: String,
        diagnostic: String,
        source: std::io::Error,
    },
}

/// A run that stopped at a stage failure.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct PipelineFailure {
    pub error: PipelineError,
    /// Per-record results, present when the failure came after the apply stage.
    pub report: Option<BatchReport>,
}

impl From<PipelineError> for PipelineFailure {
    fn from(error: PipelineError) -> Self {
        Self {
            error,
            report: None,
        }
    }
}

/// One configuration file plus the collaborators needed to edit it safely.
pub struct Pipeline<'a> {
    pub config_path: &'a Path,
    pub domain: &'a str,
    pub options: PipelineOptions,
    pub oracle: &'a dyn SyntaxOracle,
}

impl Pipeline<'_> {
    /// Run `action` for every row, in order.
    pub fn run(
        &self,
        action: BatchAction,
        rows: &[BatchRow],
        confirm: &mut dyn Confirm,
    ) -> Result<BatchReport, PipelineFailure> {
        let path = self.config_path;
        let original = fs::read_to_string(path).map_err(|source| PipelineError::Read {
            path: path.display().to_string(),
            source,
        })?;

        if self.options.validate {
            tracing::debug!(path = %path.display(), "Validating current configuration");
            if let Some(diagnostic) = self.check("current") {
                return Err(PipelineError::PreValidation { diagnostic }.into());
            }
        }

        let backup = if self.options.backup {
            let backup = create_backup(path).map_err(|source| PipelineError::Backup {
                path: path.display().to_string(),
                source,
            })?;
            Some(backup)
        } else {
            None
        };

        tracing::debug!(records = rows.len(), ?action, "Processing records");
        let mut editor =
            ReservationEditor::new(original.clone(), self.domain, self.options.policy, confirm);
        let records: Vec<RecordReport> = rows
            .iter()
            .map(|row| {
                let outcome = apply_row(&mut editor, action, row);
                log_outcome(row, &outcome);
                RecordReport {
                    line: row.line,
                    host: row.hostname.clone(),
                    outcome,
                }
            })
            .collect();
        let updated = editor.into_text();

        if updated == original {
            tracing::debug!(path = %path.display(), "No changes to write");
            return Ok(BatchReport {
                records,
                backup,
                changed: false,
            });
        }

        if let Err(source) = persist(path, &updated) {
            return Err(PipelineFailure {
                error: PipelineError::Write {
                    path: path.display().to_string(),
                    source,
                },
                report: Some(BatchReport {
                    records,
                    backup,
                    changed: false,
                }),
            });
        }
        tracing::debug!(path = %path.display(), "Configuration written");

        if self.options.validate {
            if let Some(diagnostic) = self.check("updated") {
                let error = self.roll_back(backup.as_deref(), diagnostic);
                let changed = !matches!(error, PipelineError::PostValidation { .. });
                return Err(PipelineFailure {
                    error,
                    report: Some(BatchReport {
                        records,
                        backup,
                        changed,
                    }),
                });
            }
        }

        Ok(BatchReport {
            records,
            backup,
            changed: true,
        })
    }

    /// Ask the oracle about the file on disk; `Some(diagnostic)` when rejected.
    fn check(&self, stage: &str) -> Option<String> {
        match self.oracle.check(self.config_path) {
            Verdict::Valid => {
                tracing::debug!(stage, "dhcpd.conf syntax is valid");
                None
            }
            Verdict::Unavailable { reason } => {
                tracing::warn!(stage, %reason, "Skipping syntax validation");
                None
            }
            Verdict::Invalid { diagnostic } => {
                tracing::error!(stage, "dhcpd.conf syntax validation failed");
                Some(diagnostic)
            }
        }
    }

    fn roll_back(&self, backup: Option<&Path>, diagnostic: String) -> PipelineError {
        let path = self.config_path.display().to_string();
        let Some(backup) = backup else {
            tracing::error!(%path, "No backup available; invalid configuration left in place");
            return PipelineError::PostValidationNoBackup { path, diagnostic };
        };
        match restore_backup(self.config_path, backup) {
            Ok(()) => PipelineError::PostValidation {
                backup: backup.display().to_string(),
                diagnostic,
            },
            Err(source) => {
                tracing::error!(%path, backup = %backup.display(), error = %source, "Rollback failed");
                PipelineError::RollbackFailed {
                    path,
                    backup: backup.display().to_string(),
                    diagnostic,
                    source,
                }
            }
        }
    }
}

fn apply_row<C: Confirm>(
    editor: &mut ReservationEditor<C>,
    action: BatchAction,
    row: &BatchRow,
) -> Outcome {
    match action {
        BatchAction::Add => match ReservationRecord::new(&row.hostname, &row.mac, &row.ip) {
            Ok(record) => editor.add(&record),
            Err(err) => Outcome::Failed(err.into()),
        },
        BatchAction::Remove => {
            let hostname = row.hostname.trim();
            if hostname.is_empty() {
                Outcome::Failed(EditError::InvalidRecord(RecordError::EmptyHostname))
            } else {
                editor.remove(hostname)
            }
        }
    }
}

fn log_outcome(row: &BatchRow, outcome: &Outcome) {
    match outcome {
        Outcome::Failed(err) => {
            tracing::error!(line = row.line, host = %row.hostname, error = %err, "Record failed");
        }
        Outcome::Skipped { reason } => {
            tracing::warn!(line = row.line, host = %row.hostname, %reason, "Record skipped");
        }
        other => {
            tracing::debug!(line = row.line, host = %row.hostname, outcome = other.label(), "Record applied");
        }
    }
}
