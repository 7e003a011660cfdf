/// Batch script emission
///
/// Walks the final ledger and writes one reviewable script that performs
/// every rename and deletion at once. The decision of what to emit is
/// dialect-independent; only the rendering differs between POSIX shell
/// and Windows batch. The script is never executed by this tool.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::state::ledger::Ledger;

/// Subdirectory that receives images marked for deletion.
pub const QUARANTINE_DIR: &str = "deleted";

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write batch script: {0}")]
    Io(#[from] std::io::Error),
}

/// The command dialect the script is rendered in, chosen once at emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptDialect {
    Posix,
    WindowsBatch,
}

impl ScriptDialect {
    /// Dialect matching the operating system this tool runs on.
    pub fn for_host() -> Self {
        if cfg!(windows) {
            ScriptDialect::WindowsBatch
        } else {
            ScriptDialect::Posix
        }
    }

    pub fn script_name(self) -> &'static str {
        match self {
            ScriptDialect::Posix => "apply_renames.sh",
            ScriptDialect::WindowsBatch => "apply_renames.cmd",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ScriptDialect::Posix => "POSIX shell",
            ScriptDialect::WindowsBatch => "Windows batch",
        }
    }

    fn comment(self, text: &str) -> String {
        match self {
            ScriptDialect::Posix => format!("# {}", text),
            ScriptDialect::WindowsBatch => format!(":: {}", text),
        }
    }
}

/// One filesystem operation the script will perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Idempotent `mkdir` for the quarantine subdirectory
    EnsureQuarantine,
    /// Move a deleted image into quarantine
    Quarantine { original: String },
    /// Rename an image to its proposed name
    Rename { original: String, proposed: String },
}

/// Decide what the script must do, in ledger order.
///
/// One operation per changed entry: deletion wins over rename, unchanged
/// entries emit nothing. The quarantine `mkdir` is prepended exactly once,
/// and only when at least one entry is marked deleted.
pub fn plan(ledger: &Ledger) -> Vec<Operation> {
    let mut operations = Vec::new();

    if ledger.entries().iter().any(|entry| entry.delete) {
        operations.push(Operation::EnsureQuarantine);
    }

    for entry in ledger.entries() {
        if entry.delete {
            operations.push(Operation::Quarantine {
                original: entry.original.clone(),
            });
        } else if entry.proposed != entry.original {
            operations.push(Operation::Rename {
                original: entry.original.clone(),
                proposed: entry.proposed.clone(),
            });
        }
    }

    operations
}

/// Render one operation as a single script line.
fn render(operation: &Operation, dialect: ScriptDialect) -> String {
    match (operation, dialect) {
        (Operation::EnsureQuarantine, ScriptDialect::Posix) => {
            format!("mkdir -p -- {}", sh_quote(QUARANTINE_DIR))
        }
        (Operation::EnsureQuarantine, ScriptDialect::WindowsBatch) => {
            format!(
                "if not exist \"{dir}\" mkdir \"{dir}\"",
                dir = QUARANTINE_DIR
            )
        }
        (Operation::Quarantine { original }, ScriptDialect::Posix) => {
            format!(
                "mv -- {} {}",
                sh_quote(original),
                sh_quote(&format!("{}/{}", QUARANTINE_DIR, original))
            )
        }
        (Operation::Quarantine { original }, ScriptDialect::WindowsBatch) => {
            format!(
                "move \"{original}\" \"{dir}\\{original}\"",
                original = original,
                dir = QUARANTINE_DIR
            )
        }
        (Operation::Rename { original, proposed }, ScriptDialect::Posix) => {
            format!("mv -- {} {}", sh_quote(original), sh_quote(proposed))
        }
        (Operation::Rename { original, proposed }, ScriptDialect::WindowsBatch) => {
            format!("move \"{}\" \"{}\"", original, proposed)
        }
    }
}

/// Render the full script: header comments plus one line per operation.
///
/// Collisions between proposed names are not resolved here; whether a
/// colliding line overwrites, fails or is skipped is decided by whoever
/// runs the script, and the header says so.
pub fn render_script(operations: &[Operation], dialect: ScriptDialect) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    let mut lines = Vec::with_capacity(operations.len() + 4);
    if dialect == ScriptDialect::Posix {
        lines.push("#!/bin/sh".to_string());
    }
    lines.push(dialect.comment(&format!(
        "Generated by photo-renamer on {} ({})",
        timestamp,
        dialect.label()
    )));
    lines.push(dialect.comment(
        "Review before running, from the folder that contains the images.",
    ));
    lines.push(dialect.comment(
        "Name collisions are not resolved; a colliding move may fail or be a no-op.",
    ));

    for operation in operations {
        lines.push(render(operation, dialect));
    }

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

/// Write the batch script next to the images.
///
/// Returns the script path, or `None` when the ledger holds no changes
/// and there is nothing to apply.
pub fn emit_script(
    ledger: &Ledger,
    folder: &Path,
    dialect: ScriptDialect,
) -> Result<Option<PathBuf>, EmitError> {
    let operations = plan(ledger);
    if operations.is_empty() {
        return Ok(None);
    }

    let path = folder.join(dialect.script_name());
    fs::write(&path, render_script(&operations, dialect))?;

    Ok(Some(path))
}

/// Single-quote a string for POSIX shell, escaping embedded quotes.
fn sh_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}
