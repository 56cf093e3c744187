//! Plain-text trace output.
//!
//! `FileTraceSink` appends one line per entry to a file, the same
//! `"<role>: <content>"` rendering the transcript uses, with iteration and
//! termination delimiters. A header line opens each execution.

use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use tracing::debug;

use ponder_contracts::{
    error::{PonderError, PonderResult},
    trace::TraceEntry,
};
use ponder_core::traits::TraceSink;

struct FileState {
    file: File,
    /// Execution whose header was written last.
    current: Option<String>,
}

/// Appends rendered trace lines to a file. Existing content is kept.
pub struct FileTraceSink {
    path: PathBuf,
    state: Mutex<FileState>,
}

impl FileTraceSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> PonderResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| PonderError::TraceWriteFailed {
                reason: format!("cannot open trace file '{}': {e}", path.display()),
            })?;

        Ok(Self {
            path,
            state: Mutex::new(FileState { file, current: None }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> PonderResult<MutexGuard<'_, FileState>> {
        self.state.lock().map_err(|e| PonderError::TraceWriteFailed {
            reason: format!("trace file lock poisoned: {e}"),
        })
    }

    fn io_error(&self, err: std::io::Error) -> PonderError {
        PonderError::TraceWriteFailed {
            reason: format!("cannot write trace file '{}': {err}", self.path.display()),
        }
    }
}

impl TraceSink for FileTraceSink {
    fn record(&self, execution_id: &str, entry: &TraceEntry) -> PonderResult<()> {
        let mut state = self.lock()?;

        if state.current.as_deref() != Some(execution_id) {
            writeln!(state.file, "# execution {execution_id}").map_err(|e| self.io_error(e))?;
            state.current = Some(execution_id.to_string());
        }

        state
            .file
            .write_all(entry.render_line().as_bytes())
            .map_err(|e| self.io_error(e))
    }

    fn finalize(&self, execution_id: &str) -> PonderResult<()> {
        let mut state = self.lock()?;
        state.file.flush().map_err(|e| self.io_error(e))?;
        debug!(execution_id = %execution_id, path = %self.path.display(), "trace file flushed");
        Ok(())
    }
}
