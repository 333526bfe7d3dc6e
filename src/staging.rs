//! Staging: durable, pipeline-owned temporary files.
//!
//! Resolved bytes are written to a uniquely named file inside the configured
//! staging directory. [`StagedFile`] owns that path exclusively until it is
//! released to the finished artifact; on any failure path the guard's drop
//! removes the file, so no invocation leaks temp files.
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::source::{RawPayload, SourceOrigin};

/// Recognizable prefix for staged basenames.
const STAGING_PREFIX: &str = "intake-";

/// Exclusive owner of a staged file during pipeline processing.
///
/// The file is removed when the guard drops, unless [`release`]d to the
/// artifact. Removal is existence-checked, so an already-deleted file is a
/// no-op.
///
/// [`release`]: StagedFile::release
#[derive(Debug)]
pub(crate) struct StagedFile {
    path: PathBuf,
    released: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Staged basename, e.g. `intake-3f2a….png`.
    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Renames the staged file in place so its basename carries the sniffed
    /// extension. On failure the pre-rename file is removed before the
    /// error is raised.
    pub fn carry_extension(&mut self, extension: &str) -> Result<(), IntakeError> {
        let renamed = self.path.with_file_name(format!(
            "{}.{extension}",
            self.basename()
        ));
        if let Err(err) = fs::rename(&self.path, &renamed) {
            let from = self.path.clone();
            self.remove_now();
            return Err(IntakeError::RenamingTemporaryFileFailed {
                from,
                to: renamed,
                reason: err.to_string(),
            });
        }
        self.path = renamed;
        Ok(())
    }

    /// Hands ownership of the file to the caller; the guard will no longer
    /// delete it.
    pub fn release(mut self) -> PathBuf {
        self.released = true;
        self.path.clone()
    }

    fn remove_now(&mut self) {
        self.released = true;
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.released {
            self.remove_now();
        }
    }
}

/// Writes the resolved payload into a fresh staging file.
///
/// The staging directory is checked up front; a missing or unwritable
/// directory fails fast without touching the filesystem. Name collisions
/// are retried once with a fresh random suffix. Local-file inputs are
/// staged via an atomic filesystem copy instead of re-writing the resolved
/// bytes, which avoids doubling memory for large files.
pub(crate) fn stage(payload: &RawPayload, cfg: &IntakeConfig) -> Result<StagedFile, IntakeError> {
    let dir = cfg.staging_dir();
    ensure_writable_dir(&dir)?;

    let mut staged = create_exclusive(&dir)?;

    let write_result = match &payload.origin {
        SourceOrigin::LocalFile(src) => fs::copy(src, staged.path()).map(|_| ()),
        SourceOrigin::Inline => write_all_durable(staged.path(), &payload.bytes),
    };
    if let Err(err) = write_result {
        let path = staged.path().to_path_buf();
        staged.remove_now();
        return Err(IntakeError::WritingTemporaryFileFailed {
            path,
            reason: err.to_string(),
        });
    }

    Ok(staged)
}

fn ensure_writable_dir(dir: &Path) -> Result<(), IntakeError> {
    let writable = fs::metadata(dir)
        .map(|meta| meta.is_dir() && !meta.permissions().readonly())
        .unwrap_or(false);
    if !writable {
        return Err(IntakeError::TempDirectoryNotWritable {
            dir: dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Creates a collision-resistant staging file exclusively, retrying once
/// with a new suffix before giving up.
fn create_exclusive(dir: &Path) -> Result<StagedFile, IntakeError> {
    let mut last_error = None;
    for _ in 0..2 {
        let path = dir.join(format!("{STAGING_PREFIX}{}", Uuid::new_v4().simple()));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(_) => {
                return Ok(StagedFile {
                    path,
                    released: false,
                })
            }
            Err(err) => last_error = Some(err),
        }
    }
    Err(IntakeError::TemporaryFileNotWritten {
        dir: dir.to_path_buf(),
        reason: last_error
            .map(|err| err.to_string())
            .unwrap_or_else(|| "unknown".into()),
    })
}

/// Writes all bytes and syncs before the handle closes; a partial write is
/// surfaced as an error and the caller removes the file.
fn write_all_durable(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new().write(true).open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
