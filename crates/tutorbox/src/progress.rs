//! Lesson progress persistence
//!
//! Tracks, per lesson identifier, a 0/1 completion flag, persisted as one
//! flat JSON object. The store is loaded once at startup; every mutation
//! flushes the full mapping synchronously and atomically (temp file plus
//! rename). A failed flush is recoverable: the in-memory mapping keeps the
//! change and persistence resumes on the next successful flush.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Errors that occur reading or writing the progress store
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("failed to read progress file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse progress file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write progress file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-lesson completion state, backed by a JSON file
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    lessons: HashMap<String, u8>,
}

impl ProgressStore {
    /// Load persisted state, or start empty if no store exists yet
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ProgressError> {
        let path = path.into();
        let lessons = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| ProgressError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no progress file, starting empty");
                HashMap::new()
            }
            Err(source) => return Err(ProgressError::Read { path, source }),
        };
        Ok(Self { path, lessons })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether a lesson is marked complete
    pub fn is_complete(&self, lesson: &str) -> bool {
        self.lessons.get(lesson).copied().unwrap_or(0) == 1
    }

    /// Mark a lesson complete and flush the full mapping
    pub fn set_complete(&mut self, lesson: &str) -> Result<(), ProgressError> {
        self.lessons.insert(lesson.to_string(), 1);
        self.flush()
    }

    /// Reset a lesson's completion flag and flush.
    ///
    /// A lesson that was never recorded is a no-op and does not touch
    /// the file.
    pub fn reset(&mut self, lesson: &str) -> Result<(), ProgressError> {
        match self.lessons.get_mut(lesson) {
            Some(flag) => {
                *flag = 0;
                self.flush()
            }
            None => Ok(()),
        }
    }

    /// The full lesson mapping (0 = incomplete, 1 = complete)
    pub fn lessons(&self) -> &HashMap<String, u8> {
        &self.lessons
    }

    /// Number of lessons currently marked complete
    pub fn completed_count(&self) -> usize {
        self.lessons.values().filter(|&&flag| flag == 1).count()
    }

    /// Write the full mapping atomically: serialize to a sibling temp file,
    /// then rename over the store.
    fn flush(&self) -> Result<(), ProgressError> {
        let json =
            serde_json::to_string(&self.lessons).map_err(|source| ProgressError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|source| {
            warn!(path = %tmp.display(), error = %source, "progress flush failed");
            ProgressError::Write {
                path: tmp.clone(),
                source,
            }
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| ProgressError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), lessons = self.lessons.len(), "flushed progress");
        Ok(())
    }
}
