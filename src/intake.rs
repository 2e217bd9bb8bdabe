//! Image intake: read files into [`ImageEntry`] values and append them.
//!
//! Intake does not validate what it reads. Any readable file becomes an entry;
//! one that is not an image is carried as `application/octet-stream` and
//! renders as a placeholder. Only a failed read drops the submission, and that
//! failure is logged and swallowed rather than returned to the caller.
//!
//! ## Concurrent submissions
//!
//! [`ImageIntake::submit_all`] reads the files on the rayon pool, so at most
//! one read per pool thread is in flight. Each worker sends its [`Completion`]
//! over a channel and the calling thread, the only writer of the model,
//! appends entries as they arrive. The resulting order is therefore
//! **completion order**, not submission order:
//!
//! ```text
//! submit a (slow), b (fast), c (medium)  →  model: b, c, a
//! ```

use crate::composition::CompositionModel;
use crate::types::ImageEntry;
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions accepted when collecting images from a directory.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where intake reads file bytes from.
pub trait FileSource: Sync {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskSource;

impl FileSource for DiskSource {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Outcome of one submission, as sent back by a worker.
#[derive(Debug)]
pub struct Completion {
    pub path: PathBuf,
    pub result: Result<ImageEntry, IntakeError>,
}

/// Summary of a batch of submissions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IntakeReport {
    /// Accepted files with the position each landed at, in append order.
    pub accepted: Vec<(PathBuf, usize)>,
    /// Files whose read failed; nothing was appended for them.
    pub failed: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ImageIntake<S: FileSource = DiskSource> {
    source: S,
    /// Dedicated pool size for [`submit_all`](Self::submit_all); `None` uses
    /// the global rayon pool.
    workers: Option<usize>,
}

impl ImageIntake<DiskSource> {
    pub fn new() -> Self {
        Self::with_source(DiskSource)
    }
}

impl<S: FileSource> ImageIntake<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            workers: None,
        }
    }

    /// Read batches on a dedicated pool of `workers` threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    /// Read one file into an entry.
    pub fn decode(&self, path: &Path) -> Result<ImageEntry, IntakeError> {
        let bytes = self.source.read(path).map_err(|source| IntakeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(ImageEntry::from_bytes(display_label(path), &bytes))
    }

    /// Read one file and append it. Returns the new entry's position, or
    /// `None` when the read failed.
    pub fn submit(&self, path: &Path, model: &mut CompositionModel) -> Option<usize> {
        match self.decode(path) {
            Ok(entry) => {
                if !entry.is_image() {
                    tracing::debug!(path = %path.display(), "accepted non-image file");
                }
                Some(model.add_image(entry))
            }
            Err(err) => {
                tracing::warn!(error = %err, "image intake failed");
                None
            }
        }
    }

    /// Read all files concurrently and append them in completion order.
    pub fn submit_all(&self, paths: &[PathBuf], model: &mut CompositionModel) -> IntakeReport {
        let (tx, rx) = mpsc::channel();
        std::thread::scope(|scope| {
            // Reads block on the pool; the calling thread drains the channel.
            scope.spawn(move || self.read_parallel(paths, tx));
            append_completions(rx, model)
        })
    }

    /// Decode `paths` on the rayon pool, sending each completion as it lands.
    fn read_parallel(&self, paths: &[PathBuf], tx: mpsc::Sender<Completion>) {
        let read = move || {
            paths.par_iter().for_each_with(tx, |tx, path| {
                let result = self.decode(path);
                // The receiver lives until every sender is dropped.
                let _ = tx.send(Completion {
                    path: path.clone(),
                    result,
                });
            });
        };
        let pool = self
            .workers
            .map(|n| rayon::ThreadPoolBuilder::new().num_threads(n).build());
        match pool {
            Some(Ok(pool)) => pool.install(read),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "intake pool unavailable, using global pool");
                read();
            }
            None => read(),
        }
    }
}

/// Append completed reads to the model in the order they are yielded.
pub fn append_completions(
    completions: impl IntoIterator<Item = Completion>,
    model: &mut CompositionModel,
) -> IntakeReport {
    let mut report = IntakeReport::default();
    for Completion { path, result } in completions {
        match result {
            Ok(entry) => {
                let index = model.add_image(entry);
                report.accepted.push((path, index));
            }
            Err(err) => {
                tracing::warn!(error = %err, "image intake failed");
                report.failed.push(path);
            }
        }
    }
    report
}

/// Image files directly inside `dir`, sorted by file name.
pub fn collect_image_paths(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
}

fn display_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
