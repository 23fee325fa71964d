use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::foundation::error::{WiggleError, WiggleResult};

/// MIME type of encoded wigglegrams.
pub const GIF_MIME: &str = "image/gif";

/// Where a sink put the bytes it was given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkHandle {
    /// Written to a file.
    File(PathBuf),
    /// Kept in memory at this write index.
    Memory(usize),
}

/// Persistence contract for a finished byte stream.
pub trait OutputSink {
    /// Persist `bytes` and return a handle to them.
    fn write(&mut self, bytes: &[u8]) -> WiggleResult<SinkHandle>;

    /// Make a written file visible in a media gallery.
    ///
    /// Returns `Ok(false)` when the sink has no gallery, which is the default.
    fn publish_to_gallery(
        &mut self,
        _handle: &SinkHandle,
        _display_name: &str,
        _mime_type: &str,
    ) -> WiggleResult<bool> {
        Ok(false)
    }
}

/// Create `path`'s parent directory if needed.
pub fn ensure_parent_dir(path: &Path) -> WiggleResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            WiggleError::sink(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> WiggleResult<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, bytes)
        .map_err(|e| WiggleError::sink(format!("failed to write '{}': {e}", path.display())))
}

/// Writes each stream to a fresh `wigglegram_<unix_millis>.gif` inside a directory.
#[derive(Clone, Debug)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    /// Sink into `dir` (created on first write).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn next_path(&self) -> PathBuf {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let mut path = self.dir.join(format!("wigglegram_{millis}.gif"));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("wigglegram_{millis}_{n}.gif"));
            n += 1;
        }
        path
    }
}

impl OutputSink for DirSink {
    fn write(&mut self, bytes: &[u8]) -> WiggleResult<SinkHandle> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            WiggleError::sink(format!(
                "failed to create output directory '{}': {e}",
                self.dir.display()
            ))
        })?;
        let path = self.next_path();
        write_file(&path, bytes)?;
        Ok(SinkHandle::File(path))
    }
}

/// Writes the stream to one explicit path.
#[derive(Clone, Debug)]
pub struct FileSink {
    path: PathBuf,
    overwrite: bool,
}

impl FileSink {
    /// Sink to `path`, replacing an existing file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            overwrite: true,
        }
    }

    /// Refuse to replace an existing file when `overwrite` is `false`.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl OutputSink for FileSink {
    fn write(&mut self, bytes: &[u8]) -> WiggleResult<SinkHandle> {
        if !self.overwrite && self.path.exists() {
            return Err(WiggleError::sink(format!(
                "output file '{}' already exists",
                self.path.display()
            )));
        }
        write_file(&self.path, bytes)?;
        Ok(SinkHandle::File(self.path.clone()))
    }
}

/// Keeps every written stream in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    writes: Vec<Vec<u8>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of each write, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, bytes: &[u8]) -> WiggleResult<SinkHandle> {
        self.writes.push(bytes.to_vec());
        Ok(SinkHandle::Memory(self.writes.len() - 1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
