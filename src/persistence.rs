// File: src/persistence.rs
use crate::error::{AccentsError, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// An output file that only appears at its destination once fully written.
///
/// Data goes to a temporary file in the destination directory; `persist`
/// renames it into place. Dropping without persisting removes the temporary
/// file and leaves any existing destination untouched, which is what makes
/// converting a file onto itself safe.
pub struct AtomicFile {
    temp_file: NamedTempFile,
    destination: PathBuf,
}

impl AtomicFile {
    pub fn create(destination: &Path) -> Result<Self> {
        let parent_dir = match destination.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let temp_file = NamedTempFile::new_in(parent_dir)
            .map_err(|e| AccentsError::from_write(destination, e))?;

        // Keep the mode of a file we are about to replace.
        if let Ok(metadata) = fs::metadata(destination) {
            fs::set_permissions(temp_file.path(), metadata.permissions())
                .map_err(|e| AccentsError::from_write(destination, e))?;
        }

        debug!(temp = %temp_file.path().display(), dest = %destination.display(), "staging output");
        Ok(Self {
            temp_file,
            destination: destination.to_path_buf(),
        })
    }

    pub fn as_file(&self) -> &File {
        self.temp_file.as_file()
    }

    /// Moves the finished output over the destination.
    pub fn persist(self) -> Result<()> {
        self.temp_file
            .as_file()
            .sync_all()
            .map_err(|e| AccentsError::from_write(&self.destination, e))?;
        self.temp_file
            .persist(&self.destination)
            .map_err(|e| AccentsError::from_write(&self.destination, e.error))?;
        Ok(())
    }
}
