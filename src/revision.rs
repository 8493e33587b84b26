//! Historical file content backed by a temporary file
//!
//! `cleartool get` can only write to a file, so fetched revisions live in a
//! temp file that is deleted when the [`RevisionBlob`] is closed or dropped.
//! Files that cannot be deleted at that point are queued and retried by
//! [`purge_deferred`], which the binary calls before exiting.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, PoisonError};

use tempfile::TempPath;

use crate::cleartool::constants::TEMP_FILE_PREFIX;

/// Temp files whose deletion failed and must be retried at teardown
static DEFERRED: LazyLock<Mutex<Vec<PathBuf>>> = LazyLock::new(|| Mutex::new(Vec::new()));

/// Reserve a fresh temp file name that does not exist on disk
///
/// The file is created to claim a unique name, then removed again because
/// `cleartool get -to` refuses to overwrite an existing file.
pub(crate) fn reserve_temp_path() -> io::Result<TempPath> {
    let temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .suffix(".tmp")
        .tempfile()?
        .into_temp_path();

    if let Err(e) = std::fs::remove_file(&temp)
        && e.kind() != io::ErrorKind::NotFound
    {
        tracing::warn!(path = %temp.display(), error = %e, "failed to remove stale temp file");
    }
    Ok(temp)
}

/// Delete a temp file, queueing it for [`purge_deferred`] on failure
pub(crate) fn remove_temp(temp: TempPath) -> io::Result<()> {
    let path = temp.to_path_buf();
    match temp.close() {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "deferring temp file deletion");
            defer_deletion(path);
            Err(e)
        }
    }
}

fn defer_deletion(path: PathBuf) {
    DEFERRED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(path);
}

/// Temp files still waiting for deletion
pub fn deferred() -> Vec<PathBuf> {
    DEFERRED.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Retry every deferred deletion; returns how many files are still left
pub fn purge_deferred() -> usize {
    let mut pending = DEFERRED.lock().unwrap_or_else(PoisonError::into_inner);
    pending.retain(|path| match std::fs::remove_file(path) {
        Ok(()) => false,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "temp file still cannot be deleted");
            true
        }
    });
    pending.len()
}

/// Content of a file at a historical revision
///
/// Reads from the backing temp file. The file is deleted by [`Self::close`]
/// or, failing an explicit close, when the blob is dropped.
#[derive(Debug)]
pub struct RevisionBlob {
    reader: Option<BufReader<File>>,
    temp: Option<TempPath>,
}

impl RevisionBlob {
    /// Open the file cleartool wrote; the temp file is removed if that fails
    pub(crate) fn open(temp: TempPath) -> io::Result<Self> {
        match File::open(&temp) {
            Ok(file) => Ok(Self {
                reader: Some(BufReader::new(file)),
                temp: Some(temp),
            }),
            Err(e) => {
                let _ = remove_temp(temp);
                Err(e)
            }
        }
    }

    /// Location of the backing temp file while the blob is open
    pub fn path(&self) -> Option<&Path> {
        self.temp.as_deref()
    }

    /// Read the whole content into memory and release the temp file
    pub fn into_bytes(mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        self.close()?;
        Ok(buf)
    }

    /// Close the stream and delete the temp file
    ///
    /// A failed deletion is reported here and queued for [`purge_deferred`].
    pub fn close(mut self) -> io::Result<()> {
        self.release()
    }

    fn release(&mut self) -> io::Result<()> {
        self.reader = None;
        match self.temp.take() {
            Some(temp) => remove_temp(temp),
            None => Ok(()),
        }
    }
}

impl Read for RevisionBlob {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reader.as_mut() {
            Some(reader) => reader.read(buf),
            None => Ok(0),
        }
    }
}

impl BufRead for RevisionBlob {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self.reader.as_mut() {
            Some(reader) => reader.fill_buf(),
            None => Ok(&[]),
        }
    }

    fn consume(&mut self, amt: usize) {
        if let Some(reader) = self.reader.as_mut() {
            reader.consume(amt);
        }
    }
}

impl Drop for RevisionBlob {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
