// ConsoleLink - platform/fs.rs
//
// Filesystem helpers shared by the export sink and the feed follower.
// Every file handle is scoped to a single call and released on all paths.

use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Replace `path` with `content` atomically (write temp -> rename).
///
/// The parent directory must already exist. A crash between write and rename
/// leaves the previous file intact. The temp file is removed if the rename
/// fails.
pub fn replace_file(path: &Path, content: &[u8], temp_extension: &str) -> io::Result<()> {
    let tmp = temp_path(path, temp_extension);
    std::fs::write(&tmp, content)?;

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

fn temp_path(path: &Path, temp_extension: &str) -> PathBuf {
    path.with_extension(temp_extension)
}

/// Read up to `limit` bytes from `path` starting at byte position `offset`.
///
/// Returns fewer bytes than `limit` if the file ends before `limit` is reached.
pub fn read_bytes_at(path: &Path, offset: u64, limit: usize) -> io::Result<Vec<u8>> {
    let mut file = std::fs::File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = Vec::with_capacity(limit.min(64 * 1024));
    file.take(limit as u64).read_to_end(&mut buf)?;
    Ok(buf)
}
