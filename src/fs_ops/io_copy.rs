//! Streaming copy with progress reporting.
//!
//! - Writes to a newly created destination file (create_new; never clobbers).
//! - Buffered I/O with 1 MiB chunks; the progress callback fires after every chunk.
//! - The destination is fsynced before returning.
//!
//! Snapshot semantics: the source is read once from start to EOF; bytes appended
//! concurrently are not guaranteed to be included.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use super::helpers::io_error_with_help_io;

pub(super) const BUF_SIZE: usize = 1024 * 1024;

/// Copy `src` -> `dst`, calling `progress(copied, total)` as bytes land.
/// Returns the number of bytes written.
pub(super) fn copy_streaming(
    src: &Path,
    dst: &Path,
    progress: &mut dyn FnMut(u64, u64),
) -> io::Result<u64> {
    let mut src_f = File::open(src).map_err(io_error_with_help_io("open source file", src))?;
    let total = src_f.metadata()?.len();
    let mut dst_f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dst)
        .map_err(io_error_with_help_io("create destination file", dst))?;

    let mut buf = vec![0u8; BUF_SIZE];
    let mut copied: u64 = 0;
    loop {
        let n = match src_f.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        dst_f.write_all(&buf[..n])?;
        copied += n as u64;
        progress(copied, total);
    }
    dst_f.flush()?;
    dst_f.sync_all()?;
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn copy_small_file_ok() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        fs::write(&src, b"hello world").unwrap();

        let n = copy_streaming(&src, &dst, &mut |_, _| {}).unwrap();
        assert_eq!(n, 11);
        assert_eq!(fs::read(&dst).unwrap(), b"hello world");
    }

    #[test]
    fn fails_if_dest_exists() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::write(&src, b"data").unwrap();
        fs::write(&dst, b"x").unwrap();

        let err = copy_streaming(&src, &dst, &mut |_, _| {}).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn progress_reaches_total_across_chunks() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("big.bin");
        let dst = dir.path().join("big.out");
        let size = 2 * BUF_SIZE + 123;
        let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        fs::write(&src, &data).unwrap();

        let mut calls = Vec::new();
        let n = copy_streaming(&src, &dst, &mut |done, total| calls.push((done, total))).unwrap();
        assert_eq!(n as usize, size);
        assert!(calls.len() >= 3);
        assert_eq!(calls.last().copied(), Some((size as u64, size as u64)));
        assert_eq!(fs::read(&dst).unwrap(), data);
    }
}
