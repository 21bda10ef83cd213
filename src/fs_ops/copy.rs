//! Buffered copy primitive:
//! - Streams into a temp file inside the destination directory
//! - Optionally stamps the source modification time on it
//! - Atomically renames temp -> destination, so a failed copy never leaves a half file

use anyhow::{Context, Result, anyhow, bail};
use std::fs;
use std::path::Path;

use super::atomic::try_atomic_move;
use super::helpers::io_error_with_help;
use super::{io_copy, meta, util};

/// Knobs for a single copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    /// Replace an existing destination file
    pub overwrite: bool,
    /// Give the copy the source's access/modification times
    pub preserve_timestamp: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            preserve_timestamp: true,
        }
    }
}

/// Copy `src` to `dest`, creating the destination directory if needed.
/// Fails when `dest` exists and `opts.overwrite` is false. Returns bytes copied.
pub fn copy_bytes(
    src: &Path,
    dest: &Path,
    opts: CopyOptions,
    progress: &mut dyn FnMut(u64, u64),
) -> Result<u64> {
    let src_meta = fs::metadata(src).map_err(io_error_with_help("stat source file", src))?;
    if !src_meta.is_file() {
        bail!("source is not a regular file: {}", src.display());
    }
    if dest.is_dir() {
        bail!("destination is a directory: {}", dest.display());
    }
    if dest.exists() && !opts.overwrite {
        bail!("destination exists and overwrite is off: {}", dest.display());
    }

    let dest_dir = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;
    fs::create_dir_all(dest_dir)
        .map_err(io_error_with_help("create destination directory", dest_dir))?;

    let tmp_path = util::unique_temp_path(dest_dir);
    let bytes = match io_copy::copy_streaming(src, &tmp_path, progress) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_error_with_help("copy to temporary file", &tmp_path)(e));
        }
    };

    if opts.preserve_timestamp {
        meta::preserve_timestamps(&tmp_path, &src_meta);
    }

    if let Err(e) = try_atomic_move(&tmp_path, dest) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_context(|| {
            format!(
                "rename temporary file '{}' -> '{}'",
                tmp_path.display(),
                dest.display()
            )
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use tempfile::tempdir;

    #[test]
    fn creates_missing_parents() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        fs::write(&src, "alpha").unwrap();
        let dest = td.path().join("out").join("deep").join("a.txt");

        let n = copy_bytes(&src, &dest, CopyOptions::default(), &mut |_, _| {}).unwrap();
        assert_eq!(n, 5);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "alpha");
        assert!(src.exists());
    }

    #[test]
    fn refuses_existing_without_overwrite() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dest = td.path().join("b.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dest, "old").unwrap();

        assert!(copy_bytes(&src, &dest, CopyOptions::default(), &mut |_, _| {}).is_err());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "old");

        let opts = CopyOptions {
            overwrite: true,
            ..CopyOptions::default()
        };
        copy_bytes(&src, &dest, opts, &mut |_, _| {}).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn preserves_mtime_when_asked() {
        let td = tempdir().unwrap();
        let src = td.path().join("old.txt");
        fs::write(&src, "x").unwrap();
        let ts = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&src, ts).unwrap();

        let dest = td.path().join("copy.txt");
        copy_bytes(&src, &dest, CopyOptions::default(), &mut |_, _| {}).unwrap();
        let got = FileTime::from_last_modification_time(&fs::metadata(&dest).unwrap());
        assert_eq!(got.unix_seconds(), ts.unix_seconds());
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        fs::write(&src, "alpha").unwrap();
        let out = td.path().join("out");
        copy_bytes(&src, &out.join("a.txt"), CopyOptions::default(), &mut |_, _| {}).unwrap();
        for entry in fs::read_dir(&out).unwrap().flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            assert!(!name.starts_with(util::TEMP_PREFIX), "temp left behind: {name}");
        }
    }
}
