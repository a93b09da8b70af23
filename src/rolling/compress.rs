//! Gzip for size-rolled backups. Text logs shrink by an order of magnitude.

use crate::Error;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Writes `<path>.gz`, then removes `path`. Returns the compressed file's path
/// and the bytes saved.
///
/// A half-written `.gz` is removed on failure so a retry starts clean.
pub(super) fn compress_file(path: &Path) -> Result<(PathBuf, u64), Error> {
    let mut gz_name = path.as_os_str().to_owned();
    gz_name.push(".gz");
    let gz_path = PathBuf::from(gz_name);

    let result = write_gzip(path, &gz_path);
    if result.is_err() {
        let _ = fs::remove_file(&gz_path);
    }
    let original_size = result?;

    let compressed_size = fs::metadata(&gz_path)?.len();
    fs::remove_file(path)?;

    Ok((gz_path, original_size.saturating_sub(compressed_size)))
}

fn write_gzip(src: &Path, dst: &Path) -> Result<u64, Error> {
    let input = File::open(src)?;
    let original_size = input.metadata()?.len();
    let mut reader = BufReader::new(input);

    let writer = BufWriter::new(File::create(dst)?);
    let mut encoder = GzEncoder::new(writer, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    Ok(original_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn compressed_file_replaces_original() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-2024-03-09T08-05-01.000.log");
        fs::write(&path, "line\n".repeat(500)).unwrap();

        let (gz_path, saved) = compress_file(&path).unwrap();

        assert!(!path.exists());
        assert!(gz_path.to_string_lossy().ends_with(".log.gz"));
        assert!(saved > 0);

        let mut content = String::new();
        GzDecoder::new(File::open(gz_path).unwrap())
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content.lines().count(), 500);
    }
}
