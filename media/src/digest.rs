//! Whole-file content digests.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Computes the blake3 digest of a file's contents.
///
/// Used by the identity check to prove two artifacts differ before any
/// frame decoding happens.
pub fn file_digest(path: &Path) -> io::Result<blake3::Hash> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn identical_contents_identical_digests() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();
        assert_eq!(file_digest(&a).unwrap(), file_digest(&b).unwrap());
    }

    #[test]
    fn different_contents_different_digests() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        fs::write(&a, b"one").unwrap();
        fs::write(&b, b"two").unwrap();
        assert_ne!(file_digest(&a).unwrap(), file_digest(&b).unwrap());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = file_digest(Path::new("/nonexistent/x.mp4")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
