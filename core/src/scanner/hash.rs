use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read size used when streaming content through the hasher.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Streams `reader` through SHA-256 in `chunk_size` reads and returns the
/// lowercase hex digest.
pub fn hash_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; chunk_size.max(1)];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

pub fn hash_file(path: &Path, chunk_size: usize) -> io::Result<String> {
    let file = File::open(path)?;
    hash_reader(file, chunk_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EMPTY_DIGEST: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn empty_input_has_known_digest() {
        assert_eq!(hash_bytes(b""), EMPTY_DIGEST);
        assert_eq!(hash_reader(Cursor::new(Vec::new()), DEFAULT_CHUNK_SIZE).unwrap(), EMPTY_DIGEST);
    }

    #[test]
    fn known_vector() {
        assert_eq!(
            hash_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn chunk_size_does_not_change_digest() {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let expected = hash_bytes(&data);

        for chunk_size in [1, 7, 64, 4096, DEFAULT_CHUNK_SIZE, 8193, 1 << 20] {
            let digest = hash_reader(Cursor::new(&data), chunk_size).unwrap();
            assert_eq!(digest, expected, "chunk size {}", chunk_size);
        }
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        assert_eq!(hash_reader(Cursor::new(b"abc"), 0).unwrap(), hash_bytes(b"abc"));
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let digest = hash_bytes(b"uploadscan");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = hash_file(&dir.path().join("nope.bin"), DEFAULT_CHUNK_SIZE).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn file_digest_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        std::fs::write(&path, b"hello world").unwrap();
        assert_eq!(hash_file(&path, DEFAULT_CHUNK_SIZE).unwrap(), hash_bytes(b"hello world"));
    }
}
