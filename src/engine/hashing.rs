//! File hashing utilities

use sha2::Digest as _;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::utils::config::HashingConsts;
use crate::{Digest, DirDiffError, HashAlgorithm};

/// Streaming hasher over the supported algorithms.
pub enum ContentHasher {
    Blake3(Box<blake3::Hasher>),
    Sha256(sha2::Sha256),
}

impl ContentHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Blake3 => ContentHasher::Blake3(Box::new(blake3::Hasher::new())),
            HashAlgorithm::Sha256 => ContentHasher::Sha256(sha2::Sha256::new()),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            ContentHasher::Blake3(h) => {
                h.update(data);
            }
            ContentHasher::Sha256(h) => h.update(data),
        }
    }

    pub fn finalize(self) -> Digest {
        match self {
            ContentHasher::Blake3(h) => *h.finalize().as_bytes(),
            ContentHasher::Sha256(h) => h.finalize().into(),
        }
    }
}

/// Reject read sizes of zero or above [`HashingConsts::MAX_CHUNK_SIZE`]. Each worker allocates one
/// buffer of this size.
pub fn check_chunk_size(chunk_size: usize) -> Result<(), DirDiffError> {
    if chunk_size == 0 || chunk_size > HashingConsts::MAX_CHUNK_SIZE {
        return Err(DirDiffError::Config(format!(
            "chunk size must be between 1 and {} bytes, got {}",
            HashingConsts::MAX_CHUNK_SIZE,
            chunk_size
        )));
    }
    Ok(())
}

/// Hash a file with the default 1 MB read chunk.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<Digest, DirDiffError> {
    hash_file_chunked(path, algorithm, HashingConsts::HASH_READ_CHUNK_SIZE)
}

/// Hash a file by streaming it through the hasher `chunk_size` bytes at a time.
/// Only one chunk is held in memory.
pub fn hash_file_chunked(
    path: &Path,
    algorithm: HashAlgorithm,
    chunk_size: usize,
) -> Result<Digest, DirDiffError> {
    check_chunk_size(chunk_size)?;
    let io_err = |source| DirDiffError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_err)?;
    let mut hasher = ContentHasher::new(algorithm);
    let mut buffer = vec![0u8; chunk_size];
    loop {
        let n = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_err(e)),
        };
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize())
}

/// Lowercase hex rendering of a digest (for logs and JSON).
pub fn digest_hex(digest: &Digest) -> String {
    hex::encode(digest)
}
