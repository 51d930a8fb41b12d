//! Streaming file hasher.
//!
//! # Overview
//! This module provides the [`Hasher`] struct for computing content digests
//! of whole files without loading them into memory. Files are read in
//! fixed-size blocks and fed into an incremental digest.
//!
//! Two algorithms are supported, both producing 32-byte digests:
//! - SHA-256 (default)
//! - BLAKE3

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::HashError;

/// Size of each read when streaming a file into the digest (1 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

/// A 32-byte content digest.
pub type Hash = [u8; 32];

/// Digest algorithm used to fingerprint file content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// BLAKE3
    Blake3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "SHA-256"),
            Self::Blake3 => write!(f, "BLAKE3"),
        }
    }
}

/// Incremental digest state for one file.
enum Accumulator {
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl Accumulator {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(chunk),
            Self::Blake3(h) => {
                h.update(chunk);
            }
        }
    }

    fn finalize(self) -> Hash {
        match self {
            Self::Sha256(h) => h.finalize().into(),
            Self::Blake3(h) => *h.finalize().as_bytes(),
        }
    }
}

/// Streaming content hasher.
///
/// Equal byte content always produces equal digests, independent of file
/// name, timestamps or permissions.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    block_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a SHA-256 hasher with the default block size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    /// Use a different digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Use a different read block size. Zero is bumped to one byte.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    /// The configured algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] if the file cannot be opened or a read fails
    /// part way through (permission denied, file removed, I/O error).
    pub fn hash_file(&self, path: &Path) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file)
            .map_err(|e| HashError::from_io(path, e))
    }

    /// Hash everything readable from `reader`, one block at a time.
    pub(crate) fn hash_reader<R: Read>(&self, mut reader: R) -> std::io::Result<Hash> {
        let mut acc = Accumulator::new(self.algorithm);
        let mut buffer = vec![0u8; self.block_size];

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            acc.update(&buffer[..n]);
        }

        Ok(acc.finalize())
    }
}

/// Render a digest as lowercase hex.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    use std::fmt::Write;

    hash.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
