//! Archive checksum utilities
//!
//! Checksums use the canonical `<algorithm>:<hex>` form (`sha256:...`,
//! `md5:...`). Files are hashed in fixed-size chunks so multi-gigabyte
//! archives are never loaded whole.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use md5::Md5;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Read size used when hashing files
const CHUNK_SIZE: usize = 8192;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Sha256,
    Md5,
}

impl Algorithm {
    /// Prefix used in the canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Md5 => "md5",
        }
    }

    /// Length of a hex-encoded digest.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Md5 => 32,
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_ascii_lowercase().as_str() {
            "sha256" => Some(Self::Sha256),
            "md5" => Some(Self::Md5),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expected or computed digest together with its algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum {
    algorithm: Algorithm,
    hex: String,
}

impl Checksum {
    /// Build a checksum from an algorithm and a hex digest.
    pub fn new(algorithm: Algorithm, hex: impl Into<String>) -> Result<Self> {
        let hex = hex.into().to_ascii_lowercase();
        if hex.len() != algorithm.hex_len() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidChecksum {
                value: hex,
                reason: format!(
                    "expected {} hex characters for {}",
                    algorithm.hex_len(),
                    algorithm
                ),
            });
        }
        Ok(Self { algorithm, hex })
    }

    /// Parse `sha256:<hex>`, `md5:<hex>` or a bare hex digest.
    ///
    /// A bare digest is attributed by length: 64 characters is SHA-256,
    /// 32 characters is MD5.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        match value.split_once(':') {
            Some((prefix, hex)) => {
                let algorithm =
                    Algorithm::from_prefix(prefix).ok_or_else(|| Error::InvalidChecksum {
                        value: value.to_string(),
                        reason: format!("unknown algorithm '{prefix}'"),
                    })?;
                Self::new(algorithm, hex)
            }
            None => {
                let algorithm = match value.len() {
                    64 => Algorithm::Sha256,
                    32 => Algorithm::Md5,
                    _ => {
                        return Err(Error::InvalidChecksum {
                            value: value.to_string(),
                            reason: "cannot infer algorithm from digest length".to_string(),
                        });
                    }
                };
                Self::new(algorithm, value)
            }
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Hash `path` with this checksum's algorithm and compare.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn verify_file(&self, path: &Path) -> io::Result<bool> {
        let actual = compute_file_checksum(path, self.algorithm)?;
        Ok(actual == *self)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

impl FromStr for Checksum {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Checksum {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Checksum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn hash_reader<D: Digest>(mut reader: impl Read) -> io::Result<String>
where
    sha2::digest::Output<D>: fmt::LowerHex,
{
    let mut hasher = D::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compute the checksum of in-memory content.
pub fn compute_content_checksum(content: &[u8], algorithm: Algorithm) -> Checksum {
    let hex = match algorithm {
        Algorithm::Sha256 => format!("{:x}", Sha256::digest(content)),
        Algorithm::Md5 => format!("{:x}", Md5::digest(content)),
    };
    Checksum { algorithm, hex }
}

/// Compute the checksum of a file's contents, reading it in chunks.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn compute_file_checksum(path: &Path, algorithm: Algorithm) -> io::Result<Checksum> {
    let file = File::open(path)?;
    let hex = match algorithm {
        Algorithm::Sha256 => hash_reader::<Sha256>(file)?,
        Algorithm::Md5 => hash_reader::<Md5>(file)?,
    };
    Ok(Checksum { algorithm, hex })
}
