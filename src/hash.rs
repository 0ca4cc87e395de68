use crate::error::CanonicalizationError;
use base16ct::lower::encode_str;
use digest::Digest;
use sha2::{Sha256, Sha384, Sha512};
use std::{fmt, str::FromStr};

/// The message digest algorithm used to hash canonical n-quads.
///
/// SHA-256 is the hash algorithm of RDFC-1.0 and the only choice that
/// produces interoperable canonical labels; the others are provided for
/// experimentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl FromStr for HashAlgorithm {
    type Err = CanonicalizationError;

    /// Accepts both the bare (`sha256`) and hyphenated (`SHA-256`)
    /// spellings, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(CanonicalizationError::UnknownHashAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Sha384 => write!(f, "sha384"),
            Self::Sha512 => write!(f, "sha512"),
        }
    }
}

/// **hash**
///   The lowercase, hexadecimal representation of a message digest.
pub fn hash(
    algorithm: HashAlgorithm,
    data: impl AsRef<[u8]>,
) -> Result<String, CanonicalizationError> {
    match algorithm {
        HashAlgorithm::Sha256 => digest_hex::<Sha256>(data),
        HashAlgorithm::Sha384 => digest_hex::<Sha384>(data),
        HashAlgorithm::Sha512 => digest_hex::<Sha512>(data),
    }
}

fn digest_hex<D: Digest>(data: impl AsRef<[u8]>) -> Result<String, CanonicalizationError> {
    // large enough for the widest supported digest (SHA-512, 64 bytes)
    const HASH_BUF_LEN: usize = 128;

    let hash = D::digest(data);
    let mut buf = [0u8; HASH_BUF_LEN];
    match encode_str(&hash, &mut buf) {
        Ok(h) => Ok(h.to_string()),
        Err(e) => Err(CanonicalizationError::Base16EncodingFailed(e)),
    }
}
