use crate::error::CanonicalizationError;
use crate::hash::HashAlgorithm;
use serde::Deserialize;
use std::{env, fs, path::Path};

/// Default and maximum value for the complexity factor. The n-degree call
/// budget of a canonicalization is `complexity_factor x |blank nodes|`.
pub const DEFAULT_COMPLEXITY_FACTOR: usize = 50;
pub const MAXIMUM_COMPLEXITY_FACTOR: usize = 50;

/// Name of the optional JSON configuration file, looked up in the user's
/// home directory and then in the working directory.
pub const CONFIG_FILE_NAME: &str = ".rdfc10.json";

/// Environment variables overriding the configuration files.
pub const ENV_HASH_ALGORITHM: &str = "c14n_hash";
pub const ENV_COMPLEXITY_FACTOR: &str = "c14n_complexity";

/// Options consumed by the `_with` family of canonicalization functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanonicalizationOptions {
    /// Hash algorithm for first-degree, related and n-degree hashes.
    /// Interoperable canonical output requires SHA-256.
    pub hash_algorithm: HashAlgorithm,
    /// Multiplier for the n-degree call budget, in `1..=50`.
    pub complexity_factor: usize,
}

impl Default for CanonicalizationOptions {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::default(),
            complexity_factor: DEFAULT_COMPLEXITY_FACTOR,
        }
    }
}

impl CanonicalizationOptions {
    pub fn validate(&self) -> Result<(), CanonicalizationError> {
        if self.complexity_factor == 0 {
            return Err(CanonicalizationError::InvalidConfiguration(
                "complexity factor must be a positive integer".to_string(),
            ));
        }
        if self.complexity_factor > MAXIMUM_COMPLEXITY_FACTOR {
            return Err(CanonicalizationError::InvalidConfiguration(format!(
                "complexity factor {} exceeds the maximum of {}",
                self.complexity_factor, MAXIMUM_COMPLEXITY_FACTOR
            )));
        }
        Ok(())
    }

    /// Resolves options from the layered sources, least to most specific:
    /// built-in defaults, then `.rdfc10.json` in the home directory, then
    /// the same file in the working directory, then the `c14n_hash` and
    /// `c14n_complexity` environment variables. Later sources win.
    pub fn load() -> Result<Self, CanonicalizationError> {
        let mut raw = RawConfig::default();
        if let Some(home) = env::var_os("HOME") {
            raw.merge(RawConfig::from_file(
                &Path::new(&home).join(CONFIG_FILE_NAME),
            ));
        }
        raw.merge(RawConfig::from_file(Path::new(CONFIG_FILE_NAME)));
        raw.merge(RawConfig::from_env());
        raw.resolve()
    }
}

/// One partially-specified configuration source.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawConfig {
    #[serde(default)]
    c14n_hash: Option<String>,
    #[serde(default)]
    c14n_complexity: Option<ComplexityValue>,
}

/// The complexity factor arrives as a JSON number from configuration files
/// and as a string from the environment.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ComplexityValue {
    Number(usize),
    Text(String),
}

impl ComplexityValue {
    fn resolve(&self) -> Result<usize, CanonicalizationError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s.parse().map_err(|_| {
                CanonicalizationError::InvalidConfiguration(format!(
                    "complexity factor `{s}` is not a positive integer"
                ))
            }),
        }
    }
}

impl RawConfig {
    /// An unreadable or syntactically invalid file contributes nothing;
    /// only the resolved values are validated.
    fn from_file(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    fn from_env() -> Self {
        Self {
            c14n_hash: env::var(ENV_HASH_ALGORITHM).ok(),
            c14n_complexity: env::var(ENV_COMPLEXITY_FACTOR).ok().map(ComplexityValue::Text),
        }
    }

    fn merge(&mut self, more_specific: Self) {
        if more_specific.c14n_hash.is_some() {
            self.c14n_hash = more_specific.c14n_hash;
        }
        if more_specific.c14n_complexity.is_some() {
            self.c14n_complexity = more_specific.c14n_complexity;
        }
    }

    fn resolve(self) -> Result<CanonicalizationOptions, CanonicalizationError> {
        let mut options = CanonicalizationOptions::default();
        if let Some(name) = self.c14n_hash {
            options.hash_algorithm = name.parse()?;
        }
        if let Some(factor) = &self.c14n_complexity {
            options.complexity_factor = factor.resolve()?;
        }
        options.validate()?;
        Ok(options)
    }
}
