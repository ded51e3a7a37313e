use crate::domain::error::{SessKitError, SessKitResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

/// Number of random bytes behind every session identifier
pub const SESSION_ID_BYTES: usize = 32;

/// Source of secure random bytes for identifier generation
pub trait EntropySource: Send + Sync {
    /// Fill `buf` completely or fail; partial output is never used
    fn fill(&self, buf: &mut [u8]) -> SessKitResult<()>;
}

/// Operating system RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> SessKitResult<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| SessKitError::Randomness(e.to_string()))
    }
}

/// Opaque, URL-safe session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh identifier from the OS RNG
    pub fn generate() -> SessKitResult<Self> {
        Self::generate_with(&OsEntropy)
    }

    /// Generate a fresh identifier from an explicit entropy source
    pub fn generate_with(source: &dyn EntropySource) -> SessKitResult<Self> {
        let mut raw = [0u8; SESSION_ID_BYTES];
        source.fill(&mut raw)?;
        Ok(Self(URL_SAFE_NO_PAD.encode(raw)))
    }

    /// Validate an identifier received from a client
    pub fn parse(value: &str) -> SessKitResult<Self> {
        let raw = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|e| SessKitError::CookieDecode(format!("invalid identifier encoding: {}", e)))?;

        if raw.len() != SESSION_ID_BYTES {
            return Err(SessKitError::CookieDecode(format!(
                "identifier decodes to {} bytes, expected {}",
                raw.len(),
                SESSION_ID_BYTES
            )));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw random bytes behind the identifier
    pub fn to_bytes(&self) -> Vec<u8> {
        // Constructors guarantee valid encoding
        URL_SAFE_NO_PAD.decode(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
