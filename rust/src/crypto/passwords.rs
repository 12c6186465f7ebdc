//! Password hashing built around bcrypt.
//! Bcrypt keys are limited to 72 bytes, so every password is cut down to a
//! UTF-8 safe prefix of at most that many bytes before it reaches the hasher.

use tracing::warn;

/// Maximum number of password bytes bcrypt takes into account.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Work factor used when no cost is configured.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// The hashing primitive the encoder delegates to.
pub trait PasswordHasher: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Hashes a password of at most [`MAX_PASSWORD_BYTES`] bytes.
    fn hash(&self, password: &str) -> Result<String, Self::Error>;

    /// Checks a password against a hash produced by [`PasswordHasher::hash`].
    fn verify(&self, password: &str, encoded: &str) -> Result<bool, Self::Error>;
}

/// Plain bcrypt with a fixed cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    type Error = bcrypt::BcryptError;

    fn hash(&self, password: &str) -> Result<String, Self::Error> {
        bcrypt::hash(password, self.cost)
    }

    fn verify(&self, password: &str, encoded: &str) -> Result<bool, Self::Error> {
        bcrypt::verify(password, encoded)
    }
}

/// Returns the longest prefix of `raw` that fits in [`MAX_PASSWORD_BYTES`]
/// bytes without splitting a character. Inputs that already fit come back
/// unchanged.
pub fn truncate_password(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() <= MAX_PASSWORD_BYTES {
        return raw;
    }
    match std::str::from_utf8(&bytes[..MAX_PASSWORD_BYTES]) {
        Ok(prefix) => prefix,
        // The window can only end inside a character, never contain garbage.
        Err(err) => &raw[..err.valid_up_to()],
    }
}

/// Bcrypt encoder that truncates overlong passwords instead of rejecting them,
/// logging a warning each time it does so.
#[derive(Debug, Clone, Default)]
pub struct TruncatingBcryptEncoder<H = BcryptHasher> {
    hasher: H,
}

impl TruncatingBcryptEncoder<BcryptHasher> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cost(cost: u32) -> Self {
        Self::with_hasher(BcryptHasher::new(cost))
    }
}

impl<H: PasswordHasher> TruncatingBcryptEncoder<H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Hashes the (possibly truncated) password. Hasher errors are returned
    /// as-is.
    pub fn hash(&self, raw: &str) -> Result<String, H::Error> {
        self.hasher.hash(truncate_logged(raw))
    }

    /// Verifies the (possibly truncated) password against `encoded`.
    ///
    /// A mismatch is `Ok(false)`. A malformed `encoded` value yields whatever
    /// error the hasher reports for it. The truncation warning is emitted
    /// regardless of the outcome.
    pub fn verify(&self, raw: &str, encoded: &str) -> Result<bool, H::Error> {
        self.hasher.verify(truncate_logged(raw), encoded)
    }

    /// Like [`Self::verify`], but any hasher error counts as a mismatch.
    pub fn matches(&self, raw: &str, encoded: &str) -> bool {
        self.verify(raw, encoded).unwrap_or(false)
    }
}

fn truncate_logged(raw: &str) -> &str {
    let truncated = truncate_password(raw);
    if truncated.len() < raw.len() {
        warn!(
            original_bytes = raw.len(),
            limit = MAX_PASSWORD_BYTES,
            truncated_bytes = truncated.len(),
            "Password length of {} bytes exceeds BCrypt limit of {} bytes; truncated to {} bytes.",
            raw.len(),
            MAX_PASSWORD_BYTES,
            truncated.len()
        );
    }
    truncated
}
