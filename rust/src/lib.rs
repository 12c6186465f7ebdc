//! Password hashing and input conversion helpers for web back ends.
//! The bcrypt encoder truncates overlong passwords to a UTF-8 safe prefix
//! rather than failing, and the converters turn request strings into
//! `chrono` values.

pub mod config;
pub mod convert;
pub mod crypto;

#[cfg(test)]
mod test_support;
