//! Cryptography module. Only password hashing lives here; the bcrypt primitive
//! itself comes from the `bcrypt` crate.

pub mod passwords;
