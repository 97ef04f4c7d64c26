//! Authentication building blocks: JWT access tokens, Argon2id password
//! hashing, and invitation token hashing.

pub mod jwt;
pub mod password;
