//! Credentials and tokens.
//!
//! [`password`] hashes member passwords with Argon2id; [`jwt`] issues the
//! bearer access tokens and the rotating refresh tokens handed out at login.

pub mod jwt;
pub mod password;
