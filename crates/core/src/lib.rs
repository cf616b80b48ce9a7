//! Litrev Core - shared foundations for the literature review generator.
//!
//! This crate contains the pieces every other litrev crate leans on:
//! the credential store seam and the text cleaning helpers used on
//! extracted PDF text and model output.

pub mod secrets;
pub mod text;

pub use secrets::{CredentialStore, EnvCredentialStore, MemoryCredentialStore};
