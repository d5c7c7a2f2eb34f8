//! Intermediate representation of catalog messages.

pub mod key;
pub mod translation;
