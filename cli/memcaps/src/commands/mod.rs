//! CLI command implementations.

pub mod doctor;
pub mod init;
pub mod layout;
pub mod profile;
pub mod resolve;
