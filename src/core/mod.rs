//! Core library components.
//!
//! Everything below the command line: the document model, the key agent and
//! the remote collaborators it talks to. Nothing in here prints or exits.

pub mod aws;
pub mod constants;
pub mod context;
pub mod document;
pub mod include;
pub mod kms;
pub mod mapping;
pub mod metadata;
pub mod services;
pub mod settings;
pub mod store;
pub mod value;
