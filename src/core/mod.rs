//! Core validation pipeline

pub mod aggregator;
pub mod config;
pub mod entry;
pub mod error;
pub mod image_header;
pub mod manifest;
pub mod validator;
