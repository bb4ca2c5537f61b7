//! Directory scanning and reconciliation

pub mod extraneous;
pub mod pack_scanner;

pub use extraneous::{check_extraneous, find_extraneous};
pub use pack_scanner::{collect_pack_dirs, pack_key};
