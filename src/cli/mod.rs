//! CLI operation handlers.
//!
//! The only operation is the comment export in [`export_comments`]; the
//! entrypoint in `main.rs` handles configuration loading, log sink setup,
//! and exit codes.

pub mod export_comments;
