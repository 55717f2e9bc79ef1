//! Review bot comment export pipeline.
//!
//! Turns the four fetched comment streams into a deterministic, numbered
//! file tree: inline comments become resolvable issue files, general
//! comments and review summaries become discussion files, and a summary
//! index ties the set together.
//!
//! # Ordering
//!
//! Both sequences are chronological by creation timestamp and recomputed
//! on every run, so unchanged remote state yields byte-identical output.
//! Sequence numbers are not stable across runs once earlier comments
//! appear; that mirrors the source material and is a documented limitation.

pub mod classify;
pub mod model;
pub mod ordering;
pub mod reconcile;
pub mod render;
pub mod resolution;
pub mod run;
pub mod writer;

pub use classify::{Severity, classify};
pub use model::{Discussion, DiscussionKind, ExportCounts, ExportReport, ReviewIssue};
pub use reconcile::ThreadIndex;
pub use render::Renderer;
pub use resolution::{CONFIRMATION_MARKER, is_confirmed_resolved};
pub use run::{ExportBundle, ExportOptions, SourceStreams, assemble, run_export, write_bundle};
pub use writer::ExportWriter;
