pub mod artifact_store;
pub mod pdf_merger;
pub mod workspace;

pub use artifact_store::ArtifactStore;
pub use pdf_merger::{DocumentMerger, PdfMerger};
pub use workspace::BatchWorkspace;
