pub mod artifact;
pub mod candidate;
pub mod loaders;

pub use artifact::{ArtifactFile, DocumentType, MergedArtifact};
pub use candidate::CandidateRecord;
pub use loaders::{find_candidate_file, load_candidates};
