pub mod archive_builder;
pub mod artifact_resolver;
pub mod candidate_index;
pub mod identifier_extractor;
pub mod merge_planner;
pub mod naming;
pub mod report_writer;

pub use archive_builder::{ArchiveEntry, ArchiveResult};
pub use artifact_resolver::{ResolvedArtifact, ResolvedArtifactSet, ResolvedSource};
pub use candidate_index::CandidateIndex;
pub use identifier_extractor::{extract, Extraction};
pub use merge_planner::{MergeGroup, MergePair, MergePlan};
pub use report_writer::{CandidateReport, JsonlReportWriter, NoopReportSink, ReportSink};
