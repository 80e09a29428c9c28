pub mod candidate_loader;

pub use candidate_loader::{find_candidate_file, load_candidates, parse_candidates};
