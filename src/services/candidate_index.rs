use crate::models::CandidateRecord;
use std::collections::HashMap;

/// 候选人索引：编号 -> 候选人
///
/// 只收录编号非空的候选人；编号重复时保留第一次出现的记录，
/// `ordered()` 仍按输入顺序返回全部有效候选人。
#[derive(Debug)]
pub struct CandidateIndex<'a> {
    by_identifier: HashMap<&'a str, &'a CandidateRecord>,
    ordered: Vec<&'a CandidateRecord>,
}

impl<'a> CandidateIndex<'a> {
    pub fn build(candidates: &'a [CandidateRecord]) -> Self {
        let mut by_identifier = HashMap::with_capacity(candidates.len());
        let mut ordered = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if let Some(identifier) = candidate.identifier() {
                by_identifier.entry(identifier).or_insert(candidate);
                ordered.push(candidate);
            }
        }

        Self {
            by_identifier,
            ordered,
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&'a CandidateRecord> {
        self.by_identifier.get(identifier).copied()
    }

    pub fn display_name(&self, identifier: &str) -> Option<&'a str> {
        self.get(identifier).and_then(CandidateRecord::display_name)
    }

    /// 按输入顺序的有效候选人
    pub fn ordered(&self) -> &[&'a CandidateRecord] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_blank_identifiers_and_keeps_order() {
        let candidates = vec![
            CandidateRecord::new("S002", "Bob"),
            CandidateRecord::new("  ", "Nobody"),
            CandidateRecord {
                identifier: None,
                ..CandidateRecord::default()
            },
            CandidateRecord::new(" S001 ", "Alice"),
        ];
        let index = CandidateIndex::build(&candidates);

        assert_eq!(index.len(), 2);
        let ids: Vec<_> = index.ordered().iter().filter_map(|c| c.identifier()).collect();
        assert_eq!(ids, vec!["S002", "S001"]);
        assert_eq!(index.display_name("S001"), Some("Alice"));
        assert!(index.get("Nobody").is_none());
    }

    #[test]
    fn test_duplicate_identifier_first_wins() {
        let candidates = vec![
            CandidateRecord::new("S001", "First"),
            CandidateRecord::new("S001", "Second"),
        ];
        let index = CandidateIndex::build(&candidates);

        assert_eq!(index.display_name("S001"), Some("First"));
        assert_eq!(index.len(), 2);
    }
}
