//! Candidate list for the pending composition.
//!
//! The engine owns ranking and chooses what a commit applies, so the list is
//! display state only: the texts in engine order. It is replaced after every
//! edit, cleared after a commit, and left alone by cursor movement.

/// Candidate texts, best first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateList {
    candidates: Vec<String>,
}

impl CandidateList {
    /// Create a new empty candidate list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candidates.
    pub fn set_candidates(&mut self, candidates: Vec<String>) {
        self.candidates = candidates;
    }

    /// Get all candidates.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// The candidate a commit applies.
    pub fn best(&self) -> Option<&str> {
        self.candidates.first().map(String::as_str)
    }

    /// Get the total number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Clear the candidate list.
    pub fn clear(&mut self) {
        self.candidates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_no_best() {
        let list = CandidateList::new();
        assert!(list.is_empty());
        assert_eq!(list.best(), None);
    }

    #[test]
    fn best_is_first_in_engine_order() {
        let mut list = CandidateList::new();
        list.set_candidates(vec!["漢字".to_string(), "感じ".to_string()]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.best(), Some("漢字"));

        list.set_candidates(vec!["幹事".to_string()]);
        assert_eq!(list.candidates(), ["幹事"]);

        list.clear();
        assert!(list.is_empty());
    }
}
