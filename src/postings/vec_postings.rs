use crate::docset::{DocSet, TERMINATED};
use crate::DocId;

/// Posting cursor over a sorted, deduplicated `Vec<DocId>`.
///
/// `seek` is a galloping search from the current position, so skipping over
/// a large gap does not touch every skipped document.
pub struct VecDocSet {
    doc_ids: Vec<DocId>,
    cursor: usize,
}

impl From<Vec<DocId>> for VecDocSet {
    fn from(doc_ids: Vec<DocId>) -> VecDocSet {
        debug_assert!(
            doc_ids.windows(2).all(|w| w[0] < w[1]),
            "doc ids must be strictly increasing"
        );
        VecDocSet { doc_ids, cursor: 0 }
    }
}

impl DocSet for VecDocSet {
    fn advance(&mut self) -> DocId {
        if self.cursor < self.doc_ids.len() {
            self.cursor += 1;
        }
        self.doc()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        let remaining = &self.doc_ids[self.cursor..];
        // Gallop to find an upper bound, then binary search within it.
        let mut bound = 1;
        while bound < remaining.len() && remaining[bound] < target {
            bound *= 2;
        }
        let end = remaining.len().min(bound + 1);
        self.cursor += remaining[..end].partition_point(|&doc| doc < target);
        self.doc()
    }

    fn doc(&self) -> DocId {
        self.doc_ids.get(self.cursor).copied().unwrap_or(TERMINATED)
    }

    fn size_hint(&self) -> u32 {
        self.doc_ids.len() as u32
    }
}

#[cfg(test)]
pub mod tests {

    use super::*;
    use crate::docset::{DocSet, TERMINATED};
    use crate::postings::tests::test_skip_against_unoptimized;
    use crate::DocId;

    #[test]
    pub fn test_vec_postings() {
        let doc_ids: Vec<DocId> = (0u32..1024u32).map(|e| e * 3).collect();
        let mut postings = VecDocSet::from(doc_ids);
        assert_eq!(postings.doc(), 0u32);
        assert_eq!(postings.advance(), 3u32);
        assert_eq!(postings.doc(), 3u32);
        assert_eq!(postings.seek(14u32), 15u32);
        assert_eq!(postings.doc(), 15u32);
        assert_eq!(postings.seek(300u32), 300u32);
        assert_eq!(postings.doc(), 300u32);
        assert_eq!(postings.seek(6000u32), TERMINATED);
        assert_eq!(postings.advance(), TERMINATED);
    }

    #[test]
    pub fn test_empty_vec_postings() {
        let mut postings = VecDocSet::from(Vec::new());
        assert_eq!(postings.doc(), TERMINATED);
        assert_eq!(postings.advance(), TERMINATED);
        assert_eq!(postings.seek(TERMINATED), TERMINATED);
    }

    #[test]
    pub fn test_vec_postings_seek_current_doc_is_noop() {
        let mut postings = VecDocSet::from(vec![4, 8, 12]);
        assert_eq!(postings.advance(), 8);
        assert_eq!(postings.seek(8), 8);
        assert_eq!(postings.advance(), 12);
    }

    #[test]
    pub fn test_vec_postings_skip_against_unoptimized() {
        let doc_ids: Vec<DocId> = crate::tests::sample_with_seed(10_000, 0.05, 2);
        let targets = vec![0, 1, 2, 63, 64, 65, 1_000, 4_095, 4_096, 9_999, 10_000];
        test_skip_against_unoptimized(
            || Box::new(VecDocSet::from(doc_ids.clone())),
            targets,
        );
    }
}
