use log::{debug, info, warn};

use crate::model::*;

/// A row of a bulk import that the store refused.
#[derive(PartialEq, Debug, Clone)]
pub struct RowFailure {
    /// Position of the row in the imported batch, starting at 0.
    pub row: usize,
    pub error: StoreError,
}

/// Outcome of a best-effort bulk import.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct BulkImportReport {
    pub imported: Vec<RecordId>,
    pub failures: Vec<RowFailure>,
}

impl BulkImportReport {
    pub fn success_count(&self) -> usize {
        self.imported.len()
    }

    fn record(&mut self, row: usize, res: Result<RecordId, StoreError>) {
        match res {
            Ok(id) => self.imported.push(id),
            Err(error) => {
                warn!("append_bulk: could not import row {}: {}", row, error);
                self.failures.push(RowFailure { row, error });
            }
        }
    }
}

/// Append-only collection of evaluations.
///
/// Implementors only provide the raw `insert`: the derived average is always
/// computed here, so every backend stores the same value.
pub trait EvaluationStore {
    /// Persists a draft together with its precomputed average and returns the
    /// fresh id. The id must be greater than every id handed out before.
    fn insert(
        &mut self,
        draft: &EvaluationDraft,
        average_score: Option<f64>,
    ) -> Result<RecordId, StoreError>;

    /// All the records, most recent first.
    fn list_all(&self) -> Result<Vec<EvaluationRecord>, StoreError>;

    /// Drops every record. Irreversible.
    fn reset(&mut self) -> Result<(), StoreError>;

    fn append(&mut self, draft: &EvaluationDraft) -> Result<RecordId, StoreError> {
        let average_score = draft.scores.average();
        let id = self.insert(draft, average_score)?;
        debug!("append: id {} average {:?}", id, average_score);
        Ok(id)
    }

    /// Appends every draft independently. A failing row is reported and
    /// skipped; the remaining rows are still appended.
    fn append_bulk(&mut self, drafts: &[EvaluationDraft]) -> BulkImportReport {
        let mut report = BulkImportReport::default();
        for (idx, draft) in drafts.iter().enumerate() {
            let res = self.append(draft);
            report.record(idx, res);
        }
        info!(
            "append_bulk: {} rows imported, {} rejected",
            report.success_count(),
            report.failures.len()
        );
        report
    }
}

/// Keeps the evaluations in memory. Mostly useful for tests and one-shot
/// reports over an input file.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    records: Vec<EvaluationRecord>,
    next_id: RecordId,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore {
            records: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl EvaluationStore for MemoryStore {
    fn insert(
        &mut self,
        draft: &EvaluationDraft,
        average_score: Option<f64>,
    ) -> Result<RecordId, StoreError> {
        let id = self.next_id;
        self.next_id += 1;
        self.records
            .push(EvaluationRecord::from_draft(id, draft, average_score));
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<EvaluationRecord>, StoreError> {
        let mut res = self.records.clone();
        res.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(res)
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        self.next_id = 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn draft(name: &str) -> EvaluationDraft {
        EvaluationDraft {
            name: name.to_string(),
            ..EvaluationDraft::default()
        }
    }

    // Rejects the rows whose name is "reject".
    struct PickyStore {
        inner: MemoryStore,
    }

    impl EvaluationStore for PickyStore {
        fn insert(
            &mut self,
            draft: &EvaluationDraft,
            average_score: Option<f64>,
        ) -> Result<RecordId, StoreError> {
            if draft.name == "reject" {
                return Err(StoreError::Rejected("constraint failed".to_string()));
            }
            self.inner.insert(draft, average_score)
        }

        fn list_all(&self) -> Result<Vec<EvaluationRecord>, StoreError> {
            self.inner.list_all()
        }

        fn reset(&mut self) -> Result<(), StoreError> {
            self.inner.reset()
        }
    }

    #[test]
    fn average_of_all_ten_criteria() {
        let mut store = MemoryStore::new();
        let mut d = draft("Ana");
        for (idx, c) in Criterion::ALL.iter().enumerate() {
            d.scores.set(*c, Some(10.0 * (idx + 1) as f64));
        }
        store.append(&d).unwrap();
        let records = store.list_all().unwrap();
        assert_eq!(records[0].average_score, Some(55.0));
    }

    #[test]
    fn average_of_partial_criteria() {
        let mut store = MemoryStore::new();
        let d = EvaluationDraft {
            scores: Scores::default()
                .with(Criterion::Theory, 70.0)
                .with(Criterion::Upwind, 80.0),
            ..draft("Bia")
        };
        store.append(&d).unwrap();
        assert_eq!(store.list_all().unwrap()[0].average_score, Some(75.0));
    }

    #[test]
    fn no_criteria_gives_no_average() {
        let mut store = MemoryStore::new();
        store.append(&draft("Caio")).unwrap();
        let records = store.list_all().unwrap();
        assert_eq!(records[0].average_score, None);
    }

    #[test]
    fn list_all_is_most_recent_first() {
        let mut store = MemoryStore::new();
        let a = store.append(&draft("first")).unwrap();
        let b = store.append(&draft("second")).unwrap();
        let c = store.append(&draft("third")).unwrap();
        assert!(a < b && b < c);
        let names: Vec<String> = store
            .list_all()
            .unwrap()
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut store = MemoryStore::new();
        store.append(&draft("Ana")).unwrap();
        store.append(&draft("Ana")).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn bulk_import_skips_failing_rows() {
        init_logs();
        let mut store = PickyStore {
            inner: MemoryStore::new(),
        };
        store.append(&draft("already there")).unwrap();
        let drafts = vec![draft("a"), draft("b"), draft("reject"), draft("c")];
        let report = store.append_bulk(&drafts);
        assert_eq!(report.success_count(), 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, 2);
        assert_eq!(store.list_all().unwrap().len(), 4);
    }

    #[test]
    fn reset_empties_the_store() {
        let mut store = MemoryStore::new();
        store.append(&draft("a")).unwrap();
        store.append(&draft("b")).unwrap();
        store.reset().unwrap();
        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(store.append(&draft("c")).unwrap(), 1);
    }
}
