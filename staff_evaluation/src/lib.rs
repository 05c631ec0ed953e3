/*!
Core of the kitesurfing staff evaluation tool.

An evaluation scores one person, on one date, on ten criteria (leadership,
attendance, kite control, water start, ...). Evaluations come either from a
direct entry, where every criterion is filled, or from spreadsheets whose
headers follow no particular convention.

- [`reconcile`] turns spreadsheet rows into [`EvaluationDraft`]s.
- [`store`] defines the append-only [`EvaluationStore`] contract, along with
  an in-memory implementation.
- [`aggregate`] computes the summary statistics.

```
use staff_evaluation::*;

let mut store = MemoryStore::new();
let draft = EvaluationDraft {
    name: "Ana".to_string(),
    role: "instructor".to_string(),
    scores: Scores::uniform(80.0),
    ..EvaluationDraft::default()
};
store.append(&draft)?;

let summary = summarize(&store.list_all()?);
assert_eq!(summary.overall_mean, Some(80.0));
# Ok::<(), StoreError>(())
```

See the [`manual`] for the accepted spreadsheet headers.
*/

mod model;

pub mod aggregate;
pub mod manual;
pub mod reconcile;
pub mod store;

pub use crate::aggregate::{summarize, RoleCriteriaMeans, RoleMean, Summary};
pub use crate::model::*;
pub use crate::reconcile::{reconcile_row, reconcile_rows, CellValue, RawRow};
pub use crate::store::{BulkImportReport, EvaluationStore, MemoryStore, RowFailure};
