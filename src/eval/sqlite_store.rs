// Evaluation store backed by SQLite.

use rusqlite::{params, Connection, ErrorCode, Row};

use crate::eval::*;

const TABLE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS evaluations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project TEXT,
    name TEXT,
    role TEXT,
    date TEXT,
    leadership REAL,
    attendance REAL,
    flexibility REAL,
    theory REAL,
    command REAL,
    control REAL,
    body_drag_left_right REAL,
    water_start REAL,
    board_left_right REAL,
    upwind REAL,
    average_score REAL,
    comments TEXT
);
"#;

const INSERT: &str = r#"
INSERT INTO evaluations
    (project, name, role, date, leadership, attendance, flexibility, theory, command, control,
     body_drag_left_right, water_start, board_left_right, upwind, average_score, comments)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
"#;

const SELECT_ALL: &str = r#"
SELECT id, project, name, role, date, leadership, attendance, flexibility, theory, command,
       control, body_drag_left_right, water_start, board_left_right, upwind, average_score,
       comments
FROM evaluations
ORDER BY id DESC
"#;

// Columns of SELECT_ALL
const FIRST_CRITERION_COL: usize = 5;
const AVERAGE_SCORE_COL: usize = FIRST_CRITERION_COL + Criterion::ALL.len();
const COMMENTS_COL: usize = AVERAGE_SCORE_COL + 1;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file and makes sure the table exists.
    pub fn open(path: &str) -> EvalResult<SqliteStore> {
        info!("Opening evaluation database {:?}", path);
        let conn = Connection::open(path).context(OpeningDatabaseSnafu { path })?;
        SqliteStore::from_connection(conn).context(StoreSnafu {})
    }

    pub fn from_connection(conn: Connection) -> Result<SqliteStore, StoreError> {
        conn.execute_batch(TABLE_SCHEMA).map_err(store_error)?;
        Ok(SqliteStore { conn })
    }
}

fn store_error(err: rusqlite::Error) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
            StoreError::Rejected(msg.unwrap_or_else(|| e.to_string()))
        }
        e => StoreError::Unavailable(e.to_string()),
    }
}

fn read_record(row: &Row) -> rusqlite::Result<EvaluationRecord> {
    let mut scores = Scores::default();
    for c in Criterion::ALL {
        scores.set(c, row.get(FIRST_CRITERION_COL + c.index())?);
    }
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    Ok(EvaluationRecord {
        id: row.get(0)?,
        project: text(1)?,
        name: text(2)?,
        role: text(3)?,
        date: text(4)?,
        scores,
        average_score: row.get(AVERAGE_SCORE_COL)?,
        comments: text(COMMENTS_COL)?,
    })
}

impl EvaluationStore for SqliteStore {
    fn insert(
        &mut self,
        draft: &EvaluationDraft,
        average_score: Option<f64>,
    ) -> Result<RecordId, StoreError> {
        let s = &draft.scores;
        self.conn
            .execute(
                INSERT,
                params![
                    draft.project,
                    draft.name,
                    draft.role,
                    draft.date,
                    s.get(Criterion::Leadership),
                    s.get(Criterion::Attendance),
                    s.get(Criterion::Flexibility),
                    s.get(Criterion::Theory),
                    s.get(Criterion::Command),
                    s.get(Criterion::Control),
                    s.get(Criterion::BodyDragLeftRight),
                    s.get(Criterion::WaterStart),
                    s.get(Criterion::BoardLeftRight),
                    s.get(Criterion::Upwind),
                    average_score,
                    draft.comments,
                ],
            )
            .map_err(store_error)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_all(&self) -> Result<Vec<EvaluationRecord>, StoreError> {
        let mut stmt = self.conn.prepare(SELECT_ALL).map_err(store_error)?;
        let rows = stmt
            .query_map([], read_record)
            .map_err(store_error)?
            .collect::<rusqlite::Result<Vec<EvaluationRecord>>>()
            .map_err(|e| StoreError::Corrupted(e.to_string()))?;
        debug!("list_all: {} records", rows.len());
        Ok(rows)
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        let tx = self.conn.transaction().map_err(store_error)?;
        tx.execute("DROP TABLE IF EXISTS evaluations", [])
            .map_err(store_error)?;
        tx.execute_batch(TABLE_SCHEMA).map_err(store_error)?;
        tx.commit().map_err(store_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::from_connection(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn draft(name: &str, scores: Scores) -> EvaluationDraft {
        EvaluationDraft {
            name: name.to_string(),
            role: "instructor".to_string(),
            date: "2024-02-10".to_string(),
            scores,
            comments: "steady".to_string(),
            ..EvaluationDraft::default()
        }
    }

    #[test]
    fn round_trip_through_the_table() {
        let mut store = store();
        let scores = Scores::default()
            .with(Criterion::Leadership, 72.5)
            .with(Criterion::Upwind, 90.0);
        let id = store.append(&draft("Ana", scores)).unwrap();
        let records = store.list_all().unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id, id);
        assert_eq!(r.project, DEFAULT_PROJECT);
        assert_eq!(r.name, "Ana");
        assert_eq!(r.role, "instructor");
        assert_eq!(r.date, "2024-02-10");
        assert_eq!(r.scores, scores);
        assert_eq!(r.average_score, Some(81.25));
        assert_eq!(r.comments, "steady");
    }

    #[test]
    fn select_columns_follow_the_table() {
        let store = store();
        let stmt = store.conn.prepare(SELECT_ALL).unwrap();
        let names = stmt.column_names();
        assert_eq!(names.len(), COMMENTS_COL + 1);
        for c in Criterion::ALL {
            assert_eq!(names[FIRST_CRITERION_COL + c.index()], c.column_name());
        }
        assert_eq!(names[AVERAGE_SCORE_COL], "average_score");
        assert_eq!(names[COMMENTS_COL], "comments");
        assert_eq!(names, export::export_headers());
    }

    #[test]
    fn ten_criteria_average() {
        let mut store = store();
        let mut scores = Scores::default();
        for (idx, c) in Criterion::ALL.iter().enumerate() {
            scores.set(*c, Some(10.0 * (idx + 1) as f64));
        }
        store.append(&draft("Ana", scores)).unwrap();
        assert_eq!(store.list_all().unwrap()[0].average_score, Some(55.0));
    }

    #[test]
    fn null_average_when_nothing_scored() {
        let mut store = store();
        store.append(&draft("Ana", Scores::default())).unwrap();
        assert_eq!(store.list_all().unwrap()[0].average_score, None);
    }

    #[test]
    fn newest_first() {
        let mut store = store();
        for name in ["first", "second", "third"] {
            store.append(&draft(name, Scores::default())).unwrap();
        }
        let records = store.list_all().unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
        assert!(records[0].id > records[1].id && records[1].id > records[2].id);
    }

    #[test]
    fn bulk_import_survives_a_rejected_row() {
        let mut store = store();
        store
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_marked BEFORE INSERT ON evaluations \
                 WHEN NEW.name = 'reject' \
                 BEGIN SELECT RAISE(ABORT, 'rejected by trigger'); END;",
            )
            .unwrap();
        let drafts: Vec<EvaluationDraft> = ["a", "b", "reject", "c", "d"]
            .iter()
            .map(|n| draft(n, Scores::uniform(50.0)))
            .collect();
        let report = store.append_bulk(&drafts);
        assert_eq!(report.success_count(), 4);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, 2);
        assert!(matches!(report.failures[0].error, StoreError::Rejected(_)));
        assert_eq!(store.list_all().unwrap().len(), 4);
    }

    #[test]
    fn reset_restarts_from_an_empty_table() {
        let mut store = store();
        store.append(&draft("a", Scores::default())).unwrap();
        store.append(&draft("b", Scores::default())).unwrap();
        store.reset().unwrap();
        assert!(store.list_all().unwrap().is_empty());
        // Dropping an AUTOINCREMENT table also drops its sequence.
        assert_eq!(store.append(&draft("c", Scores::default())).unwrap(), 1);
    }

    #[test]
    fn reopening_keeps_the_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evaluations.db").display().to_string();
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.append(&draft("Ana", Scores::uniform(70.0))).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.list_all().unwrap()[0].average_score, Some(70.0));
    }
}
