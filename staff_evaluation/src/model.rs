// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The program name used when a record does not mention any project.
pub const DEFAULT_PROJECT: &str = "KITE FOR LIFE";

/// The ten scored criteria of an evaluation.
///
/// The declaration order is the column order used for storage and export.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Criterion {
    Leadership,
    Attendance,
    Flexibility,
    Theory,
    Command,
    Control,
    BodyDragLeftRight,
    WaterStart,
    BoardLeftRight,
    Upwind,
}

impl Criterion {
    pub const ALL: [Criterion; 10] = [
        Criterion::Leadership,
        Criterion::Attendance,
        Criterion::Flexibility,
        Criterion::Theory,
        Criterion::Command,
        Criterion::Control,
        Criterion::BodyDragLeftRight,
        Criterion::WaterStart,
        Criterion::BoardLeftRight,
        Criterion::Upwind,
    ];

    /// Position of the criterion in [`Criterion::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The canonical column name, as stored and exported.
    pub fn column_name(self) -> &'static str {
        match self {
            Criterion::Leadership => "leadership",
            Criterion::Attendance => "attendance",
            Criterion::Flexibility => "flexibility",
            Criterion::Theory => "theory",
            Criterion::Command => "command",
            Criterion::Control => "control",
            Criterion::BodyDragLeftRight => "body_drag_left_right",
            Criterion::WaterStart => "water_start",
            Criterion::BoardLeftRight => "board_left_right",
            Criterion::Upwind => "upwind",
        }
    }

    /// Human readable label for reports.
    pub fn label(self) -> &'static str {
        match self {
            Criterion::Leadership => "Leadership",
            Criterion::Attendance => "Attendance",
            Criterion::Flexibility => "Flexibility",
            Criterion::Theory => "Theory",
            Criterion::Command => "Kite command",
            Criterion::Control => "Kite control",
            Criterion::BodyDragLeftRight => "Body drag left/right",
            Criterion::WaterStart => "Water start",
            Criterion::BoardLeftRight => "Board left/right",
            Criterion::Upwind => "Upwind",
        }
    }
}

/// The score of each criterion, possibly missing.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct Scores([Option<f64>; 10]);

impl Scores {
    /// All ten criteria set to the same value.
    pub fn uniform(value: f64) -> Scores {
        Scores([Some(value); 10])
    }

    pub fn get(&self, criterion: Criterion) -> Option<f64> {
        self.0[criterion.index()]
    }

    pub fn set(&mut self, criterion: Criterion, value: Option<f64>) {
        self.0[criterion.index()] = value;
    }

    pub fn with(mut self, criterion: Criterion, value: f64) -> Scores {
        self.set(criterion, Some(value));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, Option<f64>)> + '_ {
        Criterion::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// The values of the criteria that are present.
    pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().filter_map(|x| *x)
    }

    /// Arithmetic mean of the criteria that are present.
    ///
    /// Returns `None` (never zero or NaN) when no criterion is present.
    pub fn average(&self) -> Option<f64> {
        mean(self.present())
    }
}

/// An evaluation as entered or imported, before the store assigns an id
/// and derives the average.
#[derive(PartialEq, Debug, Clone)]
pub struct EvaluationDraft {
    pub project: String,
    pub name: String,
    pub role: String,
    /// ISO-8601 for direct entries, the raw cell text for imported rows.
    pub date: String,
    pub scores: Scores,
    pub comments: String,
}

impl Default for EvaluationDraft {
    fn default() -> Self {
        EvaluationDraft {
            project: DEFAULT_PROJECT.to_string(),
            name: String::new(),
            role: String::new(),
            date: String::new(),
            scores: Scores::default(),
            comments: String::new(),
        }
    }
}

// ******** Output data structures *********

pub type RecordId = i64;

/// A persisted evaluation. Immutable once written.
#[derive(PartialEq, Debug, Clone)]
pub struct EvaluationRecord {
    pub id: RecordId,
    pub project: String,
    pub name: String,
    pub role: String,
    pub date: String,
    pub scores: Scores,
    pub average_score: Option<f64>,
    pub comments: String,
}

impl EvaluationRecord {
    pub fn from_draft(id: RecordId, draft: &EvaluationDraft, average_score: Option<f64>) -> Self {
        EvaluationRecord {
            id,
            project: draft.project.clone(),
            name: draft.name.clone(),
            role: draft.role.clone(),
            date: draft.date.clone(),
            scores: draft.scores,
            average_score,
            comments: draft.comments.clone(),
        }
    }
}

/// Errors raised by the storage layer.
#[derive(PartialEq, Debug, Clone)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    Unavailable(String),
    /// A single record was rejected (constraint, trigger, ...).
    Rejected(String),
    /// A stored row could not be read back.
    Corrupted(String),
}

impl Error for StoreError {}

impl Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "evaluation store unavailable: {}", msg),
            StoreError::Rejected(msg) => write!(f, "evaluation rejected by the store: {}", msg),
            StoreError::Corrupted(msg) => write!(f, "corrupted evaluation row: {}", msg),
        }
    }
}

/// Equal-weight arithmetic mean, `None` for an empty input.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Rounds to 2 decimal digits. Only meant for presentation.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
