//! Maps rows of externally supplied tables onto [`EvaluationDraft`]s.
//!
//! Spreadsheets exported by hand rarely agree on the spelling of their
//! headers. Each canonical field has an ordered list of accepted headers and
//! the first one holding a usable value wins. Nothing in this module fails:
//! unusable cells simply leave the field empty.

use log::debug;
use std::collections::HashMap;

use crate::model::*;

/// A raw cell, as read from a CSV or Excel file.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

/// One row of an input table, keyed by header.
pub type RawRow = HashMap<String, CellValue>;

// Tokens that spreadsheet tools write for a missing value.
const NULL_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

impl CellValue {
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(x) => x.is_nan(),
            CellValue::Text(s) => NULL_TOKENS.contains(&s.as_str()),
        }
    }

    /// The cell rendered as text. Numbers use their shortest decimal form.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(x) => x.to_string(),
        }
    }
}

pub const PROJECT_ALIASES: &[&str] = &["projeto", "PROJETO", "Projeto", "project", "Project", "PROJECT"];
pub const NAME_ALIASES: &[&str] = &["nome", "Nome", "NOME", "name", "Name", "NAME"];
pub const ROLE_ALIASES: &[&str] = &["cargo", "Cargo", "CARGO", "role", "Role", "ROLE"];
pub const DATE_ALIASES: &[&str] = &["data", "Data", "DATA", "date", "Date", "DATE"];
pub const COMMENTS_ALIASES: &[&str] = &[
    "comentarios",
    "Comentários",
    "Comentarios",
    "COMENTARIOS",
    "comentários",
    "COMENTÁRIOS",
    "comments",
    "Comments",
    "COMMENTS",
];

/// The accepted headers of a criterion, in priority order.
pub fn criterion_aliases(criterion: Criterion) -> &'static [&'static str] {
    match criterion {
        Criterion::Leadership => &[
            "liderança",
            "lideranca",
            "LIDERANÇA",
            "LIDERANCA",
            "Liderança",
            "Lideranca",
            "leadership",
            "Leadership",
            "LEADERSHIP",
        ],
        Criterion::Attendance => &[
            "assiduidade",
            "Assiduidade",
            "ASSIDUIDADE",
            "attendance",
            "Attendance",
            "ATTENDANCE",
        ],
        Criterion::Flexibility => &[
            "flexibilidade",
            "Flexibilidade",
            "FLEXIBILIDADE",
            "flexibility",
            "Flexibility",
            "FLEXIBILITY",
        ],
        Criterion::Theory => &["teoria", "Teoria", "TEORIA", "theory", "Theory", "THEORY"],
        Criterion::Command => &["comando", "Comando", "COMANDO", "command", "Command", "COMMAND"],
        Criterion::Control => &["controle", "Controle", "CONTROLE", "control", "Control", "CONTROL"],
        Criterion::BodyDragLeftRight => &[
            "badydrag esq/dir",
            "badydrag_esq_dir",
            "badydrag",
            "BADYDRAG ESQ/DIR",
            "BADYDRAG_ESQ_DIR",
            "Badydrag",
            "Badydrag esq/dir",
            "bodydrag esq/dir",
            "body drag esq/dir",
            "body_drag_left_right",
            "body drag left/right",
            "Body drag left/right",
            "BODY DRAG LEFT/RIGHT",
            "body-drag",
        ],
        Criterion::WaterStart => &[
            "water start",
            "water_start",
            "Water Start",
            "WATER START",
            "water-start",
            "Water start",
            "WATER_START",
        ],
        Criterion::BoardLeftRight => &[
            "prancha esq/dir",
            "prancha_esq_dir",
            "PRANCHA ESQ/DIR",
            "PRANCHA_ESQ_DIR",
            "Prancha",
            "Prancha esq/dir",
            "prancha",
            "board_left_right",
            "board left/right",
            "Board left/right",
            "BOARD LEFT/RIGHT",
        ],
        Criterion::Upwind => &[
            "contra vento",
            "contra_vento",
            "contra-vento",
            "Contra vento",
            "CONTRA VENTO",
            "Contra Vento",
            "CONTRA_VENTO",
            "upwind",
            "Upwind",
            "UPWIND",
        ],
    }
}

/// Finds the first alias, in priority order, whose cell holds a usable value.
pub fn resolve<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a CellValue> {
    aliases
        .iter()
        .filter_map(|alias| row.get(*alias))
        .find(|cell| !cell.is_missing())
}

/// Lenient numeric coercion: anything that is not a finite number is absent.
pub fn coerce_score(cell: &CellValue) -> Option<f64> {
    let x = match cell {
        CellValue::Number(x) => Some(*x),
        CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        CellValue::Empty => None,
    };
    x.filter(|x| x.is_finite())
}

fn resolve_text(row: &RawRow, aliases: &[&str]) -> String {
    resolve(row, aliases)
        .map(|c| c.to_text())
        .unwrap_or_default()
}

/// Builds a draft out of one input row. Never fails.
pub fn reconcile_row(row: &RawRow) -> EvaluationDraft {
    let project = match resolve_text(row, PROJECT_ALIASES) {
        p if p.trim().is_empty() => DEFAULT_PROJECT.to_string(),
        p => p,
    };

    let mut scores = Scores::default();
    for criterion in Criterion::ALL {
        let value = resolve(row, criterion_aliases(criterion)).and_then(coerce_score);
        scores.set(criterion, value);
    }

    let draft = EvaluationDraft {
        project,
        name: resolve_text(row, NAME_ALIASES),
        role: resolve_text(row, ROLE_ALIASES),
        date: resolve_text(row, DATE_ALIASES),
        scores,
        comments: resolve_text(row, COMMENTS_ALIASES),
    };
    debug!("reconcile_row: {:?}", draft);
    draft
}

pub fn reconcile_rows(rows: &[RawRow]) -> Vec<EvaluationDraft> {
    rows.iter().map(reconcile_row).collect()
}
