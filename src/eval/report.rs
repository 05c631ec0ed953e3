// Presentation of the records and of the summary statistics.
// All the values are rounded to 2 decimals here and only here.

use serde_json::json;
use serde_json::Map as JSMap;
use std::fmt::{self, Display};

use crate::eval::*;

fn js_number(x: Option<f64>) -> JSValue {
    match x {
        Some(x) => json!(round2(x)),
        None => JSValue::Null,
    }
}

fn fmt_number(x: Option<f64>) -> String {
    match x {
        Some(x) => format!("{:.2}", round2(x)),
        None => "-".to_string(),
    }
}

pub fn summary_to_json(summary: &Summary) -> JSValue {
    let mut criteria: JSMap<String, JSValue> = JSMap::new();
    for (c, m) in summary.criteria.iter() {
        criteria.insert(c.column_name().to_string(), js_number(Some(*m)));
    }

    let by_role: Vec<JSValue> = summary
        .by_role
        .iter()
        .map(|r| json!({"role": r.role, "averageScore": js_number(Some(r.average_score))}))
        .collect();

    let by_role_and_criterion: Vec<JSValue> = summary
        .by_role_and_criterion
        .iter()
        .map(|r| {
            let mut obj: JSMap<String, JSValue> = JSMap::new();
            obj.insert("role".to_string(), json!(r.role));
            for (c, m) in r.criteria.iter() {
                obj.insert(c.column_name().to_string(), js_number(m));
            }
            obj.insert("averageScore".to_string(), js_number(r.average_score));
            JSValue::Object(obj)
        })
        .collect();

    json!({
        "count": summary.count,
        "overallMean": js_number(summary.overall_mean),
        "criteria": criteria,
        "byRole": by_role,
        "byRoleAndCriterion": by_role_and_criterion,
    })
}

fn role_label(role: &str) -> &str {
    if role.is_empty() {
        "(no role)"
    } else {
        role
    }
}

// Text rendering of a summary.
struct SummaryText<'a>(&'a Summary);

impl Display for SummaryText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        if summary.count == 0 {
            return writeln!(f, "No evaluations recorded yet.");
        }
        writeln!(f, "Number of evaluations: {}", summary.count)?;
        writeln!(f, "Mean score: {}", fmt_number(summary.overall_mean))?;

        writeln!(f, "\nMean per criterion")?;
        for (c, m) in summary.criteria.iter() {
            writeln!(f, "  {:<24}{:>8}", c.label(), fmt_number(Some(*m)))?;
        }

        writeln!(f, "\nMean score per role")?;
        for r in summary.by_role.iter() {
            writeln!(
                f,
                "  {:<24}{:>8}",
                role_label(&r.role),
                fmt_number(Some(r.average_score))
            )?;
        }

        writeln!(f, "\nMean per role and criterion")?;
        for r in summary.by_role_and_criterion.iter() {
            writeln!(f, "  {}", role_label(&r.role))?;
            for (c, m) in r.criteria.iter() {
                writeln!(f, "    {:<22}{:>8}", c.label(), fmt_number(m))?;
            }
            writeln!(f, "    {:<22}{:>8}", "Mean score", fmt_number(r.average_score))?;
        }
        Ok(())
    }
}

// Text rendering of a list of records.
struct RecordsText<'a>(&'a [EvaluationRecord]);

impl Display for RecordsText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No evaluations recorded yet.");
        }
        for r in self.0 {
            writeln!(
                f,
                "#{} {} {} ({}, {}) mean score {}",
                r.id,
                r.date,
                r.name,
                role_label(&r.role),
                r.project,
                fmt_number(r.average_score)
            )?;
            let scores: Vec<String> = r
                .scores
                .iter()
                .map(|(c, x)| format!("{} {}", c.column_name(), fmt_number(x)))
                .collect();
            writeln!(f, "    {}", scores.join(", "))?;
            if !r.comments.is_empty() {
                writeln!(f, "    {}", r.comments)?;
            }
        }
        Ok(())
    }
}

pub fn format_summary(summary: &Summary) -> String {
    SummaryText(summary).to_string()
}

pub fn format_records(records: &[EvaluationRecord]) -> String {
    RecordsText(records).to_string()
}
