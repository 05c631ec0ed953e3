//! Summary statistics over a set of evaluations.
//!
//! All the functions are pure. Means are equal-weight and keep full
//! precision; use [`round2`](crate::round2) when presenting them.

use log::debug;
use std::collections::BTreeMap;

use crate::model::*;

/// Mean of the overall score of one role.
#[derive(PartialEq, Debug, Clone)]
pub struct RoleMean {
    pub role: String,
    pub average_score: f64,
}

/// Mean of every criterion, and of the overall score, for one role.
#[derive(PartialEq, Debug, Clone)]
pub struct RoleCriteriaMeans {
    pub role: String,
    pub criteria: Scores,
    pub average_score: Option<f64>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Summary {
    pub count: usize,
    pub overall_mean: Option<f64>,
    pub criteria: BTreeMap<Criterion, f64>,
    pub by_role: Vec<RoleMean>,
    pub by_role_and_criterion: Vec<RoleCriteriaMeans>,
}

pub fn overall_count(records: &[EvaluationRecord]) -> usize {
    records.len()
}

/// Mean of the defined overall scores. Records without one are ignored.
pub fn overall_mean(records: &[EvaluationRecord]) -> Option<f64> {
    mean(records.iter().filter_map(|r| r.average_score))
}

/// Mean of each criterion over the records where it is present. Criteria that
/// no record mentions are left out.
pub fn per_criterion_mean(records: &[EvaluationRecord]) -> BTreeMap<Criterion, f64> {
    Criterion::ALL
        .iter()
        .filter_map(|c| mean(records.iter().filter_map(|r| r.scores.get(*c))).map(|m| (*c, m)))
        .collect()
}

fn group_by_role(records: &[EvaluationRecord]) -> BTreeMap<&str, Vec<&EvaluationRecord>> {
    let mut groups: BTreeMap<&str, Vec<&EvaluationRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(r.role.as_str()).or_default().push(r);
    }
    groups
}

/// Mean overall score per role, best first. Ties are ordered by role name.
pub fn per_role_mean_overall(records: &[EvaluationRecord]) -> Vec<RoleMean> {
    let mut res: Vec<RoleMean> = group_by_role(records)
        .into_iter()
        .filter_map(|(role, group)| {
            mean(group.iter().filter_map(|r| r.average_score)).map(|m| RoleMean {
                role: role.to_string(),
                average_score: m,
            })
        })
        .collect();
    // BTreeMap iteration already sorted by role, so a stable sort keeps ties in that order.
    res.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    debug!("per_role_mean_overall: {:?}", res);
    res
}

/// Mean of each criterion and of the overall score, one row per role.
pub fn per_role_mean_by_criterion(records: &[EvaluationRecord]) -> Vec<RoleCriteriaMeans> {
    group_by_role(records)
        .into_iter()
        .map(|(role, group)| {
            let mut criteria = Scores::default();
            for c in Criterion::ALL {
                criteria.set(c, mean(group.iter().filter_map(|r| r.scores.get(c))));
            }
            RoleCriteriaMeans {
                role: role.to_string(),
                criteria,
                average_score: mean(group.iter().filter_map(|r| r.average_score)),
            }
        })
        .collect()
}

pub fn summarize(records: &[EvaluationRecord]) -> Summary {
    Summary {
        count: overall_count(records),
        overall_mean: overall_mean(records),
        criteria: per_criterion_mean(records),
        by_role: per_role_mean_overall(records),
        by_role_and_criterion: per_role_mean_by_criterion(records),
    }
}
