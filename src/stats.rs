use crate::models::{Direction, Record, YearMonth};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Grouping key: one country in one direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub direction: Direction,
    pub code: String,
}

/// Summary statistics for a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub key: GroupKey,
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Month with the highest count (earliest on ties).
    pub peak: Option<YearMonth>,
}

#[derive(Default)]
struct Acc {
    name: String,
    vals: Vec<(YearMonth, f64)>,
    missing: usize,
}

/// Compute grouped statistics by (direction, country code).
pub fn grouped_summary(records: &[Record]) -> Vec<Summary> {
    let mut groups: BTreeMap<GroupKey, Acc> = BTreeMap::new();
    for r in records {
        let key = GroupKey {
            direction: r.direction,
            code: r.code.clone(),
        };
        let acc = groups.entry(key).or_default();
        if acc.name.is_empty() {
            acc.name = r.name.clone();
        }
        match r.value {
            Some(v) => acc.vals.push((r.date, v)),
            None => acc.missing += 1,
        }
    }

    let mut out = Vec::new();
    for (key, acc) in groups {
        let peak = acc
            .vals
            .iter()
            .fold(None::<(YearMonth, f64)>, |best, &(d, v)| match best {
                Some((bd, bv)) if bv > v || (bv == v && bd <= d) => Some((bd, bv)),
                _ => Some((d, v)),
            })
            .map(|(d, _)| d);

        let mut vals: Vec<f64> = acc.vals.iter().map(|(_, v)| *v).collect();
        vals.sort_by(f64::total_cmp);
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary {
            key,
            name: acc.name,
            count,
            missing: acc.missing,
            min,
            max,
            mean,
            median,
            peak,
        });
    }
    out
}
