//! Choropleth data: one fill color per country for a single month.
//!
//! Map geometry is left to the consumer; this module decides *what* each
//! country looks like (value, fill, legend ticks), keyed by country code.

use crate::format::format_count;
use crate::models::{Dataset, Direction, YearMonth};
use crate::storage::sanitize_cell;
use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::scale::{LinearScale, hex, sequential_reds};
use super::types::ChartError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethEntry {
    pub code: String,
    pub name: String,
    pub value: Option<f64>,
    /// `#rrggbb`, or `None` to leave the shape unfilled.
    pub fill: Option<String>,
}

impl ChoroplethEntry {
    /// `Germany in August 2019: 1,234 passenger arrivals`
    pub fn describe(&self, direction: Direction, date: YearMonth) -> String {
        match self.value {
            Some(v) => format!(
                "{} in {}: {} passenger {}",
                self.name,
                date.long_label(),
                format_count(v),
                direction
            ),
            None => format!("{} in {}: no data", self.name, date.long_label()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Choropleth {
    pub direction: Direction,
    pub date: YearMonth,
    /// Color domain, `[0, nice(max)]`.
    pub domain: (f64, f64),
    pub entries: Vec<ChoroplethEntry>,
}

impl Choropleth {
    pub fn build(
        dataset: &Dataset,
        direction: Direction,
        date: YearMonth,
    ) -> Result<Self, ChartError> {
        let rows = dataset.filter(direction, date);
        if rows.is_empty() {
            return Err(ChartError::NoDataForMonth { direction, date });
        }
        let max = rows
            .iter()
            .filter_map(|r| r.value)
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(ChartError::NoValues);
        }
        // An all-zero month keeps the empty domain and paints every value at the light end.
        let scale = if max > 0.0 {
            LinearScale::new((0.0, max), (0.0, 1.0)).nice(10)
        } else {
            LinearScale::new((0.0, 0.0), (0.0, 1.0))
        };
        let domain = scale.domain;
        let ramp_t = |v: f64| {
            if domain.1 > domain.0 {
                scale.map(v)
            } else {
                0.0
            }
        };

        let entries = rows
            .iter()
            .map(|r| ChoroplethEntry {
                code: r.code.clone(),
                name: r.name.clone(),
                value: r.value,
                fill: r.value.map(|v| hex(sequential_reds(ramp_t(v)))),
            })
            .collect();

        Ok(Self {
            direction,
            date,
            domain,
            entries,
        })
    }

    pub fn get(&self, code: &str) -> Option<&ChoroplethEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    /// Tick values for a color legend of about `count` ticks.
    pub fn legend_ticks(&self, count: usize) -> Vec<f64> {
        LinearScale::new(self.domain, (0.0, 1.0)).ticks(count)
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = WriterBuilder::new().from_path(path)?;
        for e in &self.entries {
            wtr.serialize(ChoroplethEntry {
                code: sanitize_cell(&e.code),
                name: sanitize_cell(&e.name),
                value: e.value,
                fill: e.fill.clone(),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut f = File::create(path)?;
        let s = serde_json::to_string_pretty(&self.entries)?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    fn rec(name: &str, code: &str, value: Option<f64>) -> Record {
        Record {
            date: "2019-08".parse().unwrap(),
            name: name.into(),
            code: code.into(),
            value,
            direction: Direction::Departures,
        }
    }

    #[test]
    fn fills_scale_from_zero_to_nice_max() {
        let ds = Dataset::new(vec![
            rec("Germany", "276", Some(970.0)),
            rec("Japan", "392", Some(0.0)),
            rec("Chile", "152", None),
        ]);
        let date: YearMonth = "2019-08".parse().unwrap();
        let map = Choropleth::build(&ds, Direction::Departures, date).unwrap();
        assert_eq!(map.domain, (0.0, 1000.0));
        assert_eq!(map.get("392").unwrap().fill.as_deref(), Some("#fff5f0"));
        assert!(map.get("152").unwrap().fill.is_none());
        assert!(map.get("276").unwrap().fill.is_some());
        assert_eq!(map.legend_ticks(5), vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0]);
    }

    #[test]
    fn all_zero_month_keeps_zero_domain() {
        let ds = Dataset::new(vec![
            rec("Germany", "276", Some(0.0)),
            rec("Japan", "392", Some(0.0)),
        ]);
        let date: YearMonth = "2019-08".parse().unwrap();
        let map = Choropleth::build(&ds, Direction::Departures, date).unwrap();
        assert_eq!(map.domain, (0.0, 0.0));
        for e in &map.entries {
            assert_eq!(e.fill.as_deref(), Some("#fff5f0"));
        }
        assert_eq!(map.legend_ticks(5), vec![0.0]);
    }

    #[test]
    fn describe_reads_naturally() {
        let e = ChoroplethEntry {
            code: "276".into(),
            name: "Germany".into(),
            value: Some(1234.0),
            fill: None,
        };
        let date: YearMonth = "2019-08".parse().unwrap();
        assert_eq!(
            e.describe(Direction::Arrivals, date),
            "Germany in August 2019: 1,234 passenger arrivals"
        );
    }

    #[test]
    fn wrong_month_is_no_data() {
        let ds = Dataset::new(vec![rec("Germany", "276", Some(1.0))]);
        let date: YearMonth = "2001-01".parse().unwrap();
        assert!(Choropleth::build(&ds, Direction::Departures, date).is_err());
    }
}
