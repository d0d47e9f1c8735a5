//! Slope chart model: one line per country between two months, with
//! value labels in a column on each side.
//!
//! Building a [`SlopeChart`] does all the layout (scales, label text,
//! de-collided label positions); the drawing code in [`super`] only paints it.

use crate::dodge;
use crate::format::{describe_change, format_count};
use crate::models::{Dataset, Direction, Record, YearMonth};
use log::warn;
use plotters::style::RGBColor;

use super::scale::{LinearScale, OrdinalPalette, PointScale};
use super::text::truncate_to_width;
use super::types::{ChartError, SlopeChartConfig};

/// One country's values in the two compared months.
#[derive(Debug, Clone, PartialEq)]
pub struct Slope {
    pub name: String,
    pub code: String,
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub color: RGBColor,
}

impl Slope {
    /// Relative change from left to right, when both exist and left is non-zero.
    pub fn change(&self) -> Option<f64> {
        match (self.left, self.right) {
            (Some(l), Some(r)) if l != 0.0 => Some((r - l) / l),
            _ => None,
        }
    }

    /// Plain-text summary of this country, one fact per line.
    pub fn summary(&self, direction: Direction, left: YearMonth, right: YearMonth) -> String {
        let mut lines = vec![self.name.clone()];
        let change = self.change();
        if let Some(r) = self.right {
            lines.push(format!(
                "{} passenger {} in {}",
                format_count(r),
                direction,
                right.long_label()
            ));
        }
        if change.is_some() {
            lines.push("compared to".to_string());
        }
        if let Some(l) = self.left {
            lines.push(format!(
                "{} passenger {} in {}",
                format_count(l),
                direction,
                left.long_label()
            ));
        }
        if let Some(c) = change {
            lines.push(describe_change(c));
        }
        lines.join("\n")
    }
}

/// A positioned label. `y` is already de-collided.
#[derive(Debug, Clone, PartialEq)]
pub struct SlopeLabel {
    /// Index into [`SlopeChart::slopes`].
    pub slope: usize,
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Text ends at `x` (left column) instead of starting there.
    pub anchor_end: bool,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelColumn {
    pub date: YearMonth,
    pub x: f64,
    pub labels: Vec<SlopeLabel>,
}

#[derive(Debug, Clone)]
pub struct SlopeChart {
    pub direction: Direction,
    pub left: YearMonth,
    pub right: YearMonth,
    pub config: SlopeChartConfig,
    pub y_scale: LinearScale,
    pub slopes: Vec<Slope>,
    /// Left column first; a single column when both months are equal.
    pub columns: Vec<LabelColumn>,
}

impl SlopeChart {
    pub fn build(
        dataset: &Dataset,
        direction: Direction,
        left: YearMonth,
        right: YearMonth,
        config: &SlopeChartConfig,
    ) -> Result<Self, ChartError> {
        let rows = dataset.filter_pair(direction, left, right);
        if rows.is_empty() {
            return Err(ChartError::NoData {
                direction,
                left,
                right,
            });
        }

        let slopes = collect_slopes(&rows, left, right);

        let values: Vec<f64> = slopes
            .iter()
            .flat_map(|s| [s.left, s.right])
            .flatten()
            .collect();
        if values.is_empty() {
            return Err(ChartError::NoValues);
        }
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let y_scale = LinearScale::new((lo, hi), config.y_range()).nice(10);

        let dates: Vec<YearMonth> = if left == right {
            vec![left]
        } else {
            vec![left, right]
        };
        let x_scale = PointScale::new(dates.len(), config.x_range());

        let columns = dates
            .iter()
            .enumerate()
            .map(|(i, &date)| {
                let x = x_scale.position(i);
                let labels = layout_column(&slopes, i == 0, x, &y_scale, config);
                LabelColumn { date, x, labels }
            })
            .collect();

        Ok(Self {
            direction,
            left,
            right,
            config: config.clone(),
            y_scale,
            slopes,
            columns,
        })
    }

    /// Line endpoints in pixels, for slopes with both values present and finite.
    pub fn segments(&self) -> Vec<((f64, f64), (f64, f64), RGBColor)> {
        let (Some(first), Some(last)) = (self.columns.first(), self.columns.last()) else {
            return Vec::new();
        };
        self.slopes
            .iter()
            .filter_map(|s| {
                let (y0, y1) = (self.y_scale.map(s.left?), self.y_scale.map(s.right?));
                if !(y0.is_finite() && y1.is_finite()) {
                    return None;
                }
                Some(((first.x, y0), (last.x, y1), s.color))
            })
            .collect()
    }

    pub fn find(&self, name_or_code: &str) -> Option<&Slope> {
        self.slopes
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name_or_code) || s.code == name_or_code)
    }
}

/// Group the selected rows into one slope per country, in order of first appearance.
fn collect_slopes(rows: &[&Record], left: YearMonth, right: YearMonth) -> Vec<Slope> {
    let mut palette = OrdinalPalette::new();
    let mut slopes: Vec<Slope> = Vec::new();
    for r in rows {
        let idx = match slopes.iter().position(|s| s.name == r.name) {
            Some(i) => i,
            None => {
                slopes.push(Slope {
                    name: r.name.clone(),
                    code: r.code.clone(),
                    left: None,
                    right: None,
                    color: palette.color(&r.name),
                });
                slopes.len() - 1
            }
        };
        if r.date == left {
            slopes[idx].left = r.value;
        }
        if r.date == right {
            slopes[idx].right = r.value;
        }
    }
    slopes
}

fn layout_column(
    slopes: &[Slope],
    is_left: bool,
    x: f64,
    y_scale: &LinearScale,
    config: &SlopeChartConfig,
) -> Vec<SlopeLabel> {
    let present: Vec<(usize, f64)> = slopes
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            let v = if is_left { s.left } else { s.right };
            v.map(|v| (i, v))
        })
        .collect();

    let wanted: Vec<f64> = present.iter().map(|(_, v)| y_scale.map(*v)).collect();
    let ys = match dodge::dodge_with(&wanted, &config.dodge_options()) {
        Ok(ys) => ys,
        Err(e) => {
            warn!("omitting label column at x={x:.0}: {e}");
            return Vec::new();
        }
    };

    let margin = if is_left {
        config.margin_left
    } else {
        config.margin_right
    };
    let budget = (margin - config.label_padding).max(0.0) as u32;

    present
        .iter()
        .zip(ys)
        .map(|(&(i, v), y)| {
            let s = &slopes[i];
            let raw = if is_left {
                format!("{} {}", s.name, format_count(v))
            } else {
                format!("{} {}", format_count(v), s.name)
            };
            let offset = if is_left {
                -config.label_padding
            } else {
                config.label_padding
            };
            SlopeLabel {
                slope: i,
                text: truncate_to_width(&raw, config.font_px, budget),
                x: x + offset,
                y,
                anchor_end: is_left,
                color: s.color,
            }
        })
        .collect()
}
