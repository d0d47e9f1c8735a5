//! Public types and constants for the visualization module.

use crate::dodge::{self, DodgeOptions};
use crate::models::{Direction, YearMonth};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("no {direction} records for {left} or {right}")]
    NoData {
        direction: Direction,
        left: YearMonth,
        right: YearMonth,
    },
    #[error("no {direction} records for {date}")]
    NoDataForMonth { direction: Direction, date: YearMonth },
    #[error("no numeric values to plot")]
    NoValues,
}

/// Layout constants for the slope chart. Defaults match the dashboard's chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SlopeChartConfig {
    pub width: u32,
    pub height: u32,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    /// Extra vertical room between the margins and the value range.
    pub inset_top: f64,
    pub inset_bottom: f64,
    /// Horizontal gap between a column and its labels.
    pub label_padding: f64,
    /// Minimum vertical distance between labels in one column.
    pub label_separation: f64,
    pub font_px: u32,
    pub max_iterations: usize,
    pub max_error: f64,
}

impl Default for SlopeChartConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 500,
            margin_top: 20.0,
            margin_right: 150.0,
            margin_bottom: 20.0,
            margin_left: 150.0,
            inset_top: 30.0,
            inset_bottom: 30.0,
            label_padding: 3.0,
            label_separation: 15.0,
            font_px: 12,
            max_iterations: dodge::DEFAULT_MAX_ITERATIONS,
            max_error: dodge::DEFAULT_MAX_ERROR,
        }
    }
}

impl SlopeChartConfig {
    pub fn dodge_options(&self) -> DodgeOptions {
        DodgeOptions::new(self.label_separation)
            .max_iterations(self.max_iterations)
            .max_error(self.max_error)
    }

    /// Pixel span of the value axis, bottom first (screen y grows downward).
    pub fn y_range(&self) -> (f64, f64) {
        (
            self.height as f64 - self.margin_bottom - self.inset_bottom,
            self.margin_top + self.inset_top,
        )
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.margin_left, self.width as f64 - self.margin_right)
    }
}

