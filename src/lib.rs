//! travel_viz
//!
//! A lightweight Rust library for loading, summarizing, and charting monthly
//! passenger arrivals and departures per country. Pairs with the `tviz` CLI.
//!
//! ### Features
//! - Load the per-direction CSV exports into one tidy dataset
//! - Slope charts comparing two months, with de-collided value labels (SVG/PNG)
//! - Choropleth fill colors and legend for one month
//! - Quick per-country statistics (min, max, mean, median, peak month)
//!
//! ### Example
//! ```no_run
//! use travel_viz::{Direction, SlopeChart, SlopeChartConfig};
//!
//! let data = travel_viz::storage::load_dataset("arrivals.csv", "departures.csv")?;
//! let chart = SlopeChart::build(
//!     &data,
//!     Direction::Arrivals,
//!     "2009-08".parse()?,
//!     "2019-08".parse()?,
//!     &SlopeChartConfig::default(),
//! )?;
//! travel_viz::viz::plot_slope_chart(&chart, "slope.svg")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod dodge;
pub mod format;
pub mod models;
pub mod stats;
pub mod storage;
pub mod viz;

pub use dodge::{DodgeError, DodgeOptions, dodge, dodge_with};
pub use models::{Dataset, Direction, Record, YearMonth};
pub use viz::{Choropleth, SlopeChart, SlopeChartConfig};
