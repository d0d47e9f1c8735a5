//! Visualization: slope charts rendered to **SVG** or **PNG**, plus the data
//! side of the choropleth map and its color legend.
//!
//! - Slope chart with de-collided value labels on both sides
//! - Locale-style tick labels (`30,000`), whole numbers
//! - Sequential red color ramp and legend for the map view

pub mod choropleth;
pub mod fonts;
pub mod scale;
pub mod slope;
pub mod text;
pub mod types;

pub use choropleth::{Choropleth, ChoroplethEntry};
pub use slope::{LabelColumn, Slope, SlopeChart, SlopeLabel};
pub use types::{ChartError, SlopeChartConfig};

use crate::format::format_count;
use anyhow::{Result, anyhow, bail};
use log::debug;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;

use scale::{LinearScale, sequential_reds};

const AXIS_COLOR: RGBColor = RGBColor(0x33, 0x33, 0x33);
const TICK_SIZE: i32 = 6;

fn px(v: f64) -> i32 {
    v.round() as i32
}

/// Render the chart to an SVG document in memory.
pub fn slope_chart_svg(chart: &SlopeChart) -> Result<String> {
    let mut buf = String::new();
    {
        let dims = (chart.config.width, chart.config.height);
        let root = SVGBackend::with_string(&mut buf, dims).into_drawing_area();
        draw_slope_chart(&root, chart)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(buf)
}

/// Render the chart to `out_path`; `.svg` is written as SVG, anything else as PNG.
///
/// PNG needs a registered font (see [`fonts::register_font_file`]).
pub fn plot_slope_chart<P: AsRef<Path>>(chart: &SlopeChart, out_path: P) -> Result<()> {
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let dims = (chart.config.width, chart.config.height);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), dims).into_drawing_area();
        draw_slope_chart(&root, chart)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    } else {
        if !fonts::font_registered() {
            bail!("PNG output needs a font file; register one first (CLI: --font <file.ttf>)");
        }
        let root = BitMapBackend::new(path_string.as_str(), dims).into_drawing_area();
        draw_slope_chart(&root, chart)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    debug!("wrote slope chart to {}", out_path.display());
    Ok(())
}

fn draw_slope_chart<DB>(root: &DrawingArea<DB, Shift>, chart: &SlopeChart) -> Result<()>
where
    DB: DrawingBackend,
{
    let cfg = &chart.config;
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    // ----------------------------
    // 1) Top axis: one tick + month label per column
    // ----------------------------
    let axis_y = px(cfg.margin_top);
    let axis_style = TextStyle::from((FontFamily::SansSerif, cfg.font_px))
        .color(&AXIS_COLOR)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    for col in &chart.columns {
        let x = px(col.x);
        root.draw(&PathElement::new(
            vec![(x, axis_y), (x, axis_y - TICK_SIZE)],
            AXIS_COLOR.stroke_width(1),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            col.date.axis_label(),
            (x, axis_y - TICK_SIZE - 3),
            axis_style.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    // ----------------------------
    // 2) Slopes
    // ----------------------------
    for ((x0, y0), (x1, y1), color) in chart.segments() {
        root.draw(&PathElement::new(
            vec![(px(x0), px(y0)), (px(x1), px(y1))],
            color.stroke_width(2),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    // ----------------------------
    // 3) Labels (positions already de-collided)
    // ----------------------------
    for col in &chart.columns {
        for label in &col.labels {
            if label.text.is_empty() {
                continue;
            }
            let h = if label.anchor_end { HPos::Right } else { HPos::Left };
            let style = TextStyle::from((FontFamily::SansSerif, cfg.font_px))
                .color(&label.color)
                .pos(Pos::new(h, VPos::Center));
            root.draw(&Text::new(
                label.text.clone(),
                (px(label.x), px(label.y)),
                style,
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        }
    }
    Ok(())
}

/// Horizontal color legend for a choropleth, as an SVG document.
pub fn choropleth_legend_svg(map: &Choropleth, width: u32) -> Result<String> {
    const HEIGHT: u32 = 50;
    const MARGIN_TOP: i32 = 18;
    const RAMP_H: i32 = 10;

    let width = width.max(64);
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (width, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

        let w = width as i32;
        for x in 0..w {
            let t = x as f64 / (w - 1).max(1) as f64;
            root.draw(&Rectangle::new(
                [(x, MARGIN_TOP), (x + 1, MARGIN_TOP + RAMP_H)],
                sequential_reds(t).filled(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        }

        let title_style = TextStyle::from((FontFamily::SansSerif, 12))
            .color(&AXIS_COLOR)
            .pos(Pos::new(HPos::Left, VPos::Bottom));
        root.draw(&Text::new(
            format!("Passenger {}", map.direction),
            (0, MARGIN_TOP - 4),
            title_style,
        ))
        .map_err(|e| anyhow!("{:?}", e))?;

        let x_scale = LinearScale::new(map.domain, (0.0, (w - 1) as f64));
        let tick_style = TextStyle::from((FontFamily::SansSerif, 10))
            .color(&AXIS_COLOR)
            .pos(Pos::new(HPos::Center, VPos::Top));
        let tick_y = MARGIN_TOP + RAMP_H;
        for t in map.legend_ticks((width / 64) as usize) {
            let x = px(x_scale.map(t));
            root.draw(&PathElement::new(
                vec![(x, tick_y), (x, tick_y + TICK_SIZE)],
                AXIS_COLOR.stroke_width(1),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
            root.draw(&Text::new(
                format_count(t),
                (x, tick_y + TICK_SIZE + 2),
                tick_style.clone(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        }
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(buf)
}
