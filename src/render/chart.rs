//! Inline SVG line chart for cumulative entries over time.

use crate::models::CumulativeSeries;
use crate::render::escape_html;

/// Palette cycled across group series.
const SERIES_COLORS: &[&str] = &[
    "#ffcc00", "#00ccff", "#ff4b4b", "#7ed957", "#ffb6c1", "#fdda24", "#66d3ff", "#a56b46",
];

const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 32.0;

/// Render the cumulative series as an SVG line chart, one polyline per
/// group. Gaps before a group's first entry produce a shorter line, not
/// a drop to zero.
pub fn line_chart_svg(series: &CumulativeSeries, width: u32, height: u32) -> String {
    if series.is_empty() {
        return String::new();
    }

    let w = width as f64;
    let h = height as f64;
    let plot_w = w - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = h - MARGIN_TOP - MARGIN_BOTTOM;

    let max_y = series.max_value().max(1) as f64;
    let n = series.dates.len();

    let x_at = |i: usize| {
        if n == 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + plot_w * i as f64 / (n - 1) as f64
        }
    };
    let y_at = |v: u32| MARGIN_TOP + plot_h * (1.0 - v as f64 / max_y);

    let mut svg = format!(
        r#"<svg class="chart" viewBox="0 0 {w} {h}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg">"#,
        w = width,
        h = height,
    );

    // Axes
    svg.push_str(&format!(
        r##"<line x1="{l}" y1="{t}" x2="{l}" y2="{b}" stroke="#888"/><line x1="{l}" y1="{b}" x2="{r}" y2="{b}" stroke="#888"/>"##,
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = MARGIN_TOP + plot_h,
        r = MARGIN_LEFT + plot_w,
    ));

    // Y extremes and first/last date labels
    svg.push_str(&format!(
        r##"<text x="{x}" y="{y_max}" fill="#ccc" font-size="10" text-anchor="end">{max}</text><text x="{x}" y="{y_zero}" fill="#ccc" font-size="10" text-anchor="end">0</text>"##,
        x = MARGIN_LEFT - 6.0,
        y_max = MARGIN_TOP + 4.0,
        y_zero = MARGIN_TOP + plot_h,
        max = max_y as u32,
    ));
    svg.push_str(&format!(
        r##"<text x="{x1}" y="{y}" fill="#ccc" font-size="10">{first}</text><text x="{x2}" y="{y}" fill="#ccc" font-size="10" text-anchor="end">{last}</text>"##,
        x1 = MARGIN_LEFT,
        x2 = MARGIN_LEFT + plot_w,
        y = h - 10.0,
        first = series.dates[0],
        last = series.dates[n - 1],
    ));

    for (si, group) in series.groups.iter().enumerate() {
        let color = SERIES_COLORS[si % SERIES_COLORS.len()];

        let points: Vec<String> = group
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| format!("{:.1},{:.1}", x_at(i), y_at(v))))
            .collect();

        if points.is_empty() {
            continue;
        }
        if points.len() == 1 {
            // A single point would be an invisible polyline.
            let (x, y) = points[0].split_once(',').unwrap_or(("0", "0"));
            svg.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="3" fill="{}"/>"#,
                x, y, color
            ));
        } else {
            svg.push_str(&format!(
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
                points.join(" "),
                color
            ));
        }

        // Legend entry
        svg.push_str(&format!(
            r##"<rect x="{x}" y="{y}" width="10" height="10" fill="{color}"/><text x="{tx}" y="{ty}" fill="#eee" font-size="10">{label}</text>"##,
            x = MARGIN_LEFT + 8.0,
            y = MARGIN_TOP + 4.0 + (si as f64) * 16.0,
            tx = MARGIN_LEFT + 22.0,
            ty = MARGIN_TOP + 13.0 + (si as f64) * 16.0,
            color = color,
            label = escape_html(&group.group),
        ));
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupSeries;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn series() -> CumulativeSeries {
        CumulativeSeries {
            dates: vec![date(1), date(2), date(3)],
            groups: vec![
                GroupSeries {
                    group: "Platform".to_string(),
                    values: vec![Some(2), Some(2), Some(3)],
                },
                GroupSeries {
                    group: "Data".to_string(),
                    values: vec![None, Some(1), Some(1)],
                },
            ],
        }
    }

    #[test]
    fn test_empty_series_renders_nothing() {
        assert_eq!(line_chart_svg(&CumulativeSeries::default(), 720, 360), "");
    }

    #[test]
    fn test_chart_has_polyline_per_group() {
        let svg = line_chart_svg(&series(), 720, 360);
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("Platform"));
        assert!(svg.contains("Data"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_gap_shortens_line() {
        let svg = line_chart_svg(&series(), 720, 360);
        // "Data" starts a day late: its polyline has 2 points, not 3.
        let data_line = svg
            .split("<polyline")
            .nth(2)
            .expect("second polyline present");
        let points = data_line.split('"').nth(1).unwrap();
        assert_eq!(points.split(' ').count(), 2);
    }

    #[test]
    fn test_single_point_renders_circle() {
        let single = CumulativeSeries {
            dates: vec![date(1)],
            groups: vec![GroupSeries {
                group: "Solo".to_string(),
                values: vec![Some(1)],
            }],
        };
        let svg = line_chart_svg(&single, 720, 360);
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn test_axis_and_legend_colors_survive() {
        let svg = line_chart_svg(&series(), 720, 360);
        assert!(svg.contains(r##"stroke="#888""##));
        assert!(svg.contains(r##"fill="#ccc""##));
        assert!(svg.contains(r##"fill="#eee""##));
    }

    #[test]
    fn test_date_labels() {
        let svg = line_chart_svg(&series(), 720, 360);
        assert!(svg.contains("2025-06-01"));
        assert!(svg.contains("2025-06-03"));
    }
}
