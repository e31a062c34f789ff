//! Chart series and rendering
//!
//! The engine describes charts as plain numeric series ([`ChartSeries`]).
//! Turning them into images is the job of a [`ChartRenderer`]; the built-in
//! [`SvgRenderer`] emits base64-encoded SVG documents.
//!
//! Charts produced for a budget:
//! - `expense_breakdown` - pie of where monthly income goes
//! - `savings_projection` - liquid vs 401k savings at 1, 2 and 10 years
//! - `401k_breakdown` - employee vs employer contributions (only when contributing)

use std::collections::BTreeMap;
use std::fmt::Write as _;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::calculator::BudgetSnapshot;
use crate::error::{Error, Result};
use crate::format::{money, money_whole};
use crate::projection::{Horizon, ProjectionSet};

pub const EXPENSE_BREAKDOWN: &str = "expense_breakdown";
pub const SAVINGS_PROJECTION: &str = "savings_projection";
pub const RETIREMENT_BREAKDOWN: &str = "401k_breakdown";

/// Chart name -> encoded image
pub type ChartSet = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<Slice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
    /// Show cents in value labels
    pub cents: bool,
}

/// Everything needed to draw the charts for one budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub expense_breakdown: PieChart,
    pub savings_projection: BarChart,
    pub retirement_breakdown: Option<BarChart>,
}

fn expense_pie(snapshot: &BudgetSnapshot) -> PieChart {
    let b = &snapshot.expense_breakdown;
    let mut candidates = vec![
        ("Rent/Mortgage", b.rent_or_mortgage),
        ("Car Insurance", b.car_insurance),
        ("Phone Bill", b.phone_bill),
        ("Miscellaneous", b.miscellaneous),
        ("Liquid Savings", b.liquid_savings),
    ];
    if b.retirement_employee > 0.0 {
        candidates.push(("Your 401k Contributions", b.retirement_employee));
    }
    if b.retirement_employer > 0.0 {
        candidates.push(("Employer 401k Match", b.retirement_employer));
    }

    let slices: Vec<Slice> = candidates
        .into_iter()
        .filter(|(_, value)| *value > 0.0)
        .map(|(label, value)| Slice {
            label: label.to_string(),
            value,
        })
        .collect();
    let total: f64 = slices.iter().map(|s| s.value).sum();

    PieChart {
        title: format!("Monthly Budget Breakdown - {}", money(total)),
        slices,
    }
}

fn projection_bars(projections: &ProjectionSet) -> BarChart {
    let horizons = Horizon::all();
    BarChart {
        title: "Savings Projections Over Time".to_string(),
        x_label: Some("Years".to_string()),
        y_label: "Savings Amount ($)".to_string(),
        categories: horizons.iter().map(|h| h.years().to_string()).collect(),
        series: vec![
            BarSeries {
                name: "Liquid Savings".to_string(),
                values: horizons.iter().map(|h| projections.get(*h).liquid).collect(),
            },
            BarSeries {
                name: "401k Savings (Employee + Employer)".to_string(),
                values: horizons
                    .iter()
                    .map(|h| projections.get(*h).retirement_total)
                    .collect(),
            },
        ],
        cents: false,
    }
}

fn retirement_bars(snapshot: &BudgetSnapshot) -> Option<BarChart> {
    if snapshot.monthly_401k_total <= 0.0 {
        return None;
    }

    let mut categories = Vec::new();
    let mut values = Vec::new();
    if snapshot.monthly_401k_employee > 0.0 {
        categories.push("Your Contributions".to_string());
        values.push(snapshot.monthly_401k_employee);
    }
    if snapshot.monthly_401k_employer > 0.0 {
        categories.push("Employer Match".to_string());
        values.push(snapshot.monthly_401k_employer);
    }

    Some(BarChart {
        title: "Monthly 401k Contributions Breakdown".to_string(),
        x_label: None,
        y_label: "Monthly Amount ($)".to_string(),
        categories,
        series: vec![BarSeries {
            name: "Monthly Contribution".to_string(),
            values,
        }],
        cents: true,
    })
}

/// Build the chart series for a snapshot and its projections
pub fn chart_series(snapshot: &BudgetSnapshot, projections: &ProjectionSet) -> ChartSeries {
    ChartSeries {
        expense_breakdown: expense_pie(snapshot),
        savings_projection: projection_bars(projections),
        retirement_breakdown: retirement_bars(snapshot),
    }
}

/// Turns chart series into encoded images
pub trait ChartRenderer: Send + Sync {
    /// Renderer name for logging
    fn name(&self) -> &str;

    /// File extension of the decoded images
    fn file_extension(&self) -> &'static str;

    fn render(&self, charts: &ChartSeries) -> Result<ChartSet>;
}

const PALETTE: &[&str] = &[
    "#f77189", "#dc8932", "#ae9d31", "#77ab31", "#33b07a", "#36ada4", "#38a9c5", "#6e9bf4",
    "#cc7af4", "#f565cc",
];

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders charts as base64-encoded SVG
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl SvgRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn open(&self, title: &str) -> String {
        let (w, h) = (self.width, self.height);
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#
        );
        let _ = write!(
            svg,
            r#"<rect width="{w}" height="{h}" fill="white"/><text x="{}" y="32" font-size="20" font-weight="bold" text-anchor="middle">{}</text>"#,
            w / 2,
            escape(title)
        );
        svg
    }

    /// SVG markup for a pie chart
    pub fn pie_svg(&self, chart: &PieChart) -> String {
        let mut svg = self.open(&chart.title);
        let total: f64 = chart.slices.iter().map(|s| s.value).sum();
        let cx = f64::from(self.width) * 0.4;
        let cy = f64::from(self.height) * 0.55;
        let r = f64::from(self.width.min(self.height)) * 0.32;

        if total <= 0.0 {
            let _ = write!(
                svg,
                r#"<text x="{cx:.1}" y="{cy:.1}" text-anchor="middle" font-size="14">No data</text></svg>"#
            );
            return svg;
        }

        let mut angle = -std::f64::consts::FRAC_PI_2;
        for (i, slice) in chart.slices.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            let share = slice.value / total;
            let sweep = share * std::f64::consts::TAU;

            if chart.slices.len() == 1 {
                let _ = write!(
                    svg,
                    r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{color}"/>"#
                );
            } else {
                let (x0, y0) = (cx + r * angle.cos(), cy + r * angle.sin());
                let end = angle + sweep;
                let (x1, y1) = (cx + r * end.cos(), cy + r * end.sin());
                let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
                let _ = write!(
                    svg,
                    r#"<path d="M{cx:.1},{cy:.1} L{x0:.1},{y0:.1} A{r:.1},{r:.1} 0 {large} 1 {x1:.1},{y1:.1} Z" fill="{color}" stroke="white"/>"#
                );
            }

            let mid = angle + sweep / 2.0;
            let _ = write!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" fill="white" font-weight="bold">{:.1}%</text>"#,
                cx + r * 0.65 * mid.cos(),
                cy + r * 0.65 * mid.sin(),
                share * 100.0
            );

            // Legend
            let ly = 70.0 + i as f64 * 22.0;
            let lx = f64::from(self.width) * 0.78;
            let _ = write!(
                svg,
                r#"<rect x="{lx:.1}" y="{:.1}" width="14" height="14" fill="{color}"/><text x="{:.1}" y="{ly:.1}" font-size="12">{}</text>"#,
                ly - 11.0,
                lx + 20.0,
                escape(&slice.label)
            );

            angle += sweep;
        }

        svg.push_str("</svg>");
        svg
    }

    /// SVG markup for a grouped bar chart
    pub fn bar_svg(&self, chart: &BarChart) -> String {
        let mut svg = self.open(&chart.title);
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let (left, right, top, bottom) = (90.0, 30.0, 60.0, 70.0);
        let plot_w = w - left - right;
        let plot_h = h - top - bottom;

        let values = chart.series.iter().flat_map(|s| s.values.iter().copied());
        let max = values.clone().fold(0.0_f64, f64::max);
        let min = values.fold(0.0_f64, f64::min);
        let span = if max - min > 0.0 { max - min } else { 1.0 };
        let y_of = |v: f64| top + (max - v) / span * plot_h;
        let zero_y = y_of(0.0);

        let _ = write!(
            svg,
            r##"<line x1="{left}" y1="{zero_y:.1}" x2="{:.1}" y2="{zero_y:.1}" stroke="#333"/>"##,
            left + plot_w
        );
        let _ = write!(
            svg,
            r#"<text x="20" y="{:.1}" font-size="12" transform="rotate(-90 20 {:.1})" text-anchor="middle">{}</text>"#,
            top + plot_h / 2.0,
            top + plot_h / 2.0,
            escape(&chart.y_label)
        );
        if let Some(x_label) = &chart.x_label {
            let _ = write!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle">{}</text>"#,
                left + plot_w / 2.0,
                h - 15.0,
                escape(x_label)
            );
        }

        let groups = chart.categories.len().max(1) as f64;
        let group_w = plot_w / groups;
        let bar_w = group_w * 0.7 / chart.series.len().max(1) as f64;

        for (gi, category) in chart.categories.iter().enumerate() {
            let gx = left + gi as f64 * group_w + group_w * 0.15;
            let _ = write!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle">{}</text>"#,
                gx + group_w * 0.35,
                h - bottom + 20.0,
                escape(category)
            );

            for (si, series) in chart.series.iter().enumerate() {
                let Some(value) = series.values.get(gi).copied() else {
                    continue;
                };
                let color = PALETTE[(si * 3) % PALETTE.len()];
                let x = gx + si as f64 * bar_w;
                let y = y_of(value).min(zero_y);
                let bar_h = (y_of(value) - zero_y).abs();
                let label = if chart.cents {
                    money(value)
                } else {
                    money_whole(value)
                };
                let _ = write!(
                    svg,
                    r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{bar_h:.1}" fill="{color}" opacity="0.8"/><text x="{:.1}" y="{:.1}" font-size="11" font-weight="bold" text-anchor="middle">{}</text>"#,
                    x + bar_w / 2.0,
                    y - 4.0,
                    escape(&label)
                );
            }
        }

        // Legend for multi-series charts
        if chart.series.len() > 1 {
            for (si, series) in chart.series.iter().enumerate() {
                let color = PALETTE[(si * 3) % PALETTE.len()];
                let ly = top + 10.0 + si as f64 * 20.0;
                let _ = write!(
                    svg,
                    r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{color}"/><text x="{:.1}" y="{ly:.1}" font-size="12">{}</text>"#,
                    left + 10.0,
                    ly - 10.0,
                    left + 28.0,
                    escape(&series.name)
                );
            }
        }

        svg.push_str("</svg>");
        svg
    }
}

impl ChartRenderer for SvgRenderer {
    fn name(&self) -> &str {
        "svg"
    }

    fn file_extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, charts: &ChartSeries) -> Result<ChartSet> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Render(format!(
                "invalid canvas size {}x{}",
                self.width, self.height
            )));
        }

        let mut set = ChartSet::new();
        set.insert(
            EXPENSE_BREAKDOWN.to_string(),
            STANDARD.encode(self.pie_svg(&charts.expense_breakdown)),
        );
        set.insert(
            SAVINGS_PROJECTION.to_string(),
            STANDARD.encode(self.bar_svg(&charts.savings_projection)),
        );
        if let Some(retirement) = &charts.retirement_breakdown {
            set.insert(
                RETIREMENT_BREAKDOWN.to_string(),
                STANDARD.encode(self.bar_svg(retirement)),
            );
        }
        Ok(set)
    }
}

/// Decode an image produced by a renderer
pub fn decode_image(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| Error::Render(format!("invalid chart payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::calculate;
    use crate::input::{BudgetInput, PayFrequency};
    use crate::projection::project;

    fn snapshot(retirement: f64, matching: f64) -> BudgetSnapshot {
        calculate(&BudgetInput {
            yearly_salary: 75000.0,
            pay_per_check: 2884.62,
            pay_frequency: PayFrequency::BiWeekly,
            retirement_contribution_percent: retirement,
            employer_match_percent: matching,
            rent_or_mortgage: 1200.0,
            car_insurance: 0.0,
            phone_bill: 80.0,
            miscellaneous: 300.0,
        })
        .unwrap()
    }

    #[test]
    fn test_pie_drops_empty_slices() {
        let s = snapshot(0.0, 0.0);
        let series = chart_series(&s, &project(&s));
        let labels: Vec<&str> = series
            .expense_breakdown
            .slices
            .iter()
            .map(|sl| sl.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["Rent/Mortgage", "Phone Bill", "Miscellaneous", "Liquid Savings"]
        );
        assert!(series.retirement_breakdown.is_none());
    }

    #[test]
    fn test_pie_includes_retirement_slices() {
        let s = snapshot(10.0, 5.0);
        let series = chart_series(&s, &project(&s));
        let labels: Vec<&str> = series
            .expense_breakdown
            .slices
            .iter()
            .map(|sl| sl.label.as_str())
            .collect();
        assert!(labels.contains(&"Your 401k Contributions"));
        assert!(labels.contains(&"Employer 401k Match"));
        assert!(series.expense_breakdown.title.starts_with("Monthly Budget Breakdown - $"));

        let retirement = series.retirement_breakdown.unwrap();
        assert_eq!(retirement.categories, vec!["Your Contributions", "Employer Match"]);
    }

    #[test]
    fn test_projection_bars_follow_horizons() {
        let s = snapshot(10.0, 0.0);
        let p = project(&s);
        let bars = chart_series(&s, &p).savings_projection;
        assert_eq!(bars.categories, vec!["1", "2", "10"]);
        assert_eq!(bars.series[0].values[2], p.ten_years.liquid);
        assert_eq!(bars.series[1].values[0], p.one_year.retirement_total);
    }

    #[test]
    fn test_svg_renderer_outputs_decodable_svg() {
        let s = snapshot(10.0, 5.0);
        let charts = SvgRenderer::default()
            .render(&chart_series(&s, &project(&s)))
            .unwrap();

        assert_eq!(charts.len(), 3);
        for key in [EXPENSE_BREAKDOWN, SAVINGS_PROJECTION, RETIREMENT_BREAKDOWN] {
            let bytes = decode_image(&charts[key]).unwrap();
            let svg = String::from_utf8(bytes).unwrap();
            assert!(svg.starts_with("<svg"));
            assert!(svg.ends_with("</svg>"));
        }
    }

    #[test]
    fn test_svg_renderer_handles_negative_savings() {
        let mut s = snapshot(0.0, 0.0);
        s.yearly_liquid_savings = -12000.0;
        let p = project(&s);
        let svg = SvgRenderer::default().bar_svg(&projection_bars(&p));
        assert!(svg.contains("$-120,000"));
    }

    #[test]
    fn test_zero_canvas_is_render_error() {
        let s = snapshot(0.0, 0.0);
        let result = SvgRenderer::new(0, 600).render(&chart_series(&s, &project(&s)));
        assert!(matches!(result, Err(Error::Render(_))));
    }
}
