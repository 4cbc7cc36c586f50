use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoint, PlotUi, Points};

use crate::color::Rgb;
use crate::figure::{AxisScale, BarTrace, Figure, HistogramTrace, Marker, ScatterTrace, Trace};
use crate::state::GraphOutput;

/// Bubble fill opacity.
const MARKER_ALPHA: u8 = 190;

fn color32(c: Rgb, alpha: u8) -> Color32 {
    let [r, g, b] = c.0;
    Color32::from_rgba_unmultiplied(r, g, b, alpha)
}

/// Position on a plot axis. Log axes plot `log10(v)` and have no place for
/// non-positive values.
fn to_axis(v: f64, scale: AxisScale) -> Option<f64> {
    match scale {
        AxisScale::Linear => Some(v),
        AxisScale::Log if v > 0.0 => Some(v.log10()),
        AxisScale::Log => None,
    }
}

fn from_axis(v: f64, scale: AxisScale) -> f64 {
    match scale {
        AxisScale::Linear => v,
        AxisScale::Log => 10f64.powf(v),
    }
}

fn format_number(n: f64) -> String {
    if n.abs() >= 100.0 {
        format!("{n:.0}")
    } else if n.abs() >= 1.0 {
        format!("{n:.1}")
    } else {
        format!("{n:.3}")
    }
}

fn log_tick(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    format_number(from_axis(mark.value, AxisScale::Log))
}

// ---------------------------------------------------------------------------
// Graph placeholder
// ---------------------------------------------------------------------------

/// Render a graph slot: its latest figure or the callback's error.
pub fn graph(ui: &mut Ui, id: &'static str, output: Option<&GraphOutput>, height: f32) {
    let Some(output) = output else {
        ui.add_space(height);
        return;
    };
    match &output.figure {
        Ok(figure) => figure_plot(ui, id, figure, output.generation, height),
        Err(e) => {
            ui.label(RichText::new(format!("Callback error: {e}")).color(Color32::RED));
            ui.add_space(height);
        }
    }
}

/// 0 → 1 over the figure's transition after each re-render; 1 without one.
fn transition_progress(ui: &Ui, id: &str, generation: u64, duration_ms: Option<u32>) -> f32 {
    let Some(ms) = duration_ms else {
        return 1.0;
    };
    let target = generation as f32;
    let shown = ui
        .ctx()
        .animate_value_with_time(egui::Id::new((id, "transition")), target, ms as f32 / 1000.0);
    (1.0 - (target - shown)).clamp(0.0, 1.0)
}

fn figure_plot(ui: &mut Ui, id: &'static str, fig: &Figure, generation: u64, height: f32) {
    let layout = &fig.layout;
    if let Some(title) = &layout.title {
        ui.strong(title);
    }
    if let Some(legend) = &layout.legend_title {
        ui.small(legend);
    }
    let progress = transition_progress(ui, id, generation, layout.transition_duration);
    let (xs, ys) = (layout.xaxis.scale, layout.yaxis.scale);

    let mut plot = Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .x_axis_label(layout.xaxis.title.as_str())
        .y_axis_label(layout.yaxis.title.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .label_formatter(move |name: &str, value: &PlotPoint| hover_text(fig, name, value, xs, ys));
    if xs == AxisScale::Log {
        plot = plot.x_axis_formatter(log_tick);
    }
    if ys == AxisScale::Log {
        plot = plot.y_axis_formatter(log_tick);
    }

    let bar_traces: Vec<&BarTrace> = fig
        .data
        .iter()
        .filter_map(|t| match t {
            Trace::Bar(b) => Some(b),
            _ => None,
        })
        .collect();
    let stacks = stack_bars(&bar_traces);

    plot.show(ui, |plot_ui: &mut PlotUi| {
        for trace in &fig.data {
            match trace {
                Trace::Scatter(t) => draw_scatter(plot_ui, t, xs, ys, progress),
                Trace::Histogram(t) => plot_ui.bar_chart(histogram_chart(t)),
                Trace::Bar(_) => {}
            }
        }
        for (trace, stack) in bar_traces.iter().zip(&stacks) {
            plot_ui.bar_chart(bar_chart(trace, stack));
        }
    });
}

// ---------------------------------------------------------------------------
// Traces
// ---------------------------------------------------------------------------

/// Markers sharing a diameter are drawn as one `Points` item.
fn draw_scatter(plot_ui: &mut PlotUi, trace: &ScatterTrace, xs: AxisScale, ys: AxisScale, progress: f32) {
    let mut by_size: BTreeMap<u64, (f64, Vec<[f64; 2]>)> = BTreeMap::new();
    for m in &trace.markers {
        let (Some(x), Some(y)) = (to_axis(m.x, xs), to_axis(m.y, ys)) else {
            continue;
        };
        by_size
            .entry(m.size.to_bits())
            .or_insert_with(|| (m.size, Vec::new()))
            .1
            .push([x, y]);
    }
    for (size, points) in by_size.into_values() {
        plot_ui.points(
            Points::new(points)
                .name(&trace.name)
                .color(color32(trace.color, MARKER_ALPHA))
                .filled(true)
                .radius(size as f32 / 2.0 * progress),
        );
    }
}

/// One bar in a stack: its x, where it starts, and its height.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StackedBar {
    x: f64,
    base: f64,
    height: f64,
}

/// Stack the traces in order, each bar resting on whatever the earlier
/// traces put at the same x.
fn stack_bars(traces: &[&BarTrace]) -> Vec<Vec<StackedBar>> {
    let mut tops: BTreeMap<u64, f64> = BTreeMap::new();
    traces
        .iter()
        .map(|trace| {
            trace
                .totals()
                .into_iter()
                .map(|(x, height)| {
                    let top = tops.entry(x.to_bits()).or_insert(0.0);
                    let bar = StackedBar { x, base: *top, height };
                    *top += height;
                    bar
                })
                .collect()
        })
        .collect()
}

fn bar_chart(trace: &BarTrace, stack: &[StackedBar]) -> BarChart {
    let color = color32(trace.color, 255);
    let bars = stack
        .iter()
        .map(|b| Bar::new(b.x, b.height).base_offset(b.base).width(0.8).fill(color))
        .collect();
    BarChart::new(bars).name(&trace.name).color(color)
}

fn histogram_chart(trace: &HistogramTrace) -> BarChart {
    let color = color32(trace.color, 255);
    let bars = trace
        .bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width((b.end - b.start) * 0.95)
                .fill(color)
        })
        .collect();
    BarChart::new(bars).name(&trace.name).color(color)
}

// ---------------------------------------------------------------------------
// Hover
// ---------------------------------------------------------------------------

/// Closest marker of the named scatter trace to a point in plot space.
fn nearest_marker<'f>(fig: &'f Figure, name: &str, at: &PlotPoint, xs: AxisScale, ys: AxisScale) -> Option<&'f Marker> {
    fig.data
        .iter()
        .filter_map(|t| match t {
            Trace::Scatter(s) if s.name == name => Some(s),
            _ => None,
        })
        .flat_map(|s| s.markers.iter())
        .filter_map(|m| {
            let dx = to_axis(m.x, xs)? - at.x;
            let dy = to_axis(m.y, ys)? - at.y;
            Some((m, dx * dx + dy * dy))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(m, _)| m)
}

fn hover_text(fig: &Figure, name: &str, at: &PlotPoint, xs: AxisScale, ys: AxisScale) -> String {
    let x_title = &fig.layout.xaxis.title;
    let y_title = &fig.layout.yaxis.title;
    match nearest_marker(fig, name, at, xs, ys) {
        Some(m) => {
            let header = m.hover.as_deref().unwrap_or(name);
            format!(
                "{header}\n{name}\n{x_title}={}\n{y_title}={}",
                format_number(m.x),
                format_number(m.y)
            )
        }
        None => format!(
            "{x_title}={}\n{y_title}={}",
            format_number(from_axis(at.x, xs)),
            format_number(from_axis(at.y, ys))
        ),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::bindings::{competencies_bar, indicator_scatter};
    use crate::context::DashboardContext;
    use crate::data::model::tests::sample_table;

    #[test]
    fn log_axis_drops_non_positive() {
        assert_eq!(to_axis(-1.0, AxisScale::Log), None);
        assert_eq!(to_axis(0.0, AxisScale::Log), None);
        assert_relative_eq!(to_axis(1000.0, AxisScale::Log).unwrap(), 3.0);
        assert_relative_eq!(from_axis(2.0, AxisScale::Log), 100.0, epsilon = 1e-9);
        assert_eq!(to_axis(-1.0, AxisScale::Linear), Some(-1.0));
    }

    #[test]
    fn numbers_are_shortened() {
        assert_eq!(format_number(15427.0), "15427");
        assert_eq!(format_number(31.62), "31.6");
        assert_eq!(format_number(0.5), "0.500");
    }

    #[test]
    fn hover_reports_nearest_marker_label() {
        let ctx = DashboardContext::new(sample_table());
        let fig = indicator_scatter(&ctx, "Age", "MonthlyIncome", "Log", "Linear", 4);
        // Only one employee has WorkLifeBalance 4: age 34, income 19973, "No".
        let at = PlotPoint::new(34f64.log10(), 19000.0);
        let text = hover_text(&fig, "Medical", &at, AxisScale::Log, AxisScale::Linear);
        assert!(text.starts_with("No\nMedical"), "{text}");
        assert!(text.contains("MonthlyIncome=19973"));
    }

    #[test]
    fn hover_off_marker_shows_coordinates() {
        let ctx = DashboardContext::new(sample_table());
        let fig = indicator_scatter(&ctx, "Age", "Income", "Log", "Linear", 4);
        let text = hover_text(&fig, "", &PlotPoint::new(2.0, 5.0), AxisScale::Log, AxisScale::Linear);
        assert_eq!(text, "Age=100\nIncome=5.0");
    }

    #[test]
    fn bars_stack_by_x_across_disjoint_traces() {
        let ctx = DashboardContext::new(sample_table());
        let fig = competencies_bar(&ctx, "Manager");
        let traces: Vec<&BarTrace> = fig
            .data
            .iter()
            .filter_map(|t| match t {
                Trace::Bar(b) => Some(b),
                _ => None,
            })
            .collect();
        let stacks = stack_bars(&traces);

        // Female managers sit at JobSatisfaction 4, the male one at 2.
        assert_eq!(traces[0].name, "Female");
        assert_eq!(stacks[0], [StackedBar { x: 4.0, base: 0.0, height: 29.0 }]);
        assert_eq!(traces[1].name, "Male");
        assert_eq!(stacks[1], [StackedBar { x: 2.0, base: 0.0, height: 6.0 }]);

        let tallest = stacks.iter().flatten().map(|b| b.base + b.height).fold(0.0, f64::max);
        assert_relative_eq!(tallest, 29.0);
    }

    #[test]
    fn bars_at_shared_x_rest_on_earlier_traces() {
        let trace = |name: &str, xs: &[(f64, f64)]| BarTrace {
            name: name.to_string(),
            color: Rgb::DEFAULT,
            segments: xs
                .iter()
                .enumerate()
                .map(|(row, &(x, y))| crate::figure::BarSegment { x, y, row })
                .collect(),
        };
        let a = trace("a", &[(1.0, 2.0), (3.0, 5.0)]);
        let b = trace("b", &[(2.0, 4.0), (3.0, 1.0), (3.0, 1.0)]);
        let stacks = stack_bars(&[&a, &b]);
        assert_eq!(
            stacks[1],
            [
                StackedBar { x: 2.0, base: 0.0, height: 4.0 },
                StackedBar { x: 3.0, base: 5.0, height: 2.0 },
            ]
        );
    }
}
