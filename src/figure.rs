//! Plot objects: declarative chart descriptions built fresh on every
//! binding call and handed to the renderer.
//!
//! The constructors mirror the usual statistical-plot shortcuts: one trace
//! per colour category, axis titles taken from column names, the colour
//! column as legend title.

use indexmap::IndexMap;
use serde::Serialize;

use crate::color::{ColorMap, Rgb};
use crate::data::filter::Subset;
use crate::data::model::{Column, Record, Value};

/// Marker diameter (px) when no size column is given.
const DEFAULT_MARKER_SIZE: f64 = 6.0;

/// Widest integer span that still gets one bin per integer.
const MAX_UNIT_BINS: f64 = 100.0;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    Linear,
    Log,
}

impl AxisScale {
    /// Radio selector label to scale. Anything other than "Linear" is log.
    pub fn from_selector(label: &str) -> Self {
        if label == "Linear" {
            AxisScale::Linear
        } else {
            AxisScale::Log
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    #[serde(rename = "type")]
    pub scale: AxisScale,
}

impl Axis {
    fn linear(title: impl Into<String>) -> Self {
        Axis {
            title: title.into(),
            scale: AxisScale::Linear,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_title: Option<String>,
    /// Requested re-render animation length in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_duration: Option<u32>,
}

// ---------------------------------------------------------------------------
// Traces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    /// Diameter in screen pixels.
    pub size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<String>,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub name: String,
    pub color: Rgb,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    pub x: f64,
    pub y: f64,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub color: Rgb,
    pub segments: Vec<BarSegment>,
}

impl BarTrace {
    /// Segments sharing an x summed into one bar, sorted by x.
    pub fn totals(&self) -> Vec<(f64, f64)> {
        let mut pairs: Vec<(f64, f64)> = self.segments.iter().map(|s| (s.x, s.y)).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut out: Vec<(f64, f64)> = Vec::with_capacity(pairs.len());
        for (x, y) in pairs {
            match out.last_mut() {
                Some(last) if last.0 == x => last.1 += y,
                _ => out.push((x, y)),
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramTrace {
    pub name: String,
    pub color: Rgb,
    pub values: Vec<f64>,
    pub rows: Vec<usize>,
    pub bins: Vec<HistBin>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(ScatterTrace),
    Bar(BarTrace),
    Histogram(HistogramTrace),
}

impl Trace {
    /// Table indices of the rows this trace draws.
    pub fn rows(&self) -> Vec<usize> {
        match self {
            Trace::Scatter(t) => t.markers.iter().map(|m| m.row).collect(),
            Trace::Bar(t) => t.segments.iter().map(|s| s.row).collect(),
            Trace::Histogram(t) => t.rows.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: FigureLayout,
}

impl Figure {
    pub fn update_xaxis(&mut self, title: impl Into<String>, scale: AxisScale) {
        self.layout.xaxis = Axis {
            title: title.into(),
            scale,
        };
    }

    pub fn update_yaxis(&mut self, title: impl Into<String>, scale: AxisScale) {
        self.layout.yaxis = Axis {
            title: title.into(),
            scale,
        };
    }

    pub fn with_transition(mut self, millis: u32) -> Self {
        self.layout.transition_duration = Some(millis);
        self
    }

    /// Every source row drawn by the figure, sorted.
    pub fn rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.data.iter().flat_map(Trace::rows).collect();
        rows.sort_unstable();
        rows
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

type Groups<'a> = IndexMap<Value, Vec<(usize, &'a Record)>>;

/// Split rows by the colour column, categories in first-appearance order.
/// Without a colour column everything lands in one unnamed group.
fn group_by<'a>(subset: &Subset<'a>, color: Option<Column>) -> Groups<'a> {
    let mut groups: Groups<'a> = IndexMap::new();
    for (i, rec) in subset.iter() {
        let key = match color {
            Some(col) => rec.get(col),
            None => Value::Text(String::new()),
        };
        groups.entry(key).or_default().push((i, rec));
    }
    groups
}

fn group_color(subset: &Subset<'_>, color: Option<Column>) -> impl Fn(&Value) -> Rgb {
    let map = color.map(|col| ColorMap::new(subset.table().option_list(col)));
    move |v: &Value| map.as_ref().map_or(Rgb::DEFAULT, |m| m.color_for(v))
}

#[derive(Debug, Clone)]
pub struct ScatterSpec {
    pub x: Column,
    pub y: Column,
    pub size: Option<Column>,
    pub color: Option<Column>,
    pub hover_name: Option<Column>,
    pub log_x: bool,
    /// Largest marker diameter in pixels.
    pub size_max: f64,
}

/// Scatter / bubble chart.
///
/// Marker areas are proportional to the size column: with
/// `sizeref = 2 * max / size_max²` a value `v` is drawn with diameter
/// `sqrt(v / sizeref)`.
pub fn scatter(subset: &Subset<'_>, spec: &ScatterSpec) -> Figure {
    let sizeref = spec.size.and_then(|col| {
        let max = subset
            .iter()
            .filter_map(|(_, r)| r.number(col))
            .fold(f64::NEG_INFINITY, f64::max);
        (max > 0.0).then(|| 2.0 * max / (spec.size_max * spec.size_max))
    });
    let color_of = group_color(subset, spec.color);

    let data = group_by(subset, spec.color)
        .into_iter()
        .map(|(key, rows)| {
            let markers = rows
                .into_iter()
                .filter_map(|(row, rec)| {
                    let size = match (spec.size, sizeref) {
                        (Some(col), Some(sr)) => (rec.number(col)?.max(0.0) / sr).sqrt(),
                        _ => DEFAULT_MARKER_SIZE,
                    };
                    Some(Marker {
                        x: rec.number(spec.x)?,
                        y: rec.number(spec.y)?,
                        size,
                        hover: spec.hover_name.map(|c| rec.get(c).to_string()),
                        row,
                    })
                })
                .collect();
            Trace::Scatter(ScatterTrace {
                name: key.to_string(),
                color: color_of(&key),
                markers,
            })
        })
        .collect();

    Figure {
        data,
        layout: FigureLayout {
            title: None,
            xaxis: Axis {
                title: spec.x.name().to_string(),
                scale: if spec.log_x { AxisScale::Log } else { AxisScale::Linear },
            },
            yaxis: Axis::linear(spec.y.name()),
            legend_title: spec.color.map(|c| c.name().to_string()),
            transition_duration: None,
        },
    }
}

#[derive(Debug, Clone)]
pub struct BarSpec {
    pub x: Column,
    pub y: Column,
    pub color: Option<Column>,
    pub title: Option<String>,
}

/// Bar chart with one segment per row; segments at the same x stack.
pub fn bar(subset: &Subset<'_>, spec: &BarSpec) -> Figure {
    let color_of = group_color(subset, spec.color);
    let data = group_by(subset, spec.color)
        .into_iter()
        .map(|(key, rows)| {
            let segments = rows
                .into_iter()
                .filter_map(|(row, rec)| {
                    Some(BarSegment {
                        x: rec.number(spec.x)?,
                        y: rec.number(spec.y)?,
                        row,
                    })
                })
                .collect();
            Trace::Bar(BarTrace {
                name: key.to_string(),
                color: color_of(&key),
                segments,
            })
        })
        .collect();

    Figure {
        data,
        layout: FigureLayout {
            title: spec.title.clone(),
            xaxis: Axis::linear(spec.x.name()),
            yaxis: Axis::linear(spec.y.name()),
            legend_title: spec.color.map(|c| c.name().to_string()),
            transition_duration: None,
        },
    }
}

#[derive(Debug, Clone)]
pub struct HistogramSpec {
    pub x: Column,
    pub title: Option<String>,
}

/// Count histogram of one numeric column.
pub fn histogram(subset: &Subset<'_>, spec: &HistogramSpec) -> Figure {
    let (rows, values): (Vec<usize>, Vec<f64>) = subset
        .iter()
        .filter_map(|(i, r)| r.number(spec.x).map(|v| (i, v)))
        .unzip();
    let bins = histogram_bins(&values);

    Figure {
        data: vec![Trace::Histogram(HistogramTrace {
            name: spec.x.name().to_string(),
            color: Rgb::DEFAULT,
            values,
            rows,
            bins,
        })],
        layout: FigureLayout {
            title: spec.title.clone(),
            xaxis: Axis::linear(spec.x.name()),
            yaxis: Axis::linear("count"),
            legend_title: None,
            transition_duration: None,
        },
    }
}

/// Integer data spanning at most [`MAX_UNIT_BINS`] values gets unit bins
/// centred on each integer; anything else is split into Sturges'
/// `ceil(log2 n) + 1` equal-width bins.
pub fn histogram_bins(values: &[f64]) -> Vec<HistBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let Some(&first) = finite.first() else {
        return Vec::new();
    };
    let (min, max) = finite
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let integral = finite.iter().all(|v| v.fract() == 0.0);
    let (start, width, n_bins) = if integral && max - min < MAX_UNIT_BINS {
        (min - 0.5, 1.0, (max - min) as usize + 1)
    } else if max == min {
        (min - 0.5, 1.0, 1)
    } else {
        let k = (finite.len() as f64).log2().ceil() as usize + 1;
        (min, (max - min) / k as f64, k)
    };

    let mut bins: Vec<HistBin> = (0..n_bins)
        .map(|i| HistBin {
            start: start + i as f64 * width,
            end: start + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for v in finite {
        let idx = (((v - start) / width).floor() as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::data::filter::Predicate;
    use crate::data::model::tests::sample_table;

    fn bubble_spec() -> ScatterSpec {
        ScatterSpec {
            x: Column::Age,
            y: Column::MonthlyIncome,
            size: Some(Column::JobLevel),
            color: Some(Column::EducationField),
            hover_name: Some(Column::Attrition),
            log_x: true,
            size_max: 55.0,
        }
    }

    #[test]
    fn scatter_groups_by_colour_in_appearance_order() {
        let table = sample_table();
        let subset = Subset::new(&table, &[]);
        let fig = scatter(&subset, &bubble_spec());
        let names: Vec<&str> = fig
            .data
            .iter()
            .map(|t| match t {
                Trace::Scatter(s) => s.name.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, ["Life Sciences", "Other", "Medical", "Marketing", "Human Resources"]);
        assert_eq!(fig.rows(), (0..table.len()).collect::<Vec<_>>());
        assert_eq!(fig.layout.xaxis.scale, AxisScale::Log);
        assert_eq!(fig.layout.xaxis.title, "Age");
        assert_eq!(fig.layout.yaxis.title, "MonthlyIncome");
        assert_eq!(fig.layout.legend_title.as_deref(), Some("EducationField"));
    }

    #[test]
    fn scatter_marker_area_tracks_size_column() {
        let table = sample_table();
        let subset = Subset::new(&table, &[]);
        let fig = scatter(&subset, &bubble_spec());
        let markers: Vec<&Marker> = fig
            .data
            .iter()
            .flat_map(|t| match t {
                Trace::Scatter(s) => s.markers.iter(),
                _ => unreachable!(),
            })
            .collect();
        let max_level = table.records().iter().map(|r| r.job_level).max().unwrap() as f64;
        let biggest = markers.iter().map(|m| m.size).fold(0.0, f64::max);
        assert_relative_eq!(biggest, 55.0 / 2f64.sqrt(), epsilon = 1e-9);
        for m in markers {
            let level = table.records()[m.row].job_level as f64;
            assert_relative_eq!(m.size * m.size, biggest * biggest * level / max_level, epsilon = 1e-6);
            assert_eq!(m.hover.as_deref(), Some(table.records()[m.row].attrition.as_str()));
        }
    }

    #[test]
    fn empty_subset_renders_without_points() {
        let table = sample_table();
        let subset = Subset::new(&table, &[Predicate::equals(Column::WorkLifeBalance, 9)]);
        let fig = scatter(&subset, &bubble_spec());
        assert!(fig.data.is_empty());
        assert!(fig.rows().is_empty());
    }

    #[test]
    fn bar_segments_stack_per_x() {
        let table = sample_table();
        let subset = Subset::new(&table, &[Predicate::equals(Column::JobRole, "Laboratory Technician")]);
        let fig = bar(
            &subset,
            &BarSpec {
                x: Column::JobSatisfaction,
                y: Column::DistanceFromHome,
                color: Some(Column::Gender),
                title: Some("Laboratory Technician".into()),
            },
        );
        let mut total_height = 0.0;
        for trace in &fig.data {
            let Trace::Bar(b) = trace else { panic!("bar trace expected") };
            let summed: f64 = b.segments.iter().map(|s| s.y).sum();
            let totals = b.totals();
            assert!(totals.windows(2).all(|w| w[0].0 < w[1].0));
            assert_relative_eq!(totals.iter().map(|t| t.1).sum::<f64>(), summed);
            total_height += summed;
        }
        let expected: f64 = subset.iter().map(|(_, r)| r.distance_from_home as f64).sum();
        assert_relative_eq!(total_height, expected);
        assert_eq!(fig.layout.title.as_deref(), Some("Laboratory Technician"));
    }

    #[test]
    fn integer_histogram_uses_unit_bins() {
        let bins = histogram_bins(&[1.0, 2.0, 2.0, 4.0]);
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, [1, 2, 0, 1]);
        assert_relative_eq!(bins[0].start, 0.5);
        assert_relative_eq!(bins[3].end, 4.5);
    }

    #[test]
    fn wide_integer_spread_falls_back_to_sturges() {
        let bins = histogram_bins(&[1.0, 2_000_000.0]);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), [1, 1]);

        let extreme = histogram_bins(&[i64::MIN as f64, 0.0, i64::MAX as f64]);
        assert_eq!(extreme.len(), 3);
        assert_eq!(extreme.iter().map(|b| b.count).sum::<usize>(), 3);

        // 100 distinct integers is the last span drawn one bin per value.
        let hundred: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(histogram_bins(&hundred).len(), 100);
    }

    #[test]
    fn fractional_histogram_uses_sturges() {
        let values: Vec<f64> = (0..16).map(|i| i as f64 * 0.5).collect();
        let bins = histogram_bins(&values);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 16);
        assert!(histogram_bins(&[]).is_empty());
    }

    #[test]
    fn figure_serialises_axis_type() {
        let table = sample_table();
        let subset = Subset::new(&table, &[Predicate::equals(Column::Department, "Sales")]);
        let fig = histogram(
            &subset,
            &HistogramSpec {
                x: Column::JobInvolvement,
                title: Some("Sales".into()),
            },
        );
        let json: serde_json::Value = serde_json::from_str(&fig.to_json().unwrap()).unwrap();
        assert_eq!(json["layout"]["xaxis"]["type"], "linear");
        assert_eq!(json["layout"]["title"], "Sales");
        assert_eq!(json["data"][0]["type"], "histogram");
    }
}
