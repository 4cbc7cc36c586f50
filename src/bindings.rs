//! Chart bindings and the callback table that wires controls to them.
//!
//! Each binding is a pure function of the shared table and the current
//! control values. [`dispatch`] runs the callbacks whose inputs changed.

use std::collections::BTreeSet;

use crate::context::DashboardContext;
use crate::data::filter::{Predicate, Subset};
use crate::data::model::{Column, Value};
use crate::figure::{self, AxisScale, BarSpec, Figure, HistogramSpec, ScatterSpec};
use crate::layout::ids;
use crate::state::ControlState;

/// Largest bubble diameter in the attrition scatters.
pub const SIZE_MAX: f64 = 55.0;

/// Animation length for the slider scatter.
pub const SLIDER_TRANSITION_MS: u32 = 500;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingError {
    #[error("input `{id}` has no value")]
    Missing { id: &'static str },
    #[error("input `{id}` expected {expected}, got `{got}`")]
    WrongType {
        id: &'static str,
        expected: &'static str,
        got: Value,
    },
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// Bubble scatter of employees at one work-life-balance level.
fn attrition_scatter(ctx: &DashboardContext, level: i64) -> Figure {
    let subset = Subset::new(ctx.table(), &[Predicate::equals(Column::WorkLifeBalance, level)]);
    figure::scatter(
        &subset,
        &ScatterSpec {
            x: Column::Age,
            y: Column::MonthlyIncome,
            size: Some(Column::JobLevel),
            color: Some(Column::EducationField),
            hover_name: Some(Column::Attrition),
            log_x: true,
            size_max: SIZE_MAX,
        },
    )
}

/// The axis labels are display-only: the plotted columns stay Age and
/// MonthlyIncome whatever is chosen.
pub fn indicator_scatter(
    ctx: &DashboardContext,
    x_label: &str,
    y_label: &str,
    x_type: &str,
    y_type: &str,
    level: i64,
) -> Figure {
    let mut fig = attrition_scatter(ctx, level);
    fig.update_xaxis(x_label, AxisScale::from_selector(x_type));
    fig.update_yaxis(y_label, AxisScale::from_selector(y_type));
    fig
}

pub fn slider_scatter(ctx: &DashboardContext, level: i64) -> Figure {
    attrition_scatter(ctx, level).with_transition(SLIDER_TRANSITION_MS)
}

pub fn competencies_bar(ctx: &DashboardContext, title: &str) -> Figure {
    let subset = Subset::new(ctx.table(), &[Predicate::equals(Column::JobRole, title)]);
    figure::bar(
        &subset,
        &BarSpec {
            x: Column::JobSatisfaction,
            y: Column::DistanceFromHome,
            color: Some(Column::Gender),
            title: Some(title.to_string()),
        },
    )
}

pub fn location_histogram(ctx: &DashboardContext, department: &str) -> Figure {
    let subset = Subset::new(ctx.table(), &[Predicate::equals(Column::Department, department)]);
    figure::histogram(
        &subset,
        &HistogramSpec {
            x: Column::JobInvolvement,
            title: Some(department.to_string()),
        },
    )
}

// ---------------------------------------------------------------------------
// Callback table
// ---------------------------------------------------------------------------

/// Input values handed to a handler, in the order its callback lists them.
pub struct Args<'a> {
    ids: &'static [&'static str],
    controls: &'a ControlState,
}

impl<'a> Args<'a> {
    fn value(&self, index: usize) -> Result<(&'static str, &'a Value), BindingError> {
        let id = self.ids[index];
        self.controls
            .get(id)
            .map(|v| (id, v))
            .ok_or(BindingError::Missing { id })
    }

    pub fn text(&self, index: usize) -> Result<&'a str, BindingError> {
        let (id, v) = self.value(index)?;
        v.as_str().ok_or_else(|| BindingError::WrongType {
            id,
            expected: "text",
            got: v.clone(),
        })
    }

    pub fn int(&self, index: usize) -> Result<i64, BindingError> {
        let (id, v) = self.value(index)?;
        v.as_i64().ok_or_else(|| BindingError::WrongType {
            id,
            expected: "integer",
            got: v.clone(),
        })
    }
}

pub type Handler = fn(&DashboardContext, &Args<'_>) -> Result<Figure, BindingError>;

/// One row of the callback table: which graph is redrawn from which controls.
pub struct Callback {
    pub output: &'static str,
    pub inputs: &'static [&'static str],
    handler: Handler,
}

impl Callback {
    pub fn invoke(&self, ctx: &DashboardContext, controls: &ControlState) -> Result<Figure, BindingError> {
        let args = Args {
            ids: self.inputs,
            controls,
        };
        (self.handler)(ctx, &args)
    }

    pub fn depends_on(&self, changed: &BTreeSet<&'static str>) -> bool {
        self.inputs.iter().any(|id| changed.contains(id))
    }
}

fn on_indicator_inputs(ctx: &DashboardContext, args: &Args<'_>) -> Result<Figure, BindingError> {
    Ok(indicator_scatter(
        ctx,
        args.text(0)?,
        args.text(1)?,
        args.text(2)?,
        args.text(3)?,
        args.int(4)?,
    ))
}

fn on_wlb_level(ctx: &DashboardContext, args: &Args<'_>) -> Result<Figure, BindingError> {
    Ok(slider_scatter(ctx, args.int(0)?))
}

fn on_job_role(ctx: &DashboardContext, args: &Args<'_>) -> Result<Figure, BindingError> {
    Ok(competencies_bar(ctx, args.text(0)?))
}

fn on_department(ctx: &DashboardContext, args: &Args<'_>) -> Result<Figure, BindingError> {
    Ok(location_histogram(ctx, args.text(0)?))
}

pub static CALLBACKS: [Callback; 4] = [
    Callback {
        output: ids::INDICATOR_GRAPHIC,
        inputs: &[
            ids::XAXIS_COLUMN,
            ids::YAXIS_COLUMN,
            ids::XAXIS_TYPE,
            ids::YAXIS_TYPE,
            ids::INDICATOR_LEVEL,
        ],
        handler: on_indicator_inputs,
    },
    Callback {
        output: ids::GRAPH_WITH_SLIDER,
        inputs: &[ids::WLB_LEVEL],
        handler: on_wlb_level,
    },
    Callback {
        output: ids::COMPETENCIES,
        inputs: &[ids::JOB_ROLE],
        handler: on_job_role,
    },
    Callback {
        output: ids::LOCATION_GRAPHIC,
        inputs: &[ids::DEPARTMENT],
        handler: on_department,
    },
];

/// Run each callback with an input in `changed`, in table order.
pub fn dispatch(
    ctx: &DashboardContext,
    controls: &ControlState,
    changed: &BTreeSet<&'static str>,
) -> Vec<(&'static str, Result<Figure, BindingError>)> {
    CALLBACKS
        .iter()
        .filter(|cb| cb.depends_on(changed))
        .map(|cb| {
            let result = cb.invoke(ctx, controls);
            match &result {
                Ok(fig) => log::debug!("{} redrawn from {} rows", cb.output, fig.rows().len()),
                Err(e) => log::warn!("{} callback failed: {e}", cb.output),
            }
            (cb.output, result)
        })
        .collect()
}
