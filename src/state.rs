use std::collections::{BTreeMap, BTreeSet};

use crate::bindings::{self, BindingError};
use crate::context::DashboardContext;
use crate::data::model::Value;
use crate::figure::Figure;
use crate::layout::Component;

// ---------------------------------------------------------------------------
// Control state
// ---------------------------------------------------------------------------

/// Current value of every input control, seeded from the layout defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlState {
    values: BTreeMap<&'static str, Option<Value>>,
}

impl ControlState {
    pub fn from_layout(layout: &Component) -> Self {
        ControlState {
            values: layout.controls().into_iter().collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id).and_then(Option::as_ref)
    }

    /// Store a new value. Returns whether it differs from the current one;
    /// unknown ids are ignored.
    pub fn set(&mut self, id: &str, value: Value) -> bool {
        match self.values.get_mut(id) {
            Some(slot) if slot.as_ref() != Some(&value) => {
                *slot = Some(value);
                true
            }
            _ => false,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Latest output of one graph's callback.
#[derive(Debug, Clone)]
pub struct GraphOutput {
    pub figure: Result<Figure, BindingError>,
    /// Bumped on every re-render; drives transition animations.
    pub generation: u64,
}

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    pub controls: ControlState,

    /// Last figure delivered to each graph.
    pub outputs: BTreeMap<&'static str, GraphOutput>,

    /// Controls changed since the last dispatch.
    dirty: BTreeSet<&'static str>,

    /// Status message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Seed controls from the layout and mark all of them changed so the
    /// first frame renders every graph.
    pub fn new(ctx: &DashboardContext) -> Self {
        let controls = ControlState::from_layout(ctx.layout());
        let dirty = controls.ids().collect();
        AppState {
            controls,
            outputs: BTreeMap::new(),
            dirty,
            status_message: None,
        }
    }

    /// Record a control change coming from the UI.
    pub fn set_control(&mut self, id: &'static str, value: Value) {
        if self.controls.set(id, value) {
            self.dirty.insert(id);
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Run every callback bound to a changed control and store the results.
    pub fn flush(&mut self, ctx: &DashboardContext) {
        if self.dirty.is_empty() {
            return;
        }
        let changed = std::mem::take(&mut self.dirty);
        for (output, figure) in bindings::dispatch(ctx, &self.controls, &changed) {
            let generation = self.outputs.get(output).map_or(0, |o| o.generation + 1);
            self.outputs.insert(output, GraphOutput { figure, generation });
        }
    }

    pub fn output(&self, graph_id: &str) -> Option<&GraphOutput> {
        self.outputs.get(graph_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_table;
    use crate::layout::ids;

    #[test]
    fn first_flush_renders_every_graph() {
        let ctx = DashboardContext::new(sample_table());
        let mut state = AppState::new(&ctx);
        assert!(state.has_pending());
        state.flush(&ctx);
        assert!(!state.has_pending());
        for id in ctx.layout().graph_ids() {
            let out = state.output(id).unwrap();
            assert!(out.figure.is_ok());
            assert_eq!(out.generation, 0);
        }
    }

    #[test]
    fn only_dependent_graphs_rerender() {
        let ctx = DashboardContext::new(sample_table());
        let mut state = AppState::new(&ctx);
        state.flush(&ctx);

        state.set_control(ids::JOB_ROLE, Value::from("Research Scientist"));
        state.flush(&ctx);
        assert_eq!(state.output(ids::COMPETENCIES).unwrap().generation, 1);
        assert_eq!(state.output(ids::LOCATION_GRAPHIC).unwrap().generation, 0);
        assert_eq!(state.output(ids::INDICATOR_GRAPHIC).unwrap().generation, 0);
    }

    #[test]
    fn unchanged_value_does_not_fire() {
        let ctx = DashboardContext::new(sample_table());
        let mut state = AppState::new(&ctx);
        state.flush(&ctx);
        state.set_control(ids::DEPARTMENT, Value::from("Sales"));
        assert!(!state.has_pending());
    }

    #[test]
    fn unknown_control_is_ignored() {
        let ctx = DashboardContext::new(sample_table());
        let mut controls = ControlState::from_layout(ctx.layout());
        assert!(!controls.set("no-such-control", Value::Integer(1)));
        assert_eq!(controls.get("no-such-control"), None);
    }
}
