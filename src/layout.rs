use serde::Serialize;

use crate::data::model::{Column, ColumnKind, RecordTable, Value};

/// Control and graph identifiers shared by the layout and the callback table.
pub mod ids {
    pub const XAXIS_COLUMN: &str = "xaxis-column";
    pub const XAXIS_TYPE: &str = "xaxis-type";
    pub const YAXIS_COLUMN: &str = "yaxis-column";
    pub const YAXIS_TYPE: &str = "yaxis-type";
    pub const INDICATOR_LEVEL: &str = "indicator-level";
    pub const WLB_LEVEL: &str = "wlb-level";
    pub const JOB_ROLE: &str = "job-role";
    pub const DEPARTMENT: &str = "department";

    pub const INDICATOR_GRAPHIC: &str = "indicator-graphic";
    pub const GRAPH_WITH_SLIDER: &str = "graph-with-slider";
    pub const COMPETENCIES: &str = "competencies";
    pub const LOCATION_GRAPHIC: &str = "location-graphic";
}

pub const JOB_TITLES: [&str; 9] = [
    "Sales Executive",
    "Research Scientist",
    "Laboratory Technician",
    "Manufacturing Director",
    "Healthcare Representative",
    "Manager",
    "Sales Representative",
    "Research Director",
    "Human Resources",
];

pub const DEPARTMENTS: [&str; 3] = ["Sales", "Research & Development", "Human Resources"];

pub const AXIS_TYPES: [&str; 2] = ["Linear", "Log"];

// ---------------------------------------------------------------------------
// Component tree
// ---------------------------------------------------------------------------

/// Sizing hints for a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Style {
    /// Share of the parent's width, `0.0..=1.0`. Siblings with a width are
    /// laid out side by side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    pub float_right: bool,
}

/// One node of the static page description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "component")]
pub enum Component {
    Div {
        style: Style,
        children: Vec<Component>,
    },
    Heading {
        text: String,
    },
    Dropdown {
        id: &'static str,
        options: Vec<String>,
        value: String,
    },
    RadioItems {
        id: &'static str,
        options: Vec<String>,
        value: String,
        inline: bool,
    },
    /// Snaps to `marks` only. `value` is `None` when there are no marks.
    Slider {
        id: &'static str,
        marks: Vec<i64>,
        value: Option<i64>,
    },
    Graph {
        id: &'static str,
    },
}

impl Component {
    pub fn div(children: Vec<Component>) -> Self {
        Component::Div {
            style: Style::default(),
            children,
        }
    }

    /// Set the width share of a `Div`; no effect on other nodes.
    pub fn width(mut self, share: f32) -> Self {
        if let Component::Div { style, .. } = &mut self {
            style.width = Some(share);
        }
        self
    }

    pub fn float_right(mut self) -> Self {
        if let Component::Div { style, .. } = &mut self {
            style.float_right = true;
        }
        self
    }

    pub fn heading(text: &str) -> Self {
        Component::Heading {
            text: text.to_string(),
        }
    }

    pub fn dropdown<S: ToString>(id: &'static str, options: impl IntoIterator<Item = S>, value: &str) -> Self {
        Component::Dropdown {
            id,
            options: options.into_iter().map(|o| o.to_string()).collect(),
            value: value.to_string(),
        }
    }

    pub fn radio_items(id: &'static str, options: &[&str], value: &str) -> Self {
        Component::RadioItems {
            id,
            options: options.iter().map(|o| o.to_string()).collect(),
            value: value.to_string(),
            inline: true,
        }
    }

    pub fn graph(id: &'static str) -> Self {
        Component::Graph { id }
    }

    /// Visit this node and all descendants depth-first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Component)) {
        visit(self);
        if let Component::Div { children, .. } = self {
            for child in children {
                child.walk(visit);
            }
        }
    }

    /// `(control id, initial value)` for every input control in the tree.
    pub fn controls(&self) -> Vec<(&'static str, Option<Value>)> {
        let mut out = Vec::new();
        self.walk(&mut |node| match node {
            Component::Dropdown { id, value, .. } | Component::RadioItems { id, value, .. } => {
                out.push((*id, Some(Value::Text(value.clone()))))
            }
            Component::Slider { id, value, .. } => out.push((*id, value.map(Value::Integer))),
            _ => {}
        });
        out
    }

    pub fn graph_ids(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let Component::Graph { id } = node {
                out.push(*id);
            }
        });
        out
    }
}

/// Slider over the distinct values of a numeric column.
fn level_slider(table: &RecordTable, id: &'static str, column: Column, start_at_max: bool) -> Component {
    debug_assert_eq!(column.kind(), ColumnKind::Numeric);
    let mut marks: Vec<i64> = table
        .option_list(column)
        .iter()
        .filter_map(Value::as_i64)
        .collect();
    marks.sort_unstable();
    let value = if start_at_max { marks.last() } else { marks.first() }.copied();
    Component::Slider { id, marks, value }
}

fn axis_controls(table: &RecordTable, column_id: &'static str, type_id: &'static str, placeholder: &str) -> Vec<Component> {
    vec![
        Component::dropdown(column_id, table.option_list(Column::JobRole), placeholder),
        Component::radio_items(type_id, &AXIS_TYPES, "Linear"),
    ]
}

/// Build the page. Called once after the table is loaded.
pub fn build_layout(table: &RecordTable) -> Component {
    Component::div(vec![
        Component::div(vec![
            Component::div(axis_controls(table, ids::XAXIS_COLUMN, ids::XAXIS_TYPE, "Holder for X Axis")).width(0.48),
            Component::div(axis_controls(table, ids::YAXIS_COLUMN, ids::YAXIS_TYPE, "Holder for Y Axis"))
                .width(0.48)
                .float_right(),
        ]),
        Component::graph(ids::INDICATOR_GRAPHIC),
        // Marks come from JobInvolvement; the chosen value filters WorkLifeBalance.
        level_slider(table, ids::INDICATOR_LEVEL, Column::JobInvolvement, true),
        Component::div(vec![
            Component::graph(ids::GRAPH_WITH_SLIDER),
            level_slider(table, ids::WLB_LEVEL, Column::WorkLifeBalance, false),
        ]),
        Component::div(vec![
            Component::div(vec![
                Component::heading("Attrition"),
                Component::dropdown(ids::JOB_ROLE, JOB_TITLES, "Manager"),
                Component::graph(ids::COMPETENCIES),
            ])
            .width(0.5),
            Component::div(vec![
                Component::heading("Sales"),
                Component::dropdown(ids::DEPARTMENT, DEPARTMENTS, "Sales"),
                Component::graph(ids::LOCATION_GRAPHIC),
            ])
            .width(0.5),
        ]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_table;

    #[test]
    fn every_control_has_a_default() {
        let layout = build_layout(&sample_table());
        let controls = layout.controls();
        let lookup = |id: &str| controls.iter().find(|(c, _)| *c == id).and_then(|(_, v)| v.clone());

        assert_eq!(controls.len(), 8);
        assert_eq!(lookup(ids::XAXIS_COLUMN), Some(Value::from("Holder for X Axis")));
        assert_eq!(lookup(ids::YAXIS_TYPE), Some(Value::from("Linear")));
        assert_eq!(lookup(ids::JOB_ROLE), Some(Value::from("Manager")));
        assert_eq!(lookup(ids::DEPARTMENT), Some(Value::from("Sales")));
        assert_eq!(lookup(ids::WLB_LEVEL), Some(Value::Integer(1)));
        assert_eq!(lookup(ids::INDICATOR_LEVEL), Some(Value::Integer(4)));
    }

    #[test]
    fn graphs_are_listed_in_page_order() {
        let layout = build_layout(&sample_table());
        assert_eq!(
            layout.graph_ids(),
            [ids::INDICATOR_GRAPHIC, ids::GRAPH_WITH_SLIDER, ids::COMPETENCIES, ids::LOCATION_GRAPHIC]
        );
    }

    #[test]
    fn axis_dropdowns_list_job_roles() {
        let table = sample_table();
        let layout = build_layout(&table);
        let mut options = None;
        layout.walk(&mut |node| {
            if let Component::Dropdown { id, options: o, .. } = node {
                if *id == ids::XAXIS_COLUMN {
                    options = Some(o.clone());
                }
            }
        });
        let options = options.unwrap();
        assert_eq!(options.len(), table.option_list(Column::JobRole).len());
        assert_eq!(options[0], "Sales Executive");
    }

    #[test]
    fn empty_table_gives_unset_sliders() {
        let layout = build_layout(&RecordTable::from_records(Vec::new()));
        let controls = layout.controls();
        let (_, wlb) = controls.iter().find(|(c, _)| *c == ids::WLB_LEVEL).unwrap();
        assert_eq!(*wlb, None);
    }
}
