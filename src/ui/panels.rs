use eframe::egui::{self, Align, Color32, Layout, RichText, Ui};

use crate::context::DashboardContext;
use crate::data::model::Value;
use crate::layout::Component;
use crate::state::AppState;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Page – walks the layout tree
// ---------------------------------------------------------------------------

/// Render the whole page described by `layout`.
pub fn page(ui: &mut Ui, layout: &Component, state: &mut AppState, graph_height: f32) {
    render_node(ui, layout, state, graph_height);
}

fn render_node(ui: &mut Ui, node: &Component, state: &mut AppState, graph_height: f32) {
    match node {
        Component::Div { children, .. } => render_children(ui, children, state, graph_height),
        Component::Heading { text } => {
            ui.heading(text);
        }
        Component::Dropdown { id, options, .. } => dropdown(ui, *id, options, state),
        Component::RadioItems {
            id, options, inline, ..
        } => radio_items(ui, *id, options, *inline, state),
        Component::Slider { id, marks, .. } => mark_slider(ui, *id, marks, state),
        Component::Graph { id } => plot::graph(ui, *id, state.output(id), graph_height),
    }
}

fn width_share(node: &Component) -> Option<(f32, bool)> {
    match node {
        Component::Div { style, .. } => style.width.map(|w| (w, style.float_right)),
        _ => None,
    }
}

/// Children with a width share are grouped into rows of columns; the rest
/// stack vertically.
fn render_children(ui: &mut Ui, children: &[Component], state: &mut AppState, graph_height: f32) {
    let mut i = 0;
    while i < children.len() {
        if width_share(&children[i]).is_none() {
            render_node(ui, &children[i], state, graph_height);
            i += 1;
            continue;
        }
        let start = i;
        while i < children.len() && width_share(&children[i]).is_some() {
            i += 1;
        }
        let row = &children[start..i];
        let total = ui.available_width();
        ui.columns(row.len(), |cols: &mut [Ui]| {
            for (col, child) in cols.iter_mut().zip(row) {
                let Some((share, float_right)) = width_share(child) else {
                    continue;
                };
                col.set_max_width(total * share);
                let align = if float_right { Align::Max } else { Align::Min };
                col.with_layout(Layout::top_down_justified(align), |ui: &mut Ui| {
                    render_node(ui, child, state, graph_height);
                });
            }
        });
        ui.add_space(6.0);
    }
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

fn dropdown(ui: &mut Ui, id: &'static str, options: &[String], state: &mut AppState) {
    let current = state.controls.get(id).map(Value::to_string).unwrap_or_default();
    let mut selected = current.clone();
    egui::ComboBox::from_id_salt(id)
        .selected_text(&selected)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for opt in options {
                ui.selectable_value(&mut selected, opt.clone(), opt);
            }
        });
    if selected != current {
        state.set_control(id, Value::Text(selected));
    }
}

fn radio_items(ui: &mut Ui, id: &'static str, options: &[String], inline: bool, state: &mut AppState) {
    let current = state.controls.get(id).map(Value::to_string).unwrap_or_default();
    let mut selected = current.clone();
    let mut add = |ui: &mut Ui| {
        for opt in options {
            ui.radio_value(&mut selected, opt.clone(), opt);
        }
    };
    if inline {
        ui.horizontal(|ui: &mut Ui| add(ui));
    } else {
        ui.vertical(|ui: &mut Ui| add(ui));
    }
    if selected != current {
        state.set_control(id, Value::Text(selected));
    }
}

/// Slider that only stops on `marks`, with the marks listed underneath.
fn mark_slider(ui: &mut Ui, id: &'static str, marks: &[i64], state: &mut AppState) {
    if marks.is_empty() {
        ui.label(RichText::new("no levels in dataset").weak());
        return;
    }
    let current = state.controls.get(id).and_then(Value::as_i64);
    let mut idx = current
        .and_then(|v| marks.iter().position(|&m| m == v))
        .unwrap_or(0);

    let width = ui.available_width();
    ui.spacing_mut().slider_width = width;
    ui.add(
        egui::Slider::new(&mut idx, 0..=marks.len() - 1)
            .show_value(false)
            .step_by(1.0),
    );
    ui.horizontal(|ui: &mut Ui| {
        for (i, mark) in marks.iter().enumerate() {
            if ui.selectable_label(i == idx, mark.to_string()).clicked() {
                idx = i;
            }
        }
    });

    if current != Some(marks[idx]) {
        state.set_control(id, Value::Integer(marks[idx]));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, context: &DashboardContext, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Figures", |ui: &mut Ui| {
            for id in context.layout().graph_ids() {
                let figure = state.output(id).and_then(|o| o.figure.as_ref().ok());
                let clicked = ui
                    .add_enabled(figure.is_some(), egui::Button::new(format!("Copy {id} JSON")))
                    .clicked();
                if let (true, Some(fig)) = (clicked, figure) {
                    match fig.to_json() {
                        Ok(json) => {
                            ui.ctx().copy_text(json);
                            state.status_message = None;
                        }
                        Err(e) => {
                            log::error!("Failed to serialise {id}: {e}");
                            state.status_message = Some(format!("Error: {e}"));
                        }
                    }
                    ui.close_menu();
                }
            }
        });

        ui.separator();

        let table = context.table();
        if table.is_empty() {
            ui.label(RichText::new("dataset has no rows").weak());
        } else {
            ui.label(format!("{} employees loaded", table.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
