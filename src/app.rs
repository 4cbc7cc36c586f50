use eframe::egui;

use crate::config::DashboardConfig;
use crate::context::DashboardContext;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AttritionDashApp {
    context: DashboardContext,
    state: AppState,
    graph_height: f32,
}

impl AttritionDashApp {
    pub fn new(context: DashboardContext, config: &DashboardConfig) -> Self {
        let state = AppState::new(&context);
        Self {
            context,
            state,
            graph_height: config.graph_height,
        }
    }
}

impl eframe::App for AttritionDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Control changes from the previous frame fire their callbacks now.
        self.state.flush(&self.context);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.context, &mut self.state);
        });

        // ---- Central panel: controls and graphs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::page(ui, self.context.layout(), &mut self.state, self.graph_height);
                });
        });

        if self.state.has_pending() {
            ctx.request_repaint();
        }
    }
}
