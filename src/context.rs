use crate::data::model::RecordTable;
use crate::layout::{build_layout, Component};

/// Everything the bindings read: the loaded table and the page built from
/// it. Constructed once at start-up and only ever borrowed immutably.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    table: RecordTable,
    layout: Component,
}

impl DashboardContext {
    pub fn new(table: RecordTable) -> Self {
        let layout = build_layout(&table);
        DashboardContext { table, layout }
    }

    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    pub fn layout(&self) -> &Component {
        &self.layout
    }
}
