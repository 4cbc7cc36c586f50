use super::model::{Column, Record, RecordTable, Value};

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

/// A boolean mask over rows, built from control values.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Column equals the value.
    Eq(Column, Value),
}

impl Predicate {
    pub fn equals(column: Column, value: impl Into<Value>) -> Self {
        Predicate::Eq(column, value.into())
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::Eq(col, value) => record.get(*col) == *value,
        }
    }
}

/// Indices of rows passing every predicate. No predicates keeps every row.
pub fn filtered_indices(table: &RecordTable, predicates: &[Predicate]) -> Vec<usize> {
    table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| predicates.iter().all(|p| p.matches(rec)))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Subset – a filtered, borrowed view of the table
// ---------------------------------------------------------------------------

/// Rows of a [`RecordTable`] selected by a filter, in table order.
#[derive(Debug, Clone)]
pub struct Subset<'a> {
    table: &'a RecordTable,
    indices: Vec<usize>,
}

impl<'a> Subset<'a> {
    pub fn new(table: &'a RecordTable, predicates: &[Predicate]) -> Self {
        Subset {
            table,
            indices: filtered_indices(table, predicates),
        }
    }

    pub fn table(&self) -> &'a RecordTable {
        self.table
    }

    /// `(table index, row)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a Record)> + '_ {
        let records = self.table.records();
        self.indices.iter().map(move |&i| (i, &records[i]))
    }
}
