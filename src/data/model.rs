use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexSet;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Column – the fixed schema of the attrition dataset
// ---------------------------------------------------------------------------

/// Whether a column holds numbers or category labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// The columns the dashboard reads. Any other CSV column is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Age,
    MonthlyIncome,
    JobLevel,
    JobInvolvement,
    WorkLifeBalance,
    DistanceFromHome,
    JobRole,
    Department,
    EducationField,
    Gender,
    Attrition,
    JobSatisfaction,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::Age,
        Column::MonthlyIncome,
        Column::JobLevel,
        Column::JobInvolvement,
        Column::WorkLifeBalance,
        Column::DistanceFromHome,
        Column::JobRole,
        Column::Department,
        Column::EducationField,
        Column::Gender,
        Column::Attrition,
        Column::JobSatisfaction,
    ];

    /// Header name as it appears in the CSV.
    pub fn name(self) -> &'static str {
        match self {
            Column::Age => "Age",
            Column::MonthlyIncome => "MonthlyIncome",
            Column::JobLevel => "JobLevel",
            Column::JobInvolvement => "JobInvolvement",
            Column::WorkLifeBalance => "WorkLifeBalance",
            Column::DistanceFromHome => "DistanceFromHome",
            Column::JobRole => "JobRole",
            Column::Department => "Department",
            Column::EducationField => "EducationField",
            Column::Gender => "Gender",
            Column::Attrition => "Attrition",
            Column::JobSatisfaction => "JobSatisfaction",
        }
    }

    /// JobSatisfaction is stored as an integer rating but treated as a category.
    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Age
            | Column::MonthlyIncome
            | Column::JobLevel
            | Column::JobInvolvement
            | Column::WorkLifeBalance
            | Column::DistanceFromHome => ColumnKind::Numeric,
            Column::JobRole
            | Column::Department
            | Column::EducationField
            | Column::Gender
            | Column::Attrition
            | Column::JobSatisfaction => ColumnKind::Categorical,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Value – a single cell, also used for control values
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value. Every numeric column in the dataset is
/// integral, so there is no float variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Integer(i64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Integer(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

// ---------------------------------------------------------------------------
// Record – one employee row
// ---------------------------------------------------------------------------

/// One row of the attrition CSV.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    pub age: i64,
    pub monthly_income: i64,
    pub job_level: i64,
    pub job_involvement: i64,
    pub work_life_balance: i64,
    pub distance_from_home: i64,
    pub job_role: String,
    pub department: String,
    pub education_field: String,
    pub gender: String,
    pub attrition: String,
    pub job_satisfaction: i64,
}

impl Record {
    /// Read one column of this row as a [`Value`].
    pub fn get(&self, column: Column) -> Value {
        match column {
            Column::Age => Value::Integer(self.age),
            Column::MonthlyIncome => Value::Integer(self.monthly_income),
            Column::JobLevel => Value::Integer(self.job_level),
            Column::JobInvolvement => Value::Integer(self.job_involvement),
            Column::WorkLifeBalance => Value::Integer(self.work_life_balance),
            Column::DistanceFromHome => Value::Integer(self.distance_from_home),
            Column::JobRole => Value::Text(self.job_role.clone()),
            Column::Department => Value::Text(self.department.clone()),
            Column::EducationField => Value::Text(self.education_field.clone()),
            Column::Gender => Value::Text(self.gender.clone()),
            Column::Attrition => Value::Text(self.attrition.clone()),
            Column::JobSatisfaction => Value::Integer(self.job_satisfaction),
        }
    }

    /// Numeric view of a column, `None` for text cells.
    pub fn number(&self, column: Column) -> Option<f64> {
        self.get(column).as_f64()
    }
}

// ---------------------------------------------------------------------------
// RecordTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Distinct values of one column, in first-appearance order.
pub type OptionList = IndexSet<Value>;

/// The loaded dataset plus its option lists. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    records: Vec<Record>,
    options: BTreeMap<Column, OptionList>,
}

impl RecordTable {
    /// Build the table and derive every column's option list in one pass.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut options: BTreeMap<Column, OptionList> =
            Column::ALL.iter().map(|&c| (c, OptionList::new())).collect();

        for rec in &records {
            for (&col, values) in options.iter_mut() {
                values.insert(rec.get(col));
            }
        }

        RecordTable { records, options }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct values of `column`, ordered by first appearance.
    pub fn option_list(&self, column: Column) -> &OptionList {
        // Every column is seeded in `from_records`.
        &self.options[&column]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
