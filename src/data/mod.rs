/// Data layer: record types, loading, and filtering.
///
/// Architecture:
/// ```text
///  WA_Fn-UseC_-HR-Employee-Attrition.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → RecordTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ RecordTable   │  Vec<Record>, option list per column
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply row predicates → Subset
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
