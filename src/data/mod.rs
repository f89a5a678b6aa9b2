/// Data layer: record types, loading, and filtering.
///
/// Architecture:
/// ```text
///  CTD_Data.dat          metocean .csv
///        │                     │
///        ▼                     ▼
///   ┌──────────┐         ┌──────────┐
///   │  loader   │         │  loader   │  parse → Raw*Table (cells may be missing)
///   └──────────┘         └──────────┘
///        │                     │
///        ▼                     ▼
///   drop_incomplete      ┌──────────┐
///        │               │  filter   │  sort by time, keep [start, end]
///        ▼               └──────────┘
///   ┌──────────┐              │
///   │  filter   │ by depth     ▼
///   └──────────┘         drop_incomplete
///        │                     │
///        ▼                     ▼
///    CtdProfile          MetoceanSeries
/// ```

pub mod filter;
pub mod loader;
pub mod model;
