//! # LOS Tabular
//!
//! Row sources feeding the code list and data cube builders.
//!
//! ## Architecture
//!
//! ```text
//! .csv / .xls / .xlsx / .ods
//!     │
//!     ├──> CsvSource (csv)
//!     │      ├─ rows()    positional rows, header included
//!     │      └─ records() header-keyed records
//!     │
//!     └──> Workbook / SheetSource (calamine)
//!            ├─ sheet_names()
//!            └─ rows()    positional rows, header included
//! ```
//!
//! Every cell is trimmed; blank cells become `None`, so callers only ever deal
//! with "present" or "absent" values.

mod csv_source;
mod error;
mod sheet;
mod types;

pub use csv_source::CsvSource;
pub use error::{Result, TabularError};
pub use sheet::{SheetSource, Workbook};
pub use types::{distinct_column, normalize_cell, Record, Row, TabularSource};
