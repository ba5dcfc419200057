//! Output formatting for subnet views.
//!
//! - `csv` - CSV export/import of names, locks and expansions
//! - `terminal` - terminal table with colors

mod csv;
mod terminal;

pub use self::csv::{export_csv, import_csv};
pub use terminal::{format_field, print_rows, render_rows};
