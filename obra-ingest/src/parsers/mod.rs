pub mod json_export;
pub mod weekly_csv;

pub use json_export::{parse_json_export, parse_json_export_str};
pub use weekly_csv::parse_weekly_csv;
