//! obra-ingest: task-export ingestion (backend JSON, weekly-plan CSV) into
//! validated core task records.

pub mod parsers;
pub mod types;

pub use parsers::{parse_json_export, parse_json_export_str, parse_weekly_csv};
pub use types::RawTaskRecord;
