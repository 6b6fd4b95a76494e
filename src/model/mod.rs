//! Record model and dataset loading.

pub mod load;
pub mod types;

pub use load::{LoadError, load_records, parse_records, records_from_value};
pub use types::{FieldValue, Record, Searchable};
