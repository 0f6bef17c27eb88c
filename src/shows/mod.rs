mod database;
mod date;
mod selection;
mod venue;

pub use database::{PageReport, ShowDatabase};
pub use date::normalize_date;
pub use selection::Selector;
pub use venue::{extract_location, extract_venue};
