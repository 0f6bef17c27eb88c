mod document;
mod show;

pub use document::RawDocument;
pub use show::{CandidateRecord, ShowDate, Track};
