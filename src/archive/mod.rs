mod client;

pub use client::{ArchiveClient, SearchSource};
