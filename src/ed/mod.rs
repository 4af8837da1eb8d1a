// Ed Discussion integration: API client, title metadata, thread filtering,
// and merging settled labels with fetched bodies.

pub mod client;
pub mod merge;
pub mod metadata;
pub mod threads;
