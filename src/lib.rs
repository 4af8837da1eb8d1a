// Edlens: participation-post analytics for Ed Discussion
//
// This is the library root. `analytics` and `text` are the pure, synchronous
// core; `ed` and `output` are the I/O around it.

pub mod analytics;
pub mod config;
pub mod ed;
pub mod models;
pub mod output;
pub mod text;
