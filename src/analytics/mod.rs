// Deterministic analytics: TF-IDF, lexicon classification, representative
// posts, and the homework × model aggregation that ties them together.

pub mod insights;
pub mod lexicon;
pub mod pipeline;
pub mod report;
pub mod representative;
pub mod tfidf;
