// Text normalization: markup stripping and tokenization.

pub mod html;
pub mod tokenizer;
