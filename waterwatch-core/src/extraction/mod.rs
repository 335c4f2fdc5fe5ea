pub mod builder;
pub mod extractor;
pub mod source;
