pub mod analysis;
pub mod error;
pub mod extract;
pub mod extraction;
pub mod ocr;
pub mod report;
pub mod table;
pub mod tabular;
