pub mod anchor;
pub mod captions;
pub mod fallback;
pub mod report;
pub mod similarity;
pub mod tokenization;
