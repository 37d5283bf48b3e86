// Keyword-overlap ("ATS") relevance scoring and the upload-and-analyze endpoint.

pub mod handlers;
pub mod keyword;

pub use keyword::{score, AtsReport};
