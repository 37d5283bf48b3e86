// Single-page layout policy: a line-count estimate over the structured record
// and the pruning applied before render and after an overflowing compile.

pub mod single_page;

pub use single_page::{fit_before_render, prune};
