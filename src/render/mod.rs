//! Rendering of plan summaries.
//!
//! Every renderer turns the same [`Summary`] into text; none of them
//! re-derive counts from the plan.

mod compact;
mod grid;
mod json;

pub use compact::{CompactTable, Grouping};
pub use grid::GridTable;
pub use json::JsonReport;

use crate::summary::Summary;

/// A way of turning a summary into display text.
pub trait Render {
    /// Renders the summary. Identical summaries render identically.
    fn render(&self, summary: &Summary) -> String;
}

impl<R: Render + ?Sized> Render for Box<R> {
    fn render(&self, summary: &Summary) -> String {
        (**self).render(summary)
    }
}
