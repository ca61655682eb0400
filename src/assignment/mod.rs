//! Assignment and conversion records, and the weighted draw that creates
//! assignments.

mod assignment_record;
mod event_record;
pub mod weighted;

pub use assignment_record::Assignment;
pub use event_record::ConversionEvent;
pub use weighted::{assign_variant, pick_variant};
