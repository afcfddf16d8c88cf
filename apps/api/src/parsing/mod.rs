#![allow(dead_code)]

// Normalization of free-form model replies into structured application data.
// Every function here is pure and total: malformed input degrades to a default
// (fallback percent, empty field list, partial plan), never an error or panic.

pub mod fields;
pub mod percent;
pub mod timeline;

pub use fields::{parse_fields, try_parse_fields, FieldDescriptor};
pub use percent::{extract_percent, ChanceEstimate};
pub use timeline::{format_plan, parse_plan, PlanItem};
