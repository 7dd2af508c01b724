//! Per-tuple composers
//!
//! Each composer reads the settings for one (environment, journey, brand)
//! tuple and returns a fragment of the build configuration. Unknown journeys
//! yield empty fragments or `None`; nothing here raises on missing config.

pub mod entry;
pub mod output;
pub mod template;

pub use entry::{compose_entry, EntryMap};
pub use output::{compose_copy, compose_output, compose_style_extract, OutputDescriptor};
pub use template::{
    base_path, compose_define, compose_scout_template, compose_template, TemplateDescriptor,
};
