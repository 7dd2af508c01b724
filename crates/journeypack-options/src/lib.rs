//! Verb flag extraction for journeypack invocations.
//!
//! Turns a raw argument list into the ordered list of recognised verbs, each
//! with its optional value. Anything that is not a recognised flag is dropped.

mod parser;
mod target;
mod verb;

pub use parser::{extract_options, parse_invocations, VerbInvocation};
pub use target::{ScoutTarget, TargetError, TARGET_SEPARATOR};
pub use verb::Verb;
