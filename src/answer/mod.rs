//! Answer engine for Information Seeking tasks.
//!
//! [`extract`] finds a typed answer in the agent's final message and
//! [`judge`] compares it with the reference, converting local date-times to
//! UTC on the way.

mod compare;
mod extract;

pub use compare::{judge, localize_to_utc, Judgement, Outcome};
pub use extract::{extract, ExtractedAnswer, DATE_TIME_FORMAT};
