//! Task model: tasks, instances, and their ground truth.
//!
//! Raw `tasks.json` entries ([`TaskDefinition`]) are resolved once into typed
//! ground truth. Expectation tokens and path patterns are parsed at that
//! point, so evaluation never re-reads ground-truth strings.

mod answer;
mod call;
mod definition;
mod instance;
mod operator;
mod registry;

pub use answer::{AnswerType, AnswerValue, InformationSeekingAnswer, ReferenceAnswer};
pub use call::{AnswerOption, ExpectedCall, PathPattern, SideEffectAnswer};
pub use definition::{ExpectedCallDefinition, InstanceDefinition, TaskDefinition};
pub use instance::{GroundTruth, Task, TaskCategory, TaskInstance};
pub use operator::{Expectation, ANY_TOKEN};
pub use registry::{load_definitions, LoadIssue, TaskRegistry};
