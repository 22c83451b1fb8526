//! Information Seeking grading: did the agent state the right answer?

use chrono_tz::Tz;

use super::report::EvaluationDetail;
use crate::answer::{judge, Outcome};
use crate::task::InformationSeekingAnswer;
use crate::trace::ObservedOutput;

/// Grades the agent's final message. Returns correctness and the detail.
///
/// A transcript whose last message is not from the agent is graded all the same.
pub(super) fn grade(
    answer: &InformationSeekingAnswer,
    output: &ObservedOutput,
    timezone: Tz,
) -> (bool, EvaluationDetail) {
    let judgement = judge(answer, &output.text, timezone);
    let correct = judgement.outcome == Outcome::Correct;
    let detail = EvaluationDetail::InformationSeeking {
        outcome: judgement.outcome,
        observed: judgement.observed,
        reference: answer.reference.clone(),
        timezone_note: judgement.timezone_note,
        raw_output: (!correct).then(|| output.text.clone()),
    };
    (correct, detail)
}
