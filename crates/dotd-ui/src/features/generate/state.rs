//! Generation task monitor: pure state machine for submit-and-poll.
//!
//! # Design
//! - The wasm glue owns the interval timer; this module owns every
//!   transition, so the whole flow is testable natively.
//! - Terminal phases are absorbing: once `Completed` or `Failed`, no
//!   check can start and no snapshot is applied.
//! - A tick may fire while the previous status check is still on the
//!   wire; `begin_check` refuses to overlap them.

use crate::features::listings::state::CreationCard;
use dotd_api_models::{TaskResult, TaskSnapshot, TaskState};

/// Fixed poll period for task status checks.
pub const POLL_INTERVAL_MS: u32 = 3_000;

/// Fallback message when the submit call itself fails.
pub const COULD_NOT_START: &str = "Failed to start the generation task.";

/// Fallback message for a failed task that carried no error text.
pub const GENERIC_FAILURE: &str = "Generation failed. Please try again.";

/// Message for a task that completed without the expected payload.
pub const MALFORMED_RESULT: &str = "Generation finished without a result. Please try again.";

/// Message when the status check itself errors.
pub const STATUS_CHECK_FAILED: &str = "An error occurred while checking the task status.";

/// Message when the configured attempt ceiling is exhausted.
pub const POLL_BUDGET_EXHAUSTED: &str = "Generation timed out. Please try again.";

/// Parameters submitted with the user's photo.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct GenerationParams {
    /// Target gender.
    pub gender: String,
    /// Target age group.
    pub age_group: String,
    /// Selected style preset.
    pub style: String,
    /// Up to three preferred colors.
    pub colors: Vec<String>,
    /// Free-form prompt text.
    pub prompt: String,
    /// Whether the result should be public on the feed.
    pub is_public: bool,
}

/// Result surfaced when a task completes.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationOutcome {
    /// The generated creation.
    pub creation: CreationCard,
    /// Style analysis text, when provided.
    pub analysis: Option<String>,
    /// Trend recommendation text, when provided.
    pub recommendation: Option<String>,
    /// Style tags for the result view.
    pub tags: Vec<String>,
}

/// Progress phases of one generation flow.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum GeneratePhase {
    /// Collecting parameters; also the retry state.
    #[default]
    Input,
    /// Submit call in flight.
    Submitting,
    /// Task accepted; polling its status.
    Polling {
        /// Identifier being polled.
        task_id: String,
    },
    /// Terminal success.
    Completed {
        /// Result handed to the view.
        outcome: GenerationOutcome,
    },
    /// Terminal failure, including "could not start".
    Failed {
        /// User-facing failure message.
        message: String,
    },
}

/// Generate slice stored in the app state.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GenerateState {
    /// Current phase.
    pub phase: GeneratePhase,
    /// A status check is on the wire.
    pub check_in_flight: bool,
    /// Checks issued since the last submit.
    pub checks_issued: u32,
    /// Optional attempt ceiling; `None` polls until terminal or
    /// cancelled.
    pub max_checks: Option<u32>,
}

/// What the poll loop should do after a snapshot or error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollVerdict {
    /// Keep the interval running.
    Continue,
    /// Terminal state reached; clear the interval.
    Stop,
}

/// Enter the submitting phase. Refused while a submit or poll is already
/// running, so double-taps cannot start two tasks.
pub fn begin_submit(state: &mut GenerateState) -> bool {
    match state.phase {
        GeneratePhase::Input | GeneratePhase::Completed { .. } | GeneratePhase::Failed { .. } => {
            state.phase = GeneratePhase::Submitting;
            state.check_in_flight = false;
            state.checks_issued = 0;
            true
        }
        GeneratePhase::Submitting | GeneratePhase::Polling { .. } => false,
    }
}

/// Record an accepted task and move to polling.
pub fn submit_ok(state: &mut GenerateState, task_id: String) {
    if state.phase == GeneratePhase::Submitting {
        state.phase = GeneratePhase::Polling { task_id };
    }
}

/// Record a submit failure ("could not start").
pub fn submit_failed(state: &mut GenerateState, message: Option<String>) {
    if state.phase == GeneratePhase::Submitting {
        state.phase = GeneratePhase::Failed {
            message: message.unwrap_or_else(|| COULD_NOT_START.to_string()),
        };
    }
}

/// Start one status check if the machine allows it.
///
/// Returns the task id to query, or `None` when not polling, when the
/// previous check is still outstanding, or when the attempt ceiling is
/// exhausted (which transitions to `Failed`).
pub fn begin_check(state: &mut GenerateState) -> Option<String> {
    let GeneratePhase::Polling { task_id } = &state.phase else {
        return None;
    };
    if state.check_in_flight {
        return None;
    }
    if let Some(max) = state.max_checks
        && state.checks_issued >= max
    {
        state.phase = GeneratePhase::Failed {
            message: POLL_BUDGET_EXHAUSTED.to_string(),
        };
        return None;
    }
    let task_id = task_id.clone();
    state.checks_issued += 1;
    state.check_in_flight = true;
    Some(task_id)
}

/// Apply a status snapshot from the poll loop.
///
/// Snapshots for a task other than the one being polled (e.g. a response
/// landing after cancel) are ignored and stop the caller's loop.
pub fn apply_snapshot(state: &mut GenerateState, snapshot: &TaskSnapshot) -> PollVerdict {
    state.check_in_flight = false;
    let GeneratePhase::Polling { task_id } = &state.phase else {
        return PollVerdict::Stop;
    };
    if *task_id != snapshot.id {
        return PollVerdict::Stop;
    }
    match snapshot.status {
        TaskState::Pending | TaskState::Processing => PollVerdict::Continue,
        TaskState::Completed => {
            state.phase = match outcome_from(snapshot.result.as_ref()) {
                Some(outcome) => GeneratePhase::Completed { outcome },
                None => GeneratePhase::Failed {
                    message: MALFORMED_RESULT.to_string(),
                },
            };
            PollVerdict::Stop
        }
        TaskState::Failed => {
            let message = snapshot
                .result
                .as_ref()
                .and_then(|result| result.error.clone())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            state.phase = GeneratePhase::Failed { message };
            PollVerdict::Stop
        }
    }
}

/// Record a transport failure on the status check itself.
pub fn check_failed(state: &mut GenerateState) -> PollVerdict {
    state.check_in_flight = false;
    if matches!(state.phase, GeneratePhase::Polling { .. }) {
        state.phase = GeneratePhase::Failed {
            message: STATUS_CHECK_FAILED.to_string(),
        };
    }
    PollVerdict::Stop
}

/// Abandon the flow (navigation away, retry button). The caller clears
/// its interval; late responses are ignored by [`apply_snapshot`].
pub fn cancel(state: &mut GenerateState) {
    state.phase = GeneratePhase::Input;
    state.check_in_flight = false;
    state.checks_issued = 0;
}

fn outcome_from(result: Option<&TaskResult>) -> Option<GenerationOutcome> {
    let result = result?;
    let creation = result.creation.clone()?;
    let recommendation = result
        .recommendation
        .clone()
        .or_else(|| creation.recommendation_text.clone());
    let tags = result
        .tags
        .clone()
        .or_else(|| creation.tags_array.clone())
        .unwrap_or_default();
    Some(GenerationOutcome {
        creation: CreationCard::from(creation),
        analysis: result.analysis.clone(),
        recommendation,
        tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use dotd_api_models::Creation;

    fn creation() -> Creation {
        Creation {
            id: "c9".to_string(),
            user_id: "U1".to_string(),
            media_url: "https://cdn.example/c9.png".to_string(),
            media_type: "image".to_string(),
            prompt: "wedding guest look".to_string(),
            gender: Some("female".to_string()),
            age_group: Some("20s".to_string()),
            is_public: true,
            is_picked_by_admin: false,
            likes_count: 0,
            created_at: DateTime::<Utc>::from_timestamp(1_750_000_000, 0).unwrap(),
            author_name: Some("Mina".to_string()),
            author_picture: None,
            is_liked: false,
            tags_array: Some(vec!["formal".to_string()]),
            recommendation_text: Some("Keep accessories minimal.".to_string()),
        }
    }

    fn snapshot(status: TaskState, result: Option<TaskResult>) -> TaskSnapshot {
        TaskSnapshot {
            id: "t1".to_string(),
            status,
            result,
        }
    }

    fn polling_state() -> GenerateState {
        let mut state = GenerateState::default();
        assert!(begin_submit(&mut state));
        submit_ok(&mut state, "t1".to_string());
        state
    }

    #[test]
    fn pending_pending_completed_ends_exactly_once() {
        let mut state = polling_state();
        for _ in 0..2 {
            let task_id = begin_check(&mut state).unwrap();
            assert_eq!(task_id, "t1");
            let verdict = apply_snapshot(&mut state, &snapshot(TaskState::Pending, None));
            assert_eq!(verdict, PollVerdict::Continue);
        }
        begin_check(&mut state).unwrap();
        let done = snapshot(
            TaskState::Completed,
            Some(TaskResult {
                creation: Some(creation()),
                analysis: Some("Balanced silhouette.".to_string()),
                recommendation: None,
                tags: None,
                error: None,
            }),
        );
        assert_eq!(apply_snapshot(&mut state, &done), PollVerdict::Stop);
        let GeneratePhase::Completed { outcome } = &state.phase else {
            panic!("expected completed phase");
        };
        assert_eq!(outcome.creation.id, "c9");
        // Recommendation falls back to the creation's own text.
        assert_eq!(
            outcome.recommendation.as_deref(),
            Some("Keep accessories minimal.")
        );
        assert_eq!(outcome.tags, vec!["formal".to_string()]);
        // Terminal: no further checks can start.
        assert!(begin_check(&mut state).is_none());
    }

    #[test]
    fn completed_without_payload_fails_instead_of_looping() {
        let mut state = polling_state();
        begin_check(&mut state).unwrap();
        let verdict = apply_snapshot(&mut state, &snapshot(TaskState::Completed, None));
        assert_eq!(verdict, PollVerdict::Stop);
        assert_eq!(
            state.phase,
            GeneratePhase::Failed {
                message: MALFORMED_RESULT.to_string()
            }
        );
    }

    #[test]
    fn failed_task_carries_message_or_fallback() {
        let mut state = polling_state();
        begin_check(&mut state).unwrap();
        let failed = snapshot(
            TaskState::Failed,
            Some(TaskResult {
                error: Some("model refused the prompt".to_string()),
                ..Default::default()
            }),
        );
        assert_eq!(apply_snapshot(&mut state, &failed), PollVerdict::Stop);
        assert_eq!(
            state.phase,
            GeneratePhase::Failed {
                message: "model refused the prompt".to_string()
            }
        );

        let mut state = polling_state();
        begin_check(&mut state).unwrap();
        assert_eq!(
            apply_snapshot(&mut state, &snapshot(TaskState::Failed, None)),
            PollVerdict::Stop
        );
        assert_eq!(
            state.phase,
            GeneratePhase::Failed {
                message: GENERIC_FAILURE.to_string()
            }
        );
    }

    #[test]
    fn overlapping_ticks_issue_one_check() {
        let mut state = polling_state();
        assert!(begin_check(&mut state).is_some());
        // Next tick fires before the response lands.
        assert!(begin_check(&mut state).is_none());
        apply_snapshot(&mut state, &snapshot(TaskState::Processing, None));
        assert!(begin_check(&mut state).is_some());
    }

    #[test]
    fn transport_error_on_check_is_terminal() {
        let mut state = polling_state();
        begin_check(&mut state).unwrap();
        assert_eq!(check_failed(&mut state), PollVerdict::Stop);
        assert_eq!(
            state.phase,
            GeneratePhase::Failed {
                message: STATUS_CHECK_FAILED.to_string()
            }
        );
    }

    #[test]
    fn cancel_stops_checks_and_ignores_late_snapshot() {
        let mut state = polling_state();
        begin_check(&mut state).unwrap();
        cancel(&mut state);
        assert!(begin_check(&mut state).is_none());
        // A response that was already on the wire lands after cancel.
        let late = snapshot(TaskState::Completed, None);
        assert_eq!(apply_snapshot(&mut state, &late), PollVerdict::Stop);
        assert_eq!(state.phase, GeneratePhase::Input);
    }

    #[test]
    fn submit_failure_skips_polling() {
        let mut state = GenerateState::default();
        assert!(begin_submit(&mut state));
        submit_failed(&mut state, None);
        assert_eq!(
            state.phase,
            GeneratePhase::Failed {
                message: COULD_NOT_START.to_string()
            }
        );
        assert!(begin_check(&mut state).is_none());
    }

    #[test]
    fn double_submit_is_refused_while_running() {
        let mut state = GenerateState::default();
        assert!(begin_submit(&mut state));
        assert!(!begin_submit(&mut state));
        submit_ok(&mut state, "t1".to_string());
        assert!(!begin_submit(&mut state));
    }

    #[test]
    fn attempt_ceiling_fails_the_flow_when_exhausted() {
        let mut state = polling_state();
        state.max_checks = Some(2);
        for _ in 0..2 {
            begin_check(&mut state).unwrap();
            apply_snapshot(&mut state, &snapshot(TaskState::Pending, None));
        }
        assert!(begin_check(&mut state).is_none());
        assert_eq!(
            state.phase,
            GeneratePhase::Failed {
                message: POLL_BUDGET_EXHAUSTED.to_string()
            }
        );
    }
}
