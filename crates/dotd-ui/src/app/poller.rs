//! Interval runner for generation task polling.
//!
//! # Design
//! - The pure state machine decides everything; this file only owns the
//!   timer and the network call per tick.
//! - Dropping the handle cancels the interval, so the slot in the app
//!   shell is the single owner of the loop.

use crate::core::store::AppStore;
use crate::features::generate::state::{self, GeneratePhase, POLL_INTERVAL_MS, PollVerdict};
use crate::services::api::ApiClient;
use gloo_timers::callback::Interval;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use yewdux::prelude::Dispatch;

/// Owning handle for one polling loop.
pub(crate) struct PollHandle {
    _interval: Interval,
}

/// Start polling the task currently tracked by the generate slice,
/// replacing any previous loop held in `slot`.
pub(crate) fn start_status_polling(
    dispatch: &Dispatch<AppStore>,
    client: &Rc<ApiClient>,
    slot: &Rc<RefCell<Option<PollHandle>>>,
) {
    slot.borrow_mut().take();
    let dispatch = dispatch.clone();
    let client = client.clone();
    let slot_weak = Rc::downgrade(slot);
    let interval = Interval::new(POLL_INTERVAL_MS, move || {
        let mut task_id = None;
        dispatch.reduce_mut(|store| task_id = state::begin_check(&mut store.generate));
        let Some(task_id) = task_id else {
            // Either the previous check is still on the wire, or the flow
            // reached a terminal phase and the loop should die.
            if !matches!(
                dispatch.get().generate.phase,
                GeneratePhase::Polling { .. }
            ) {
                clear_slot(&slot_weak);
            }
            return;
        };
        let dispatch = dispatch.clone();
        let client = client.clone();
        let slot_weak = slot_weak.clone();
        yew::platform::spawn_local(async move {
            let mut verdict = PollVerdict::Continue;
            match client.task_status(&task_id).await {
                Ok(snapshot) => dispatch.reduce_mut(|store| {
                    verdict = state::apply_snapshot(&mut store.generate, &snapshot);
                }),
                Err(_) => dispatch.reduce_mut(|store| {
                    verdict = state::check_failed(&mut store.generate);
                }),
            }
            if verdict == PollVerdict::Stop {
                clear_slot(&slot_weak);
            }
        });
    });
    *slot.borrow_mut() = Some(PollHandle {
        _interval: interval,
    });
}

fn clear_slot(slot: &Weak<RefCell<Option<PollHandle>>>) {
    if let Some(slot) = slot.upgrade() {
        slot.borrow_mut().take();
    }
}
