// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule event handlers.

use super::MaterializedState;
use crate::event::LedgerEvent;

pub(crate) fn apply(state: &mut MaterializedState, event: &LedgerEvent) {
    match event {
        LedgerEvent::ScheduleCreated { schedule } => {
            // Idempotency: first creation wins
            if !state.schedules.contains_key(schedule.id.as_str()) {
                state.schedules.insert(schedule.id.to_string(), schedule.clone());
            }
        }

        LedgerEvent::ScheduleUpdated { schedule } => {
            state.schedules.insert(schedule.id.to_string(), schedule.clone());
        }

        LedgerEvent::ScheduleDeleted { schedule_id } => {
            state.schedules.remove(schedule_id.as_str());
        }

        LedgerEvent::ScheduleFired { schedule_id, at, next_fire_at } => {
            if let Some(schedule) = state.schedules.get_mut(schedule_id.as_str()) {
                schedule.last_fire_at = Some(*at);
                schedule.next_fire_at = *next_fire_at;
            }
        }

        _ => {}
    }
}
