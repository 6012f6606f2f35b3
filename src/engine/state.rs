use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::data::holidays::HolidayCalendar;
use crate::engine::calendar::is_selectable;
use crate::models::view::{Action, ViewMode, ViewState};

/// Apply one user action and return the next state. Rejected actions return
/// the current state unchanged.
pub fn update(state: &ViewState, action: Action, holidays: &dyn HolidayCalendar) -> ViewState {
    let next = match action {
        Action::SelectMonth(month) => {
            if !(1..=12).contains(&month) {
                warn!("Ignoring month selection {}: out of range", month);
                return *state;
            }
            ViewState::new(state.year, month)
        }
        Action::NextMonth => {
            let (year, month) = if state.month == 12 {
                (state.year + 1, 1)
            } else {
                (state.year, state.month + 1)
            };
            ViewState::new(year, month)
        }
        Action::PreviousMonth => {
            let (year, month) = if state.month == 1 {
                (state.year - 1, 12)
            } else {
                (state.year, state.month - 1)
            };
            ViewState::new(year, month)
        }
        Action::ClickDay(day) => {
            let Some(date) = NaiveDate::from_ymd_opt(state.year, state.month, day) else {
                warn!("Ignoring click on day {}: not in {}-{:02}", day, state.year, state.month);
                return *state;
            };
            if !is_selectable(date, holidays) {
                debug!("Ignoring click on disabled day {}", date);
                return *state;
            }
            ViewState {
                mode: ViewMode::DayDetail { day },
                ..*state
            }
        }
        Action::CloseDay => ViewState {
            mode: ViewMode::MonthGrid,
            ..*state
        },
    };

    debug!("{:?}: {:?} -> {:?}", action, state, next);
    next
}
