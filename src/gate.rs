use crate::storage::ParentalControls;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// True when any enabled block window covers the given local wall-clock
/// moment. Day windows: morning 06:00-11:59, afternoon 12:00-17:59, evening
/// 18:00-23:59. Weekday means Mon-Fri and weekend means Sat-Sun.
pub fn is_blocked(controls: &ParentalControls, now: NaiveDateTime) -> bool {
    let hour = now.hour();

    if controls.morning_parent_block && (6..12).contains(&hour) {
        return true;
    }
    if controls.afternoon_parent_block && (12..18).contains(&hour) {
        return true;
    }
    if controls.evening_parent_block && hour >= 18 {
        return true;
    }

    let weekend = matches!(now.weekday(), Weekday::Sat | Weekday::Sun);
    if controls.weekday_parent_block && !weekend {
        return true;
    }
    if controls.weekend_parent_block && weekend {
        return true;
    }

    false
}
