//! almanac-core: date normalization and schedule placement for calendar notices.
//!
//! Flow: `CalendarSnapshot` -> `collect` -> `place` -> `ScheduleStore` -> `decide`.

pub mod calendar;
pub mod collector;
pub mod decision;
pub mod error;
pub mod period;
pub mod placer;
pub mod store;
pub mod time;
pub mod workday;

pub use calendar::{CalendarSnapshot, HolidayRange, SolarTerm};
pub use collector::{collect, SpecialDateEntry, SpecialKind};
pub use decision::{
    decide, nearest_upcoming_in_calendar, nearest_upcoming_in_schedule, today_special_date,
    upcoming_special_dates, Decision,
};
pub use error::{CalendarError, StoreError};
pub use period::Period;
pub use placer::{
    place, plan_period, ExactName, MonthlySchedule, NameSimilarity, PlacementPolicy,
    ScheduleEntry, SubstringContainment,
};
pub use store::{ensure_schedule, JsonFileStore, MemoryStore, ScheduleStore};
pub use workday::{is_workday, last_workday_on_or_before, previous_workday};
