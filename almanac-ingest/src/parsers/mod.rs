pub mod holiday_feed;
pub mod jieqi_feed;
