pub mod frequency;
pub mod timeline;

pub use frequency::{analyze_session, analyze_timeline};
pub use timeline::{build_timelines, LightTimelines};
