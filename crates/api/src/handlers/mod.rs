pub mod analyze;
pub mod uploads;
pub mod videos;
