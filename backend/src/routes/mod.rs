pub mod attendance;
pub mod catalog;
pub mod portal;
pub mod reports;
