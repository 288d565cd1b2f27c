pub mod covers;
pub mod time;
