pub mod blink;
pub mod field;
pub mod sector;
pub mod smoother;
