pub mod paint;
pub mod scroll;
pub mod span;
pub mod style;
