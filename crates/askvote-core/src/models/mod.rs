pub mod button;
pub mod target;
pub mod vote;
