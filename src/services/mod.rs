pub mod ai;
pub mod calendar;
pub mod document;
pub mod messaging;
pub mod secrets;
pub mod transfer;
