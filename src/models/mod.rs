pub mod appointment;
pub mod event;
pub mod intent;
pub mod usage;

pub use appointment::{AppointmentFields, CalendarEvent, EventRef};
pub use event::{InboundEvent, Payload};
pub use intent::IntentLabel;
pub use usage::TokenUsage;
