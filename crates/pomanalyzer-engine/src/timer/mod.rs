pub mod engine;
pub mod events;
pub mod manager;


pub use engine::{RunOutcome, TickLoop, TICK_INTERVAL};
pub use events::{IntervalEvent, IntervalEventType};
pub use manager::IntervalManager;
