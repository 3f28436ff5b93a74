//! Session driving
//!
//! The session driver owns every mutable core component and is the only
//! writer; presentation layers call its operations and observe the event
//! stream.

mod driver;
mod observer;

pub use driver::SessionDriver;
pub use observer::SessionObserver;
