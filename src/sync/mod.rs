//! Keeping the controller and every overlay on the same match document.

pub mod clock;
pub mod session;
pub mod transport;
