pub mod control;
pub mod health;
pub mod overlay;
pub mod sse;
pub mod validation;
