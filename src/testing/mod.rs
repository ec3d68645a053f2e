//! Headless testing framework.
//!
//! Use the [`Pilot`] to programmatically drive an [`App`](crate::app::App)
//! without a real terminal.

pub mod pilot;

pub use pilot::Pilot;
