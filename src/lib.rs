//! # autoclose-tui
//!
//! Process-scoped auto-close coordination for overlays (popovers, menus,
//! tooltips, dropdowns) in a retained-DOM terminal UI.
//!
//! A single coordinator owns five document-level listeners for the whole
//! application. Overlays register through cheap handles and are closed on
//! Escape, on a press outside them, or on a click inside them, depending on
//! their [`AutoClose`](autoclose::AutoClose) setting. Nested overlays close
//! one at a time, newest first.
//!
//! ## Core Systems
//!
//! - **[`autoclose`]**: Coordinator, subscriber handles, dispatch scans
//! - **[`dom`]**: Slotmap-backed DOM arena with containment queries
//! - **[`layout`]**: Spatial map for pointer hit testing
//! - **[`event`]**: Input events, document events, click synthesis
//! - **[`app`]**: Application struct tying everything together
//! - **[`testing`]**: Headless pilot for driving an app in tests
//! - **[`geometry`]**: Offset and Region primitives

// Foundation
pub mod geometry;

// Core systems
pub mod dom;
pub mod layout;

// Events and coordination
pub mod autoclose;
pub mod event;

// Application
pub mod app;
pub mod testing;
