//! egui dashboard UI: state, view models, controller, and renderer.

/// Controller bridging dashboard data to UI state.
pub mod controller;
/// Shared state types consumed by the renderer.
pub mod state;
/// egui renderer.
pub mod ui;
/// Helpers converting records into view structs.
pub mod view_model;
