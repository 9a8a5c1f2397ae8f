//! GUI panels and application state.

pub mod app;
pub mod appointment_panel;
pub mod auth_panel;
pub mod components;
pub mod dashboard;
pub mod doctor_panel;
pub mod doctor_status;
pub mod forms;
pub mod queue_panel;

pub use app::App;
