//! Front desk REST API client.
//!
//! One `ApiClient` type with the endpoint groups split across files:
//! - `client`: request plumbing, bearer auth, 401 handling, error bodies
//! - `auth`: login, registration, logout
//! - `queue`, `doctors`, `appointments`: CRUD per resource

mod appointments;
mod auth;
mod client;
mod doctors;
mod queue;


pub use client::ApiClient;
