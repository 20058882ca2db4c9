//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params)
//! 2. Validates the path identifier and calls the coffee repository
//! 3. Returns HTTP response (JSON, status code)
/// Coffee CRUD endpoints
pub mod coffees;
/// Liveness and readiness endpoints
pub mod health;
