/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `tasks`: Task CRUD endpoints
/// - `users`: User CRUD and user-task endpoints

pub mod health;
pub mod tasks;
pub mod users;
