/*
 * Responsibility
 * - v1 entry point (routes() re-export)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;


pub use routes::routes;
