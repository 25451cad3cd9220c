/*
 * Responsibility
 * - One handler per operation
 * - Each one runs its own checks in a fixed order; the order is part of the
 *   contract (it decides which error wins), so do not factor it out
 */
pub mod account;
pub mod auth;
pub mod content;
pub mod health;
