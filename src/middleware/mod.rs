/*
 * Responsibility
 * - Router-level layers
 *   - auth: bearer token -> IdentityContext (never rejects)
 *   - http: request id, tracing, body limit, timeout, panic -> 500
 *   - cors / security_headers: browser-facing policy
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
