/*!
 * Identity context extractor
 *
 * Public API:
 * - IdentityContext (type + FromRequestParts)
 */

mod core;
mod types;

pub use types::IdentityContext;
