mod identity;
mod json;

pub use identity::IdentityContext;
pub use json::ApiJson;
