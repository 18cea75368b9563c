pub mod api;
pub mod error;
pub mod identity;

pub use api::{create_router, run, AppState};
pub use error::{ApiError, ServerError};
pub use identity::{AnonymousIdentity, CookieIdentity, IdentityExtractor};
