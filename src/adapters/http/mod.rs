pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod templates;

pub use errors::{ApiError, ErrorResponse};
pub use middleware::{RequestId, RequestIdExt, RequestIdMiddleware, WebAuthMiddleware};
pub use routes::{WebRouteDependencies, configure_web_routes, login_resource};
pub use templates::TemplateEngine;
