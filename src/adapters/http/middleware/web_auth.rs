use actix_web::{
  Error, HttpMessage, HttpResponse,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header,
};
use futures_util::future::LocalBoxFuture;
use std::{future::ready, rc::Rc, sync::Arc};

use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

pub const SESSION_COOKIE: &str = "session_token";

/// Gate for the dashboard scope.
///
/// A valid `session_token` cookie puts the [`User`] into the request
/// extensions. Anything else is sent to `/login`, carrying the requested path
/// and query as `redirectTo` so sign-in can return there.
///
/// [`User`]: crate::domain::auth::entities::User
pub struct WebAuthMiddleware {
  auth_service: Arc<AuthService>,
}

impl WebAuthMiddleware {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }
}

impl<S, B> Transform<S, ServiceRequest> for WebAuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type InitError = ();
  type Transform = WebAuthMiddlewareService<S>;
  type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(WebAuthMiddlewareService {
      service: Rc::new(service),
      auth_service: self.auth_service.clone(),
    }))
  }
}

pub struct WebAuthMiddlewareService<S> {
  service: Rc<S>,
  auth_service: Arc<AuthService>,
}

impl<S, B> Service<ServiceRequest> for WebAuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let token = req
      .cookie(SESSION_COOKIE)
      .and_then(|c| SessionToken::from_string(c.value()).ok());

    let auth_service = self.auth_service.clone();
    let service = Rc::clone(&self.service);

    Box::pin(async move {
      let user = match token {
        Some(token) => match auth_service.validate_session(&token).await {
          Ok(user) => Some(user),
          Err(e) => {
            tracing::debug!("Rejected session for {}: {}", req.path(), e);
            None
          }
        },
        None => None,
      };

      match user {
        Some(user) => {
          req.extensions_mut().insert(user);
          let res = service.call(req).await?;
          Ok(res.map_into_left_body())
        }
        None => {
          let target = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.path().to_string(), |pq| pq.as_str().to_string());
          let location = login_location(&target);
          let res = req.into_response(
            HttpResponse::Found()
              .insert_header((header::LOCATION, location))
              .finish(),
          );
          Ok(res.map_into_right_body())
        }
      }
    })
  }
}

fn login_location(path: &str) -> String {
  match serde_urlencoded::to_string([("redirectTo", path)]) {
    Ok(query) => format!("/login?{}", query),
    Err(_) => "/login".to_string(),
  }
}
