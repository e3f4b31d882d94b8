pub mod invoices_web;
pub mod web_auth;

use actix_web::{
  HttpMessage, HttpRequest, HttpResponse, HttpResponseBuilder, http::header,
};

use crate::{adapters::http::errors::ApiError, domain::auth::entities::User};

/// Extract authenticated user from request extensions
pub fn get_user(req: &HttpRequest) -> Result<User, ApiError> {
  let user = req.extensions().get::<User>().cloned();

  if user.is_none() {
    tracing::warn!(
      "get_user: User not found in request extensions for path {}",
      req.path()
    );
  }

  user.ok_or(ApiError::Unauthorized)
}

/// Starts a response that sends the browser to `location`.
///
/// htmx requests get `200` with `HX-Redirect`; plain form posts get
/// `303 See Other` so the follow-up is a GET.
pub fn redirect(req: &HttpRequest, location: &str) -> HttpResponseBuilder {
  if req.headers().contains_key("HX-Request") {
    let mut builder = HttpResponse::Ok();
    builder.insert_header(("HX-Redirect", location));
    builder
  } else {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, location));
    builder
  }
}

pub(crate) fn html(status: actix_web::http::StatusCode, body: String) -> HttpResponse {
  HttpResponse::build(status)
    .content_type("text/html; charset=utf-8")
    .body(body)
}
