use actix_web::{
  HttpRequest, HttpResponse,
  cookie::{Cookie, SameSite, time::Duration},
  http::StatusCode,
  web,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use super::{html, redirect};
use crate::adapters::http::{
  errors::ApiError, middleware::SESSION_COOKIE, templates::TemplateEngine,
};
use crate::application::auth::{
  AuthenticateCommand, AuthenticateOutcome, AuthenticateUseCase, LogoutUserUseCase,
};
use crate::domain::auth::CredentialsForm;
use crate::domain::invoice::INVOICES_PATH;

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
  #[serde(rename = "redirectTo")]
  redirect_to: Option<String>,
}

/// Only same-site absolute paths are followed after sign-in. Browsers drop
/// control characters from URLs, so any of them rejects the target.
fn local_redirect(target: Option<&str>) -> &str {
  match target {
    Some(path)
      if path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(|c| c.is_ascii_control()) =>
    {
      path
    }
    _ => INVOICES_PATH,
  }
}

fn render_login(
  templates: &TemplateEngine,
  status: StatusCode,
  message: Option<&str>,
  email: &str,
  redirect_to: &str,
) -> Result<HttpResponse, ApiError> {
  let mut context = tera::Context::new();
  context.insert("message", &message);
  context.insert("email", email);
  context.insert("redirect_to", redirect_to);

  let body = templates.render("pages/login.html.tera", &context)?;
  Ok(html(status, body))
}

// GET /login
pub async fn login_page(
  query: web::Query<LoginQuery>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, ApiError> {
  let redirect_to = local_redirect(query.redirect_to.as_deref());
  render_login(&templates, StatusCode::OK, None, "", redirect_to)
}

// POST /login
pub async fn login_submit(
  req: HttpRequest,
  form: web::Form<CredentialsForm>,
  use_case: web::Data<Arc<AuthenticateUseCase>>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, ApiError> {
  let credentials = form.into_inner();
  let redirect_to = local_redirect(credentials.redirect_to.as_deref()).to_string();
  let email = credentials.email.clone();

  let outcome = use_case
    .execute(AuthenticateCommand {
      previous_state: None,
      credentials,
    })
    .await?;

  match outcome {
    AuthenticateOutcome::SignedIn(grant) => {
      let max_age = (grant.expires_at - Utc::now()).num_seconds().max(0);
      let cookie = Cookie::build(SESSION_COOKIE, grant.token.into_inner())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age))
        .finish();

      Ok(redirect(&req, &redirect_to).cookie(cookie).finish())
    }
    AuthenticateOutcome::Failed(message) => render_login(
      &templates,
      StatusCode::UNAUTHORIZED,
      Some(message),
      &email,
      &redirect_to,
    ),
  }
}

// POST /logout
pub async fn logout(
  req: HttpRequest,
  use_case: web::Data<Arc<LogoutUserUseCase>>,
) -> HttpResponse {
  if let Some(cookie) = req.cookie(SESSION_COOKIE) {
    if let Err(e) = use_case.execute(cookie.value().to_string()).await {
      tracing::warn!("Failed to end session on logout: {}", e);
    }
  }

  let mut cleared = Cookie::build(SESSION_COOKIE, "")
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .finish();
  cleared.make_removal();

  redirect(&req, "/login").cookie(cleared).finish()
}
