use actix_web::{HttpResponse, Resource, http::header, web};
use std::sync::Arc;

use crate::application::auth::{AuthenticateUseCase, LogoutUserUseCase};
use crate::application::invoice::{
  CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceFormUseCase, ListInvoicesUseCase,
  UpdateInvoiceUseCase,
};
use crate::domain::auth::services::AuthService;
use crate::domain::invoice::{INVOICES_PATH, ListingCache};

use super::handlers::{invoices_web, web_auth};
use super::middleware::WebAuthMiddleware;
use super::templates::TemplateEngine;

/// Everything the web routes need, built once at startup and cloned into
/// each worker.
#[derive(Clone)]
pub struct WebRouteDependencies {
  pub templates: TemplateEngine,
  pub auth_service: Arc<AuthService>,
  pub listing_cache: Arc<dyn ListingCache>,
  pub logout_use_case: Arc<LogoutUserUseCase>,
  pub list_invoices_use_case: Arc<ListInvoicesUseCase>,
  pub invoice_form_use_case: Arc<GetInvoiceFormUseCase>,
  pub create_invoice_use_case: Arc<CreateInvoiceUseCase>,
  pub update_invoice_use_case: Arc<UpdateInvoiceUseCase>,
  pub delete_invoice_use_case: Arc<DeleteInvoiceUseCase>,
}

/// The sign-in resource. Mounted by the caller so it can be wrapped in a
/// rate limiter.
///
/// - GET /login - sign-in form
/// - POST /login - sign in
pub fn login_resource(authenticate_use_case: Arc<AuthenticateUseCase>) -> Resource {
  web::resource("/login")
    .app_data(web::Data::new(authenticate_use_case))
    .route(web::get().to(web_auth::login_page))
    .route(web::post().to(web_auth::login_submit))
}

/// Mounts the logout action and the `/dashboard` scope.
///
/// # Routes
///
/// - GET / - redirect to the invoice listing
/// - POST /logout
/// - GET /dashboard/invoices?query=&page= - listing
/// - GET, POST /dashboard/invoices/create
/// - GET, POST /dashboard/invoices/{id}/edit
/// - POST /dashboard/invoices/{id}/delete
pub fn configure_web_routes(cfg: &mut web::ServiceConfig, deps: WebRouteDependencies) {
  cfg.app_data(web::Data::new(deps.templates.clone()));

  cfg
    .route(
      "/",
      web::get().to(|| async {
        HttpResponse::Found()
          .insert_header((header::LOCATION, INVOICES_PATH))
          .finish()
      }),
    )
    .service(
      web::resource("/logout")
        .app_data(web::Data::new(deps.logout_use_case))
        .route(web::post().to(web_auth::logout)),
    );

  cfg.service(
    web::scope("/dashboard")
      .wrap(WebAuthMiddleware::new(deps.auth_service))
      .app_data(web::Data::new(deps.listing_cache))
      .app_data(web::Data::new(deps.list_invoices_use_case))
      .app_data(web::Data::new(deps.invoice_form_use_case))
      .app_data(web::Data::new(deps.create_invoice_use_case))
      .app_data(web::Data::new(deps.update_invoice_use_case))
      .app_data(web::Data::new(deps.delete_invoice_use_case))
      .route(
        "",
        web::get().to(|| async {
          HttpResponse::Found()
            .insert_header((header::LOCATION, INVOICES_PATH))
            .finish()
        }),
      )
      .route("/invoices", web::get().to(invoices_web::invoices_page))
      .route(
        "/invoices/create",
        web::get().to(invoices_web::invoice_create_page),
      )
      .route(
        "/invoices/create",
        web::post().to(invoices_web::invoice_create_submit),
      )
      .route(
        "/invoices/{id}/edit",
        web::get().to(invoices_web::invoice_edit_page),
      )
      .route(
        "/invoices/{id}/edit",
        web::post().to(invoices_web::invoice_edit_submit),
      )
      .route(
        "/invoices/{id}/delete",
        web::post().to(invoices_web::invoice_delete),
      ),
  );
}
