use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use serde::Serialize;
use std::sync::Arc;

use super::{get_user, html, redirect};
use crate::adapters::http::{errors::ApiError, templates::TemplateEngine};
use crate::application::invoice::{
  ActionOutcome, CreateInvoiceCommand, CreateInvoiceUseCase, DeleteInvoiceCommand,
  DeleteInvoiceUseCase, FormState, GetInvoiceFormCommand, GetInvoiceFormUseCase,
  ListInvoicesCommand, ListInvoicesUseCase, UpdateInvoiceCommand, UpdateInvoiceUseCase,
};
use crate::domain::invoice::{CacheLookup, INVOICES_PATH, InvoiceForm, InvoiceId, ListingCache};

/// Values echoed back into the form inputs
#[derive(Debug, Default, Serialize)]
struct FormValues {
  customer_id: String,
  amount: String,
  status: String,
}

impl From<&InvoiceForm> for FormValues {
  fn from(form: &InvoiceForm) -> Self {
    Self {
      customer_id: form.customer_id.clone(),
      amount: form.amount.clone(),
      status: form.status.clone(),
    }
  }
}

/// Cache variant for one listing view
fn listing_variant(command: &ListInvoicesCommand) -> String {
  let page = command.page.unwrap_or(1).max(1).to_string();
  serde_urlencoded::to_string([("query", command.query.trim()), ("page", page.as_str())])
    .unwrap_or_default()
}

// GET /dashboard/invoices - searchable, paginated listing
pub async fn invoices_page(
  query: web::Query<ListInvoicesCommand>,
  templates: web::Data<TemplateEngine>,
  list_invoices_use_case: web::Data<Arc<ListInvoicesUseCase>>,
  listing_cache: web::Data<Arc<dyn ListingCache>>,
) -> Result<HttpResponse, ApiError> {
  let command = query.into_inner();
  let variant = listing_variant(&command);

  let stamp = match listing_cache.get(INVOICES_PATH, &variant).await {
    CacheLookup::Hit(cached) => {
      tracing::debug!("Serving cached listing for {}", variant);
      return Ok(html(StatusCode::OK, cached));
    }
    CacheLookup::Miss(stamp) => stamp,
  };

  let response = list_invoices_use_case.execute(command).await?;

  let mut context = tera::Context::new();
  context.insert("invoices", &response.invoices);
  context.insert("query", &response.query);
  context.insert("current_page", &response.current_page);
  context.insert("total_pages", &response.total_pages);

  let body = templates.render("pages/invoices.html.tera", &context)?;
  if let Some(stamp) = stamp {
    listing_cache
      .put(INVOICES_PATH, &variant, stamp, body.clone())
      .await;
  }

  Ok(html(StatusCode::OK, body))
}

async fn render_form(
  templates: &TemplateEngine,
  form_use_case: &GetInvoiceFormUseCase,
  invoice_id: Option<InvoiceId>,
  values: Option<FormValues>,
  state: Option<FormState>,
  status: StatusCode,
) -> Result<HttpResponse, ApiError> {
  // Stored values are only needed when nothing was posted
  let lookup = match values {
    Some(_) => None,
    None => invoice_id.clone(),
  };
  let response = form_use_case
    .execute(GetInvoiceFormCommand { invoice_id: lookup })
    .await?;

  let values = values.unwrap_or_else(|| match response.invoice {
    Some(invoice) => FormValues {
      customer_id: invoice.customer_id,
      amount: invoice.amount,
      status: invoice.status,
    },
    None => FormValues::default(),
  });

  let action = match &invoice_id {
    Some(id) => format!("{}/{}/edit", INVOICES_PATH, id),
    None => format!("{}/create", INVOICES_PATH),
  };

  let mut context = tera::Context::new();
  context.insert("customers", &response.customers);
  context.insert("values", &values);
  context.insert("action", &action);
  context.insert("editing", &invoice_id.is_some());
  if let Some(state) = state {
    context.insert("state", &state);
  }

  let body = templates.render("pages/invoice_form.html.tera", &context)?;
  Ok(html(status, body))
}

/// Re-renders the form for a failed action, or redirects on success.
async fn respond_to_outcome(
  req: &HttpRequest,
  outcome: ActionOutcome,
  form: &InvoiceForm,
  invoice_id: Option<InvoiceId>,
  templates: &TemplateEngine,
  form_use_case: &GetInvoiceFormUseCase,
) -> Result<HttpResponse, ApiError> {
  let status = match &outcome {
    ActionOutcome::PersistedAndRedirect(path) => return Ok(redirect(req, path).finish()),
    ActionOutcome::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
    ActionOutcome::PersistenceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
  };

  render_form(
    templates,
    form_use_case,
    invoice_id,
    Some(FormValues::from(form)),
    outcome.form_state(),
    status,
  )
  .await
}

// GET /dashboard/invoices/create
pub async fn invoice_create_page(
  templates: web::Data<TemplateEngine>,
  form_use_case: web::Data<Arc<GetInvoiceFormUseCase>>,
) -> Result<HttpResponse, ApiError> {
  render_form(&templates, &form_use_case, None, None, None, StatusCode::OK).await
}

// POST /dashboard/invoices/create
pub async fn invoice_create_submit(
  req: HttpRequest,
  form: web::Form<InvoiceForm>,
  templates: web::Data<TemplateEngine>,
  create_invoice_use_case: web::Data<Arc<CreateInvoiceUseCase>>,
  form_use_case: web::Data<Arc<GetInvoiceFormUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let form = form.into_inner();

  let outcome = create_invoice_use_case
    .execute(CreateInvoiceCommand { form: form.clone() })
    .await;

  respond_to_outcome(&req, outcome, &form, None, &templates, &form_use_case).await
}

// GET /dashboard/invoices/{id}/edit
pub async fn invoice_edit_page(
  path: web::Path<String>,
  templates: web::Data<TemplateEngine>,
  form_use_case: web::Data<Arc<GetInvoiceFormUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoice_id = InvoiceId::from(path.into_inner());
  render_form(
    &templates,
    &form_use_case,
    Some(invoice_id),
    None,
    None,
    StatusCode::OK,
  )
  .await
}

// POST /dashboard/invoices/{id}/edit
pub async fn invoice_edit_submit(
  req: HttpRequest,
  path: web::Path<String>,
  form: web::Form<InvoiceForm>,
  templates: web::Data<TemplateEngine>,
  update_invoice_use_case: web::Data<Arc<UpdateInvoiceUseCase>>,
  form_use_case: web::Data<Arc<GetInvoiceFormUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoice_id = InvoiceId::from(path.into_inner());
  let form = form.into_inner();

  let outcome = update_invoice_use_case
    .execute(UpdateInvoiceCommand {
      invoice_id: invoice_id.clone(),
      form: form.clone(),
    })
    .await;

  respond_to_outcome(
    &req,
    outcome,
    &form,
    Some(invoice_id),
    &templates,
    &form_use_case,
  )
  .await
}

// POST /dashboard/invoices/{id}/delete
pub async fn invoice_delete(
  req: HttpRequest,
  path: web::Path<String>,
  delete_invoice_use_case: web::Data<Arc<DeleteInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = get_user(&req)?;
  let invoice_id = InvoiceId::from(path.into_inner());

  delete_invoice_use_case
    .execute(DeleteInvoiceCommand {
      invoice_id: invoice_id.clone(),
    })
    .await?;

  tracing::info!("User {} deleted invoice {}", user.id, invoice_id);
  Ok(redirect(&req, INVOICES_PATH).finish())
}
