pub mod create_invoice;
pub mod delete_invoice;
pub mod get_invoice_form;
pub mod list_invoices;
pub mod outcome;
pub mod update_invoice;

#[cfg(test)]
pub(crate) mod test_support;

pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceUseCase};
pub use delete_invoice::{DeleteInvoiceCommand, DeleteInvoiceUseCase};
pub use get_invoice_form::{
  CustomerOptionDto, GetInvoiceFormCommand, GetInvoiceFormUseCase, InvoiceFormResponse,
  InvoiceFormValuesDto,
};
pub use list_invoices::{
  InvoiceListItemDto, ListInvoicesCommand, ListInvoicesResponse, ListInvoicesUseCase,
};
pub use outcome::{ActionOutcome, FormState};
pub use update_invoice::{UpdateInvoiceCommand, UpdateInvoiceUseCase};
