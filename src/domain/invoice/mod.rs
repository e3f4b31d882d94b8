pub mod entities;
pub mod errors;
pub mod form;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Customer, Invoice, InvoiceListItem, NewInvoice};
pub use errors::InvoiceError;
pub use form::{FieldErrors, InvoiceFields, InvoiceForm};
pub use ports::{CacheLookup, CacheStamp, CustomerRepository, InvoiceRepository, ListingCache};
pub use services::{INVOICES_PATH, ITEMS_PER_PAGE, InvoicePage, InvoiceService};
pub use value_objects::{AmountInCents, CustomerId, InvoiceId, InvoiceStatus, ValueObjectError};
