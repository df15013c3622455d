//! External API clients

pub mod invoice_extraction;

pub use invoice_extraction::InvoiceExtractionClient;
