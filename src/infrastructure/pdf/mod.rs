//! PDF document rendering.

mod invoice;

pub use invoice::{render_invoice, InvoiceDocument, InvoiceLine, PdfError};
