mod invoice;
mod phone_update;

pub use invoice::{Amount, DueDate, InvoiceRecord, InvoiceRow};
pub use phone_update::{PhoneUpdate, PhoneUpdateFile};
