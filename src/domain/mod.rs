pub mod common;
pub mod payment_link;
pub mod settings;
pub mod submission;

pub use common::{split_labels, RecordId};
pub use payment_link::{PaymentLink, PaymentLinkDraft};
pub use settings::{Banner, OrganizationSettings, PricingMode, TicketPrice, EDITABLE_SETTINGS};
pub use submission::{StatusUpdate, SubmissionPage, SubmissionRecord, SubmissionStatus};
