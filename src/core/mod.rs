pub mod attachment;
pub mod form;
pub mod notification;
pub mod pricing;
pub mod services;
pub mod validation;
pub mod wizard;

pub use attachment::{AttachedFile, AttachmentError};
pub use form::{Field, FieldValue, FormValues, FormVariant, StepInput, WizardStep};
pub use notification::{Notification, Severity};
pub use pricing::{compute_total, PriceBreakdown, PricingConfig, Selection, TicketCount};
pub use validation::{validate, FieldErrors, FieldKind};
pub use wizard::DonationWizard;
