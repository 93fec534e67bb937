//! The public form as an explicit state machine.
//!
//! [`DonationWizard`] is the only mutation path for the collected values,
//! the attached screenshot and the current step. It performs no I/O itself;
//! `submit` hands a borrowed [`Submission`] to whatever [`SubmissionClient`]
//! the caller supplies.

use uuid::Uuid;

use crate::api::error::{SUBMISSION_FALLBACK_MESSAGE, SUBMISSION_SUCCESS_MESSAGE};
use crate::api::submission::{Submission, SubmissionClient};
use crate::core::attachment::AttachedFile;
use crate::core::form::{Field, FieldValue, FormValues, FormVariant, StepInput, WizardStep};
use crate::core::notification::Notification;
use crate::core::pricing::{compute_total, PriceBreakdown, PricingConfig, TicketCount};
use crate::core::validation::FieldErrors;

#[derive(Debug)]
pub struct DonationWizard {
    variant: FormVariant,
    step: WizardStep,
    values: FormValues,
    errors: FieldErrors,
    tickets: TicketCount,
    attachment: Option<AttachedFile>,
    submitting: bool,
    last_error: Option<String>,
    idempotency_key: Uuid,
}

impl DonationWizard {
    pub fn new(variant: FormVariant) -> Self {
        Self {
            variant,
            step: variant.first_step(),
            values: FormValues::initial(variant),
            errors: FieldErrors::default(),
            tickets: TicketCount::default(),
            attachment: None,
            submitting: false,
            last_error: None,
            idempotency_key: Uuid::new_v4(),
        }
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn tickets(&self) -> TicketCount {
        self.tickets
    }

    pub fn attachment(&self) -> Option<&AttachedFile> {
        self.attachment.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Message of the most recent failed submission, cleared on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn idempotency_key(&self) -> Uuid {
        self.idempotency_key
    }

    /// Stores a text value and re-validates that field only. Returns `false`
    /// when the field is not part of this variant or holds a flag.
    pub fn set_text(&mut self, field: Field, value: impl Into<String>) -> bool {
        let value = value.into();
        if !self.values.set(field, FieldValue::Text(value.clone())) {
            return false;
        }
        self.errors.revalidate(field, &value);
        true
    }

    pub fn set_flag(&mut self, field: Field, value: bool) -> bool {
        self.values.set(field, FieldValue::Flag(value))
    }

    pub fn set_tickets(&mut self, tickets: TicketCount) {
        self.tickets = tickets;
    }

    /// Attaches the screenshot, returning the one it replaces.
    pub fn attach(&mut self, file: AttachedFile) -> Option<AttachedFile> {
        self.attachment.replace(file)
    }

    pub fn detach(&mut self) -> Option<AttachedFile> {
        self.attachment.take()
    }

    /// Inputs of `step` that still block leaving it: empty required fields,
    /// fields with a validation message, and a missing screenshot.
    pub fn missing_inputs(&self, step: WizardStep) -> Vec<StepInput> {
        let Some(spec) = self.variant.step_spec(step) else {
            return Vec::new();
        };
        spec.inputs
            .iter()
            .copied()
            .filter(|input| match input {
                StepInput::Required(field) => {
                    !self.values.is_filled(*field) || self.errors.contains(*field)
                }
                StepInput::Optional(field) => self.errors.contains(*field),
                StepInput::Tickets => false,
                StepInput::Screenshot => self.attachment.is_none(),
            })
            .collect()
    }

    pub fn is_step_complete(&self, step: WizardStep) -> bool {
        self.missing_inputs(step).is_empty()
    }

    pub fn is_final_step(&self) -> bool {
        self.step == self.variant.final_step()
    }

    pub fn can_advance(&self) -> bool {
        !self.is_final_step() && self.is_step_complete(self.step)
    }

    /// Moves to the next step. When blocked nothing changes.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        match self.variant.next_step(self.step) {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    /// Moves back one step, keeping every entered value.
    pub fn retreat(&mut self) -> bool {
        match self.variant.previous_step(self.step) {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.is_final_step()
            && !self.submitting
            && self
                .variant
                .steps()
                .iter()
                .all(|spec| self.is_step_complete(spec.step))
    }

    pub fn breakdown(&self, pricing: &PricingConfig) -> PriceBreakdown {
        compute_total(pricing, self.variant.selection(self.tickets))
    }

    /// Back to the first step with empty values, no file and a new
    /// idempotency key.
    pub fn reset(&mut self) {
        *self = Self::new(self.variant);
    }

    /// Sends the form through `client`. Returns `None` without calling the
    /// client when submission is not currently allowed.
    ///
    /// On success the wizard resets; on failure values, file and step are kept
    /// and the message is available from [`last_error`](Self::last_error).
    pub async fn submit<C>(&mut self, client: &C, pricing: &PricingConfig) -> Option<Notification>
    where
        C: SubmissionClient + ?Sized,
    {
        if !self.can_submit() {
            return None;
        }
        let amount = self.breakdown(pricing).total;
        let in_flight = InFlight::start(&mut self.submitting);
        let submission = Submission {
            variant: self.variant,
            values: &self.values,
            tickets: self.variant.uses_tickets().then_some(self.tickets),
            amount,
            screenshot: self.attachment.as_ref(),
            idempotency_key: self.idempotency_key,
        };
        let outcome = client.submit(submission).await;
        drop(in_flight);

        match outcome {
            Ok(receipt) => {
                tracing::info!(
                    record = ?receipt.record.as_ref().map(|record| record.id.to_string()),
                    amount,
                    "submission accepted"
                );
                self.reset();
                Some(Notification::success(SUBMISSION_SUCCESS_MESSAGE))
            }
            Err(err) => {
                err.log("submit donation");
                let message = err.user_message_or(SUBMISSION_FALLBACK_MESSAGE);
                self.last_error = Some(message.clone());
                Some(Notification::error(message))
            }
        }
    }
}

/// Holds the in-flight flag; clears it even when the submit future is
/// dropped before the client answers.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
