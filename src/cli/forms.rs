//! Prompt-driven runner for the donation wizard.
//!
//! The runner walks the step table of the wizard's variant one input at a
//! time. All state lives in [`DonationWizard`]; the runner only translates
//! answers into wizard calls and decides which input to ask for next.

use std::collections::HashMap;
use std::path::Path;

use crate::cli::io;
use crate::cli::output;
use crate::cli::ui::formatting::breakdown_lines;
use crate::cli::ui::prompts::{text_input, TextPromptResult};
use crate::core::attachment::{AttachedFile, MAX_ATTACHMENT_BYTES};
use crate::core::form::{Field, StepInput, WizardStep};
use crate::core::notification::Notification;
use crate::core::pricing::{PricingConfig, TicketCount, MAX_TICKETS, MIN_TICKETS};
use crate::core::wizard::DonationWizard;
use crate::currency::MoneyFormat;
use crate::domain::PaymentLink;

/// High-level lifecycle states emitted by the form runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// Describes how prompts can be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// User supplied a concrete value.
    Value(String),
    /// User chose to keep the current value.
    Keep,
    /// Abort the entire wizard immediately.
    Cancel,
    /// Go back to the previous input.
    Back,
    /// Request additional information for the current input.
    Help,
}

/// Responses accepted when reviewing the collected data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationResponse {
    Confirm,
    Back,
    Cancel,
}

/// Everything an interaction needs to render one prompt.
pub struct PromptContext<'a> {
    pub input: StepInput,
    pub label: &'a str,
    pub default: Option<&'a str>,
    pub options: &'a [String],
    pub step: WizardStep,
    pub step_number: usize,
    pub step_total: usize,
}

/// Review shown before submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSummary {
    pub entries: Vec<(String, String)>,
    pub totals: Vec<String>,
}

impl FormSummary {
    pub fn lines(&self) -> Vec<String> {
        let width = self
            .entries
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        let mut lines: Vec<String> = self
            .entries
            .iter()
            .map(|(label, value)| format!("  {:<width$}  {}", label, value, width = width))
            .collect();
        lines.push(String::new());
        lines.extend(self.totals.iter().cloned());
        lines
    }
}

/// Interaction surface used by the runner. The shell provides a terminal
/// implementation; tests script the answers.
pub trait FormInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse;

    fn confirm(&mut self, summary: &FormSummary) -> ConfirmationResponse;

    fn notify(&mut self, notification: &Notification);
}

/// Terminal implementation backed by the shared prompt component.
pub struct WizardInteraction {
    last_step: Option<WizardStep>,
}

impl WizardInteraction {
    pub fn new() -> Self {
        Self { last_step: None }
    }

    fn print_step_header(&mut self, context: &PromptContext<'_>) {
        if self.last_step != Some(context.step) {
            output::section(format!(
                "Step {} of {}: {}",
                context.step_number, context.step_total, context.step
            ));
            self.last_step = Some(context.step);
        }
    }
}

impl Default for WizardInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl FormInteraction for WizardInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        self.print_step_header(context);
        for option in context.options {
            output::plain(format!("  {}", option));
        }
        let label = match context.default {
            Some(current) if !current.is_empty() => format!("{} [{}]", context.label, current),
            _ => context.label.to_string(),
        };
        output::prompt(&label);
        match text_input(context.label, context.default) {
            Ok(TextPromptResult::Value(value)) => PromptResponse::Value(value),
            Ok(TextPromptResult::Keep) => PromptResponse::Keep,
            Ok(TextPromptResult::Back) => PromptResponse::Back,
            Ok(TextPromptResult::Help) => PromptResponse::Help,
            Ok(TextPromptResult::Cancel) => PromptResponse::Cancel,
            Err(err) => {
                tracing::warn!(error = %err, "prompt failed");
                PromptResponse::Cancel
            }
        }
    }

    fn confirm(&mut self, summary: &FormSummary) -> ConfirmationResponse {
        output::section("Review");
        for line in summary.lines() {
            output::plain(line);
        }
        output::prompt("Type `submit` to send, `:back` to edit or `:cancel` to abort.");
        loop {
            match text_input("Review", None) {
                Ok(TextPromptResult::Value(value)) => {
                    match value.trim().to_ascii_lowercase().as_str() {
                        "submit" | "yes" | "y" => return ConfirmationResponse::Confirm,
                        "edit" => return ConfirmationResponse::Back,
                        "no" | "n" => return ConfirmationResponse::Cancel,
                        _ => io::print_warning("Answer `submit`, `:back` or `:cancel`."),
                    }
                }
                Ok(TextPromptResult::Back) => return ConfirmationResponse::Back,
                Ok(TextPromptResult::Help) | Ok(TextPromptResult::Keep) => {
                    io::print_info("Type `submit` to send the form.")
                }
                Ok(TextPromptResult::Cancel) => return ConfirmationResponse::Cancel,
                Err(err) => {
                    tracing::warn!(error = %err, "review prompt failed");
                    return ConfirmationResponse::Cancel;
                }
            }
        }
    }

    fn notify(&mut self, notification: &Notification) {
        output::notify(notification);
    }
}

/// Utility to present choices while allowing the user to enter either the
/// display label or its numeric index.
#[derive(Clone)]
pub(crate) struct ChoiceMapper<T: Clone> {
    display: Vec<String>,
    values: Vec<T>,
    alias_to_index: HashMap<String, usize>,
}

impl<T: Clone> ChoiceMapper<T> {
    pub(crate) fn from_pairs(pairs: Vec<(String, T)>) -> Self {
        let mut display = Vec::new();
        let mut values = Vec::new();
        let mut alias_to_index = HashMap::new();

        for (idx, (label, value)) in pairs.into_iter().enumerate() {
            let index = idx + 1;
            let display_label = format!("[{}] {}", index, label);
            alias_to_index.insert(index.to_string(), idx);
            alias_to_index.insert(label.to_ascii_lowercase(), idx);
            alias_to_index.insert(display_label.to_ascii_lowercase(), idx);
            display.push(display_label);
            values.push(value);
        }

        Self {
            display,
            values,
            alias_to_index,
        }
    }

    pub(crate) fn options(&self) -> &[String] {
        &self.display
    }

    pub(crate) fn resolve(&self, input: &str) -> Option<&T> {
        let key = input.trim().to_ascii_lowercase();
        self.alias_to_index
            .get(&key)
            .and_then(|index| self.values.get(*index))
    }
}

fn yes_no() -> ChoiceMapper<bool> {
    let mut mapper = ChoiceMapper::from_pairs(vec![("Yes".into(), true), ("No".into(), false)]);
    mapper.alias_to_index.insert("y".into(), 0);
    mapper.alias_to_index.insert("n".into(), 1);
    mapper
}

/// Moves through the wizard's inputs, collecting answers until the final step
/// is reviewed and confirmed.
pub struct DonationFormRunner<'a> {
    pricing: &'a PricingConfig,
    money: &'a MoneyFormat,
    links: ChoiceMapper<String>,
    flags: ChoiceMapper<bool>,
}

impl<'a> DonationFormRunner<'a> {
    pub fn new(pricing: &'a PricingConfig, links: &[PaymentLink], money: &'a MoneyFormat) -> Self {
        let links = ChoiceMapper::from_pairs(
            links
                .iter()
                .map(|link| (link.name.clone(), link.url.clone()))
                .collect(),
        );
        Self {
            pricing,
            money,
            links,
            flags: yes_no(),
        }
    }

    /// Runs from the wizard's current step. `Completed` means every step is
    /// filled in and the review was confirmed; the caller submits.
    pub fn collect<I: FormInteraction>(
        &self,
        wizard: &mut DonationWizard,
        interaction: &mut I,
    ) -> FormResult<()> {
        let needs_link = wizard
            .variant()
            .fields()
            .contains(&Field::PaymentLink);
        if needs_link && self.links.options().is_empty() {
            interaction.notify(&Notification::warning(
                "No payment links are available right now. Use `refresh` and try again.",
            ));
            return FormResult::Cancelled;
        }

        let mut index = 0;
        loop {
            let inputs = self.inputs(wizard);
            if index >= inputs.len() {
                if !wizard.is_final_step() {
                    if wizard.advance() {
                        index = 0;
                        if wizard.step() == WizardStep::Payment {
                            self.announce_total(wizard, interaction);
                        }
                        continue;
                    }
                    index = self.first_blocking_index(wizard, interaction);
                    continue;
                }
                if !wizard.can_submit() {
                    index = self.first_blocking_index(wizard, interaction);
                    continue;
                }
                match interaction.confirm(&self.summary(wizard)) {
                    ConfirmationResponse::Confirm => return FormResult::Completed(()),
                    ConfirmationResponse::Cancel => return FormResult::Cancelled,
                    ConfirmationResponse::Back => {
                        index = self.step_back(wizard, inputs.len());
                        continue;
                    }
                }
            }

            let input = inputs[index];
            match self.ask(wizard, input, interaction) {
                Step::Next => index += 1,
                Step::Again => {}
                Step::Back => index = self.step_back(wizard, index),
                Step::Cancel => return FormResult::Cancelled,
            }
        }
    }

    fn inputs(&self, wizard: &DonationWizard) -> Vec<StepInput> {
        wizard
            .variant()
            .step_spec(wizard.step())
            .map(|spec| spec.inputs.to_vec())
            .unwrap_or_default()
    }

    /// Index of the input before `index`, retreating a step when needed.
    fn step_back(&self, wizard: &mut DonationWizard, index: usize) -> usize {
        if index > 0 {
            return index - 1;
        }
        if wizard.retreat() {
            return self.inputs(wizard).len().saturating_sub(1);
        }
        0
    }

    fn first_blocking_index<I: FormInteraction>(
        &self,
        wizard: &DonationWizard,
        interaction: &mut I,
    ) -> usize {
        let inputs = self.inputs(wizard);
        let missing = wizard.missing_inputs(wizard.step());
        let labels: Vec<&str> = missing.iter().map(|input| input_label(*input)).collect();
        interaction.notify(&Notification::warning(format!(
            "Complete these before continuing: {}",
            labels.join(", ")
        )));
        missing
            .first()
            .and_then(|first| inputs.iter().position(|input| input == first))
            .unwrap_or(0)
    }

    fn ask<I: FormInteraction>(
        &self,
        wizard: &mut DonationWizard,
        input: StepInput,
        interaction: &mut I,
    ) -> Step {
        let current = self.current_value(wizard, input);
        let options: &[String] = match input {
            StepInput::Required(Field::PaymentLink) => self.links.options(),
            StepInput::Required(field) | StepInput::Optional(field) if field.is_flag() => {
                self.flags.options()
            }
            _ => &[],
        };
        let variant = wizard.variant();
        let context = PromptContext {
            input,
            label: input_label(input),
            default: current.as_deref(),
            options,
            step: wizard.step(),
            step_number: variant.step_number(wizard.step()),
            step_total: variant.steps().len(),
        };

        match interaction.prompt_field(&context) {
            PromptResponse::Cancel => Step::Cancel,
            PromptResponse::Back => Step::Back,
            PromptResponse::Help => {
                interaction.notify(&Notification::info(input_help(input)));
                Step::Again
            }
            PromptResponse::Keep => self.keep(wizard, input, interaction),
            PromptResponse::Value(value) => self.apply(wizard, input, &value, interaction),
        }
    }

    fn keep<I: FormInteraction>(
        &self,
        wizard: &DonationWizard,
        input: StepInput,
        interaction: &mut I,
    ) -> Step {
        let blocked = wizard.missing_inputs(wizard.step()).contains(&input);
        if blocked {
            let message = match input.field().and_then(|field| wizard.errors().get(field)) {
                Some(error) => error.to_string(),
                None => format!("{} is required", input_label(input)),
            };
            interaction.notify(&Notification::error(message));
            Step::Again
        } else {
            Step::Next
        }
    }

    fn apply<I: FormInteraction>(
        &self,
        wizard: &mut DonationWizard,
        input: StepInput,
        value: &str,
        interaction: &mut I,
    ) -> Step {
        let value = value.trim();
        match input {
            StepInput::Tickets => match TicketCount::parse(value) {
                Some(count) => {
                    wizard.set_tickets(count);
                    if count.get().to_string() != value {
                        interaction.notify(&Notification::info(format!(
                            "Ticket count adjusted to {}",
                            count.get()
                        )));
                    }
                    self.announce_total(wizard, interaction);
                    Step::Next
                }
                None => {
                    interaction.notify(&Notification::error(format!(
                        "Enter a whole number between {} and {}",
                        MIN_TICKETS, MAX_TICKETS
                    )));
                    Step::Again
                }
            },
            StepInput::Screenshot => match AttachedFile::from_path(Path::new(value)) {
                Ok(file) => {
                    interaction.notify(&Notification::info(format!(
                        "Attached {} ({})",
                        file.name(),
                        file.size_label()
                    )));
                    wizard.attach(file);
                    Step::Next
                }
                Err(err) => {
                    interaction.notify(&Notification::error(err.to_string()));
                    Step::Again
                }
            },
            StepInput::Required(Field::PaymentLink) => match self.links.resolve(value) {
                Some(url) => {
                    wizard.set_text(Field::PaymentLink, url.clone());
                    let total = wizard.breakdown(self.pricing).total;
                    interaction.notify(&Notification::info(format!(
                        "Pay {} at {} then attach a screenshot of the confirmation.",
                        self.money.format(total),
                        url
                    )));
                    Step::Next
                }
                None => {
                    interaction.notify(&Notification::error(
                        "Select one of the listed payment links by number or name.",
                    ));
                    Step::Again
                }
            },
            StepInput::Required(field) | StepInput::Optional(field) if field.is_flag() => {
                match self.flags.resolve(value) {
                    Some(flag) => {
                        wizard.set_flag(field, *flag);
                        Step::Next
                    }
                    None => {
                        interaction.notify(&Notification::error("Answer yes or no."));
                        Step::Again
                    }
                }
            }
            StepInput::Required(field) | StepInput::Optional(field) => {
                wizard.set_text(field, value);
                if let Some(error) = wizard.errors().get(field) {
                    interaction.notify(&Notification::error(error.to_string()));
                    return Step::Again;
                }
                if matches!(input, StepInput::Required(_)) && value.is_empty() {
                    interaction.notify(&Notification::error(format!(
                        "{} is required",
                        field.label()
                    )));
                    return Step::Again;
                }
                Step::Next
            }
        }
    }

    fn current_value(&self, wizard: &DonationWizard, input: StepInput) -> Option<String> {
        match input {
            StepInput::Tickets => Some(wizard.tickets().get().to_string()),
            StepInput::Screenshot => wizard.attachment().map(|file| file.name().to_string()),
            StepInput::Required(field) | StepInput::Optional(field) if field.is_flag() => {
                Some(if wizard.values().flag(field) { "Yes" } else { "No" }.to_string())
            }
            StepInput::Required(field) | StepInput::Optional(field) => {
                let text = wizard.values().text(field);
                (!text.is_empty()).then(|| text.to_string())
            }
        }
    }

    fn announce_total<I: FormInteraction>(&self, wizard: &DonationWizard, interaction: &mut I) {
        let total = wizard.breakdown(self.pricing).total;
        interaction.notify(&Notification::info(format!(
            "Amount due: {}",
            self.money.format(total)
        )));
    }

    fn summary(&self, wizard: &DonationWizard) -> FormSummary {
        let mut entries: Vec<(String, String)> = wizard
            .variant()
            .steps()
            .iter()
            .flat_map(|spec| spec.inputs.iter().copied())
            .filter_map(|input| {
                self.current_value(wizard, input)
                    .map(|value| (input_label(input).to_string(), value))
            })
            .collect();
        if let Some(file) = wizard.attachment() {
            if let Some(entry) = entries
                .iter_mut()
                .find(|(label, _)| label == input_label(StepInput::Screenshot))
            {
                entry.1 = format!("{} ({})", file.name(), file.size_label());
            }
        }
        FormSummary {
            entries,
            totals: breakdown_lines(&wizard.breakdown(self.pricing), self.money),
        }
    }
}

/// Collects, reviews and submits until the backend accepts the form or the
/// user cancels. A failed submission keeps every answer and returns to the
/// review so the user can retry.
pub fn run_donation<I, F>(
    runner: &DonationFormRunner<'_>,
    wizard: &mut DonationWizard,
    interaction: &mut I,
    mut submit: F,
) -> FormResult<Notification>
where
    I: FormInteraction,
    F: FnMut(&mut DonationWizard) -> Option<Notification>,
{
    loop {
        if runner.collect(wizard, interaction) == FormResult::Cancelled {
            return FormResult::Cancelled;
        }
        match submit(wizard) {
            Some(notification) if !notification.is_error() => {
                return FormResult::Completed(notification)
            }
            Some(notification) => {
                interaction.notify(&notification);
                interaction.notify(&Notification::info(
                    "Your answers were kept. Review and submit again, or `:cancel`.",
                ));
            }
            None => return FormResult::Cancelled,
        }
    }
}

enum Step {
    Next,
    Again,
    Back,
    Cancel,
}

fn input_label(input: StepInput) -> &'static str {
    match input {
        StepInput::Required(field) | StepInput::Optional(field) => field.label(),
        StepInput::Tickets => "Number of tickets",
        StepInput::Screenshot => "Payment screenshot",
    }
}

fn input_help(input: StepInput) -> String {
    match input {
        StepInput::Required(field) => format!("{} Required.", field.help()),
        StepInput::Optional(field) => format!("{} Optional; leave empty to skip.", field.help()),
        StepInput::Tickets => format!("Between {} and {} tickets.", MIN_TICKETS, MAX_TICKETS),
        StepInput::Screenshot => format!(
            "Path to a PNG, JPEG, GIF or WebP image of the payment confirmation, up to {} MB.",
            MAX_ATTACHMENT_BYTES / (1024 * 1024)
        ),
    }
}
