//! Field catalogue and per-variant step tables for the public form.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::pricing::{Selection, TicketCount};
use crate::core::validation::FieldKind;
use crate::domain::PricingMode;

/// Every input the public form can collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    TeamName,
    ParticipantOne,
    ParticipantTwo,
    Email,
    Phone,
    SecondaryPhone,
    Location,
    Address,
    Zone,
    Diocese,
    HowHeard,
    PreviousParticipation,
    PaymentLink,
}

impl Field {
    /// Multipart key expected by the backend.
    pub fn key(&self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::TeamName => "teamName",
            Field::ParticipantOne => "participant1Name",
            Field::ParticipantTwo => "participant2Name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::SecondaryPhone => "secondaryPhone",
            Field::Location => "location",
            Field::Address => "address",
            Field::Zone => "zone",
            Field::Diocese => "diocese",
            Field::HowHeard => "howHeard",
            Field::PreviousParticipation => "participatedBefore",
            Field::PaymentLink => "paymentLinkUsed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::FullName => "Full name",
            Field::TeamName => "Team name",
            Field::ParticipantOne => "First participant",
            Field::ParticipantTwo => "Second participant",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::SecondaryPhone => "Secondary phone",
            Field::Location => "Location",
            Field::Address => "Address",
            Field::Zone => "Zone",
            Field::Diocese => "Diocese",
            Field::HowHeard => "How did you hear about us?",
            Field::PreviousParticipation => "Participated before?",
            Field::PaymentLink => "Payment link",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::FullName | Field::TeamName | Field::ParticipantOne | Field::ParticipantTwo => {
                FieldKind::Name
            }
            Field::Email => FieldKind::Email,
            Field::Phone | Field::SecondaryPhone => FieldKind::Phone,
            Field::Zone => FieldKind::Zone,
            Field::PaymentLink | Field::PreviousParticipation => FieldKind::Choice,
            Field::Location | Field::Address | Field::Diocese | Field::HowHeard => FieldKind::Text,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, Field::PreviousParticipation)
    }

    pub fn help(&self) -> &'static str {
        match self.kind() {
            FieldKind::Name => "Up to 25 characters.",
            FieldKind::Zone => "Up to 15 characters.",
            FieldKind::Phone => "Digits only, at most 11 (e.g. 09112345678).",
            FieldKind::Email => "Tickets and confirmations are sent here.",
            FieldKind::Choice if self.is_flag() => "Answer yes or no.",
            FieldKind::Choice => "Pick one of the listed options by number or name.",
            FieldKind::Text => "Free text.",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    /// Wire representation; flags become `"true"` / `"false"`.
    pub fn as_wire(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Flag(flag) => flag.to_string(),
        }
    }
}

/// Collected values keyed by field; the key set is fixed by the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<Field, FieldValue>,
}

impl FormValues {
    pub fn initial(variant: FormVariant) -> Self {
        let values = variant
            .fields()
            .into_iter()
            .map(|field| {
                let value = if field.is_flag() {
                    FieldValue::Flag(false)
                } else {
                    FieldValue::Text(String::new())
                };
                (field, value)
            })
            .collect();
        Self { values }
    }

    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    pub fn text(&self, field: Field) -> &str {
        match self.values.get(&field) {
            Some(FieldValue::Text(text)) => text,
            _ => "",
        }
    }

    pub fn flag(&self, field: Field) -> bool {
        matches!(self.values.get(&field), Some(FieldValue::Flag(true)))
    }

    pub fn is_filled(&self, field: Field) -> bool {
        match self.values.get(&field) {
            Some(FieldValue::Text(text)) => !text.trim().is_empty(),
            Some(FieldValue::Flag(_)) => true,
            None => false,
        }
    }

    /// Stores a value for a field the variant owns. Returns `false` when the
    /// field is foreign to the variant or the value shape does not match.
    pub(crate) fn set(&mut self, field: Field, value: FieldValue) -> bool {
        let Some(slot) = self.values.get_mut(&field) else {
            return false;
        };
        if std::mem::discriminant(slot) != std::mem::discriminant(&value) {
            return false;
        }
        *slot = value;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Details,
    Payment,
    Review,
}

impl WizardStep {
    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Details => "Your Info",
            WizardStep::Payment => "Payment",
            WizardStep::Review => "Confirm",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One input gathered on a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepInput {
    Required(Field),
    Optional(Field),
    Tickets,
    Screenshot,
}

impl StepInput {
    pub fn field(&self) -> Option<Field> {
        match self {
            StepInput::Required(field) | StepInput::Optional(field) => Some(*field),
            StepInput::Tickets | StepInput::Screenshot => None,
        }
    }
}

#[derive(Debug)]
pub struct StepSpec {
    pub step: WizardStep,
    pub inputs: &'static [StepInput],
}

impl StepSpec {
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.inputs.iter().filter_map(StepInput::field)
    }
}

const TICKET_STEPS: &[StepSpec] = &[
    StepSpec {
        step: WizardStep::Details,
        inputs: &[
            StepInput::Required(Field::FullName),
            StepInput::Required(Field::Email),
            StepInput::Required(Field::Phone),
            StepInput::Required(Field::Location),
            StepInput::Tickets,
        ],
    },
    StepSpec {
        step: WizardStep::Payment,
        inputs: &[StepInput::Required(Field::PaymentLink), StepInput::Screenshot],
    },
    StepSpec {
        step: WizardStep::Review,
        inputs: &[],
    },
];

const TEAM_STEPS: &[StepSpec] = &[
    StepSpec {
        step: WizardStep::Details,
        inputs: &[
            StepInput::Required(Field::TeamName),
            StepInput::Required(Field::ParticipantOne),
            StepInput::Required(Field::ParticipantTwo),
            StepInput::Required(Field::Email),
            StepInput::Required(Field::Phone),
            StepInput::Optional(Field::SecondaryPhone),
            StepInput::Required(Field::Address),
            StepInput::Required(Field::Zone),
            StepInput::Required(Field::Diocese),
            StepInput::Optional(Field::HowHeard),
            StepInput::Optional(Field::PreviousParticipation),
        ],
    },
    StepSpec {
        step: WizardStep::Payment,
        inputs: &[StepInput::Required(Field::PaymentLink), StepInput::Screenshot],
    },
];

/// Which flavour of the public form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormVariant {
    TicketDonation,
    TeamRegistration,
}

impl FormVariant {
    pub fn for_mode(mode: PricingMode) -> Self {
        match mode {
            PricingMode::PerTicket => FormVariant::TicketDonation,
            PricingMode::PerTeam => FormVariant::TeamRegistration,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "tickets" | "ticket" | "donation" => Some(FormVariant::TicketDonation),
            "team" | "registration" => Some(FormVariant::TeamRegistration),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormVariant::TicketDonation => "Ticket donation",
            FormVariant::TeamRegistration => "Team registration",
        }
    }

    pub fn steps(&self) -> &'static [StepSpec] {
        match self {
            FormVariant::TicketDonation => TICKET_STEPS,
            FormVariant::TeamRegistration => TEAM_STEPS,
        }
    }

    pub fn step_spec(&self, step: WizardStep) -> Option<&'static StepSpec> {
        self.steps().iter().find(|spec| spec.step == step)
    }

    pub fn first_step(&self) -> WizardStep {
        WizardStep::Details
    }

    pub fn final_step(&self) -> WizardStep {
        match self {
            FormVariant::TicketDonation => WizardStep::Review,
            FormVariant::TeamRegistration => WizardStep::Payment,
        }
    }

    pub fn next_step(&self, step: WizardStep) -> Option<WizardStep> {
        let steps = self.steps();
        let index = steps.iter().position(|spec| spec.step == step)?;
        steps.get(index + 1).map(|spec| spec.step)
    }

    pub fn previous_step(&self, step: WizardStep) -> Option<WizardStep> {
        let steps = self.steps();
        let index = steps.iter().position(|spec| spec.step == step)?;
        index.checked_sub(1).map(|prev| steps[prev].step)
    }

    /// 1-based position of the step, as shown in the progress line.
    pub fn step_number(&self, step: WizardStep) -> usize {
        self.steps()
            .iter()
            .position(|spec| spec.step == step)
            .map_or(0, |index| index + 1)
    }

    pub fn fields(&self) -> Vec<Field> {
        self.steps().iter().flat_map(StepSpec::fields).collect()
    }

    pub fn uses_tickets(&self) -> bool {
        matches!(self, FormVariant::TicketDonation)
    }

    pub fn selection(&self, tickets: TicketCount) -> Selection {
        match self {
            FormVariant::TicketDonation => Selection::Tickets(tickets),
            FormVariant::TeamRegistration => Selection::Team,
        }
    }
}

impl fmt::Display for FormVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_variant_has_three_steps() {
        let variant = FormVariant::TicketDonation;
        assert_eq!(variant.steps().len(), 3);
        assert_eq!(variant.next_step(WizardStep::Details), Some(WizardStep::Payment));
        assert_eq!(variant.next_step(WizardStep::Review), None);
        assert_eq!(variant.previous_step(WizardStep::Details), None);
        assert_eq!(variant.step_number(WizardStep::Review), 3);
    }

    #[test]
    fn team_variant_submits_from_payment() {
        let variant = FormVariant::TeamRegistration;
        assert_eq!(variant.final_step(), WizardStep::Payment);
        assert_eq!(variant.step_spec(WizardStep::Review).map(|s| s.step), None);
        assert!(variant.fields().contains(&Field::Diocese));
        assert!(!variant.fields().contains(&Field::FullName));
    }

    #[test]
    fn values_reject_foreign_fields() {
        let mut values = FormValues::initial(FormVariant::TicketDonation);
        assert!(values.set(Field::FullName, FieldValue::Text("Ana".into())));
        assert!(!values.set(Field::Zone, FieldValue::Text("North".into())));
        assert!(!values.set(Field::FullName, FieldValue::Flag(true)));
        assert_eq!(values.text(Field::FullName), "Ana");
    }

    #[test]
    fn flags_start_false_and_count_as_filled() {
        let values = FormValues::initial(FormVariant::TeamRegistration);
        assert!(!values.flag(Field::PreviousParticipation));
        assert!(values.is_filled(Field::PreviousParticipation));
        assert!(!values.is_filled(Field::TeamName));
    }
}
