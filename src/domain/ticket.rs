use crate::error::{AppError, AppResult};

/// A dropdown field whose blank choice is represented as `None`.
pub trait SelectOption: Copy + Sized + 'static {
    /// Field label as shown on the form and used as the Notion property name.
    const LABEL: &'static str;
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Looks up an option by display name. An empty string is the blank
    /// choice and yields `None`, as does any unknown name.
    fn from_name(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|option| option.as_str().eq_ignore_ascii_case(value))
    }

    fn accepted_values() -> String {
        Self::ALL
            .iter()
            .map(|option| format!("'{}'", option.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemApplication {
    TextEmail,
    DocumentTemplates,
    Automations,
}

impl SelectOption for ProblemApplication {
    const LABEL: &'static str = "Problem Application";
    const ALL: &'static [Self] = &[
        ProblemApplication::TextEmail,
        ProblemApplication::DocumentTemplates,
        ProblemApplication::Automations,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ProblemApplication::TextEmail => "Text/Email",
            ProblemApplication::DocumentTemplates => "JobNimbus Document Templates",
            ProblemApplication::Automations => "JobNimbus Automations",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketType {
    Suggestion,
    Question,
    BugIssue,
}

impl SelectOption for TicketType {
    const LABEL: &'static str = "Ticket Type";
    const ALL: &'static [Self] = &[
        TicketType::Suggestion,
        TicketType::Question,
        TicketType::BugIssue,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            TicketType::Suggestion => "Suggestion",
            TicketType::Question => "Question",
            TicketType::BugIssue => "Bug/Issue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Extreme,
}

impl SelectOption for Severity {
    const LABEL: &'static str = "Severity";
    const ALL: &'static [Self] = &[
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Extreme,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Extreme => "Extreme",
        }
    }
}

/// One IT help-ticket as entered on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketRequest {
    pub submitter_name: String,
    pub problem_application: Option<ProblemApplication>,
    pub ticket_type: Option<TicketType>,
    pub severity: Option<Severity>,
    pub description: String,
}

/// A ticket with every field present. Only obtainable through
/// [`TicketRequest::validate`].
#[derive(Debug, Clone, Copy)]
pub struct ValidatedTicket<'a> {
    pub submitter_name: &'a str,
    pub problem_application: ProblemApplication,
    pub ticket_type: TicketType,
    pub severity: Severity,
    pub description: &'a str,
}

impl TicketRequest {
    pub fn validate(&self) -> AppResult<ValidatedTicket<'_>> {
        if self.submitter_name.trim().is_empty() || self.description.trim().is_empty() {
            return Err(AppError::MissingFields);
        }
        match (self.problem_application, self.ticket_type, self.severity) {
            (Some(problem_application), Some(ticket_type), Some(severity)) => {
                Ok(ValidatedTicket {
                    submitter_name: &self.submitter_name,
                    problem_application,
                    ticket_type,
                    severity,
                    description: &self.description,
                })
            }
            _ => Err(AppError::MissingFields),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Row created in the ticket database.
#[derive(Debug, Clone, Default)]
pub struct CreatedTicket {
    pub id: Option<String>,
    pub url: Option<String>,
}
