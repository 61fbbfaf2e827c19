use crate::domain::ticket::TicketRequest;

pub const SUBMITTED_MESSAGE: &str = "Ticket information submitted successfully.";
pub const SUBMISSION_FAILED_MESSAGE: &str = "Submission failed, please retry.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Form session: the ticket being edited plus where the user is in the
/// edit/submit cycle.
#[derive(Debug, Clone)]
pub struct TicketForm {
    request: TicketRequest,
    phase: FormPhase,
    notice: Option<Notice>,
}

impl Default for TicketForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketForm {
    pub fn new() -> Self {
        Self {
            request: TicketRequest::default(),
            phase: FormPhase::Editing,
            notice: None,
        }
    }

    pub fn request(&self) -> &TicketRequest {
        &self.request
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Mutable access to the fields. A submitted form is read-only until
    /// [`TicketForm::start_new_ticket`] is called.
    pub fn edit(&mut self) -> Option<&mut TicketRequest> {
        match self.phase {
            FormPhase::Editing => Some(&mut self.request),
            FormPhase::Submitted => None,
        }
    }

    pub fn mark_submitted(&mut self) {
        self.request.reset();
        self.phase = FormPhase::Submitted;
        self.notice = Some(Notice::Success(SUBMITTED_MESSAGE.to_string()));
    }

    pub fn reject(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Error(message.into()));
    }

    pub fn start_new_ticket(&mut self) {
        self.request.reset();
        self.phase = FormPhase::Editing;
        self.notice = None;
    }
}
