use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::form::{SUBMISSION_FAILED_MESSAGE, TicketForm};
use crate::domain::ticket::CreatedTicket;
use crate::error::{AppError, AppResult};

#[derive(Debug)]
pub enum SubmitOutcome {
    /// A field was blank; nothing was sent.
    Invalid,
    Failed(AppError),
    Submitted(CreatedTicket),
}

/// Validates the form, sends it to the ticket database and moves the form to
/// its next state. Fields are only cleared after a successful submission.
pub async fn submit_form(ctx: &AppContext, form: &mut TicketForm) -> SubmitOutcome {
    let result = match form.request().validate() {
        Ok(ticket) => ctx.ticket_database.create_ticket(ticket).await,
        Err(err) => {
            form.reject(err.to_string());
            return SubmitOutcome::Invalid;
        }
    };

    match result {
        Ok(created) => {
            info!(page_id = created.id.as_deref().unwrap_or("<unknown>"), "ticket submitted");
            form.mark_submitted();
            SubmitOutcome::Submitted(created)
        }
        Err(err) => {
            warn!(error = %err, "ticket submission failed; keeping form values");
            form.reject(SUBMISSION_FAILED_MESSAGE);
            SubmitOutcome::Failed(err)
        }
    }
}

impl SubmitOutcome {
    pub fn into_result(self) -> AppResult<CreatedTicket> {
        match self {
            SubmitOutcome::Invalid => Err(AppError::MissingFields),
            SubmitOutcome::Failed(err) => Err(err),
            SubmitOutcome::Submitted(created) => Ok(created),
        }
    }
}
