use clap::Args;

use crate::context::AppContext;
use crate::domain::form::TicketForm;
use crate::domain::ticket::{
    CreatedTicket, ProblemApplication, SelectOption, Severity, TicketRequest, TicketType,
};
use crate::error::{AppError, AppResult};
use crate::workflow::submit::submit_form;

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    /// Your name.
    #[arg(long)]
    pub name: String,
    /// Application the problem is in (e.g. "Text/Email").
    #[arg(long)]
    pub application: String,
    /// Suggestion, Question or Bug/Issue.
    #[arg(long)]
    pub ticket_type: String,
    /// Low, Medium, High or Extreme.
    #[arg(long)]
    pub severity: String,
    /// Description of the issue.
    #[arg(long)]
    pub description: String,
}

pub async fn run(ctx: &AppContext, args: SubmitArgs) -> AppResult<CreatedTicket> {
    let mut form = TicketForm::new();
    if let Some(request) = form.edit() {
        *request = request_from_args(args)?;
    }
    submit_form(ctx, &mut form).await.into_result()
}

fn request_from_args(args: SubmitArgs) -> AppResult<TicketRequest> {
    Ok(TicketRequest {
        submitter_name: args.name,
        problem_application: parse_option::<ProblemApplication>(&args.application)?,
        ticket_type: parse_option::<TicketType>(&args.ticket_type)?,
        severity: parse_option::<Severity>(&args.severity)?,
        description: args.description,
    })
}

/// Blank stays blank so validation reports it; anything else must name an
/// option.
fn parse_option<T: SelectOption>(value: &str) -> AppResult<Option<T>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    T::from_name(value).map(Some).ok_or_else(|| {
        AppError::Configuration(format!(
            "unknown {} '{}'; expected one of {}",
            T::LABEL,
            value.trim(),
            T::accepted_values()
        ))
    })
}
