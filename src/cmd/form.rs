use std::io::{BufRead, Write};

use crate::cmd::prompt::{PromptAction, read_line};
use crate::context::AppContext;
use crate::domain::form::{FormPhase, Notice, TicketForm};
use crate::domain::ticket::{
    CreatedTicket, ProblemApplication, SelectOption, Severity, TicketRequest, TicketType,
};
use crate::error::AppResult;
use crate::workflow::submit::{SubmitOutcome, submit_form};

const HEADER: &str = "Triark IT Ticket Form";
const INSTRUCTIONS: &str = "To report an issue, fill out the IT ticket form below. \
Only submit once per request.";
const DESCRIPTION_END: &str = ".";
const DESCRIPTION_HINT: &str = "Please describe the issue in detail. \
If applicable, include a job title for me to reference.";

/// Drives one terminal session of the ticket form until the user quits or
/// input ends.
pub async fn run<R: BufRead, W: Write>(
    ctx: &AppContext,
    input: &mut R,
    output: &mut W,
) -> AppResult<()> {
    let mut form = TicketForm::new();

    writeln!(output, "{HEADER}")?;
    writeln!(output, "{INSTRUCTIONS}")?;

    loop {
        match form.phase() {
            FormPhase::Editing => {
                let Some(request) = form.edit() else {
                    continue;
                };
                writeln!(output)?;
                if !edit_fields(request, input, output)? {
                    return Ok(());
                }

                match choose_action(input, output)? {
                    FormAction::Submit => {
                        let outcome = submit_form(ctx, &mut form).await;
                        print_notice(&form, output)?;
                        if let SubmitOutcome::Submitted(CreatedTicket { url: Some(url), .. }) =
                            outcome
                        {
                            writeln!(output, "View ticket: {url}")?;
                        }
                    }
                    FormAction::Edit => {}
                    FormAction::Quit => {
                        if !form.request().is_empty() {
                            writeln!(output, "Discarded unsubmitted ticket.")?;
                        }
                        return Ok(());
                    }
                }
            }
            FormPhase::Submitted => {
                write!(output, "File another ticket? [y/N]: ")?;
                output.flush()?;
                match read_line(input)? {
                    Some(answer) if is_yes(&answer) => form.start_new_ticket(),
                    _ => return Ok(()),
                }
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

enum FormAction {
    Submit,
    Edit,
    Quit,
}

fn choose_action<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> AppResult<FormAction> {
    loop {
        write!(output, "[s]ubmit, [e]dit, [q]uit (default s): ")?;
        output.flush()?;
        let Some(answer) = read_line(input)? else {
            return Ok(FormAction::Quit);
        };
        match answer.to_ascii_lowercase().as_str() {
            "" | "s" | "submit" => return Ok(FormAction::Submit),
            "e" | "edit" => return Ok(FormAction::Edit),
            "q" | "quit" => return Ok(FormAction::Quit),
            other => writeln!(output, "Unknown action '{other}'.")?,
        }
    }
}

fn print_notice<W: Write>(form: &TicketForm, output: &mut W) -> AppResult<()> {
    match form.notice() {
        Some(Notice::Success(message)) => writeln!(output, "{message}")?,
        Some(Notice::Error(message)) => writeln!(output, "Error: {message}")?,
        None => {}
    }
    Ok(())
}

/// Walks the five fields once. Returns `false` if input ended.
fn edit_fields<R: BufRead, W: Write>(
    request: &mut TicketRequest,
    input: &mut R,
    output: &mut W,
) -> AppResult<bool> {
    let Some(action) = prompt_text("Name", &request.submitter_name, input, output)? else {
        return Ok(false);
    };
    action.apply_to(&mut request.submitter_name);

    let Some(choice) = prompt_select::<ProblemApplication, _, _>(
        request.problem_application,
        input,
        output,
    )?
    else {
        return Ok(false);
    };
    request.problem_application = choice;

    let Some(choice) = prompt_select::<TicketType, _, _>(request.ticket_type, input, output)?
    else {
        return Ok(false);
    };
    request.ticket_type = choice;

    let Some(choice) = prompt_select::<Severity, _, _>(request.severity, input, output)? else {
        return Ok(false);
    };
    request.severity = choice;

    let Some(action) = prompt_description(&request.description, input, output)? else {
        return Ok(false);
    };
    action.apply_to(&mut request.description);

    Ok(true)
}

fn prompt_text<R: BufRead, W: Write>(
    field: &str,
    current: &str,
    input: &mut R,
    output: &mut W,
) -> AppResult<Option<PromptAction>> {
    if current.is_empty() {
        write!(output, "{field}: ")?;
    } else {
        write!(output, "{field} [{current}] (Enter to keep, '-' to clear): ")?;
    }
    output.flush()?;

    Ok(read_line(input)?.map(|line| PromptAction::parse(&line)))
}

/// Numbered dropdown; `0` is the blank option.
fn prompt_select<T: SelectOption, R: BufRead, W: Write>(
    current: Option<T>,
    input: &mut R,
    output: &mut W,
) -> AppResult<Option<Option<T>>> {
    writeln!(output, "{}:", T::LABEL)?;
    writeln!(output, "  0) <none>")?;
    for (index, option) in T::ALL.iter().enumerate() {
        writeln!(output, "  {}) {}", index + 1, option.as_str())?;
    }

    loop {
        match current {
            Some(option) => write!(output, "Choose [{}] (Enter to keep): ", option.as_str())?,
            None => write!(output, "Choose: ")?,
        }
        output.flush()?;

        let Some(answer) = read_line(input)? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(Some(current));
        }
        if let Ok(index) = answer.parse::<usize>() {
            match index {
                0 => return Ok(Some(None)),
                n if n <= T::ALL.len() => return Ok(Some(Some(T::ALL[n - 1]))),
                _ => {}
            }
        } else if let Some(option) = T::from_name(&answer) {
            return Ok(Some(Some(option)));
        }
        writeln!(
            output,
            "Unknown choice; enter a number from 0 to {}.",
            T::ALL.len()
        )?;
    }
}

/// Multi-line text ended by a line holding only `.` (or end of input), so
/// blank lines between paragraphs are kept. An empty first line keeps the
/// current text and a lone `-` clears it.
fn prompt_description<R: BufRead, W: Write>(
    current: &str,
    input: &mut R,
    output: &mut W,
) -> AppResult<Option<PromptAction>> {
    writeln!(output, "Description: {DESCRIPTION_HINT}")?;
    if current.is_empty() {
        writeln!(output, "(finish with a line containing only '.')")?;
    } else {
        writeln!(output, "Current:\n{current}")?;
        writeln!(
            output,
            "(Enter to keep, '-' to clear, or type new text and finish with a line containing only '.')"
        )?;
    }
    output.flush()?;

    let Some(first) = read_line(input)? else {
        return Ok(None);
    };
    if first.trim() == DESCRIPTION_END {
        return Ok(Some(PromptAction::Keep));
    }
    match PromptAction::parse(&first) {
        PromptAction::Set(_) => {}
        other => return Ok(Some(other)),
    }

    let mut lines = vec![first];
    while let Some(line) = read_line(input)? {
        if line.trim() == DESCRIPTION_END {
            break;
        }
        lines.push(line);
    }
    Ok(Some(PromptAction::Set(lines.join("\n"))))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use reqwest::StatusCode;

    use super::*;
    use crate::domain::ticket::tests::jane_doe;
    use crate::infra::notion::NotionCreatePageRequest;
    use crate::services::fake::FakeTicketDatabase;

    async fn run_session(status: StatusCode, script: &str) -> (String, Arc<FakeTicketDatabase>) {
        let database = Arc::new(FakeTicketDatabase::responding(status));
        let ctx = AppContext::new(database.clone());
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();

        run(&ctx, &mut input, &mut output)
            .await
            .expect("session runs");

        (String::from_utf8(output).expect("utf-8 output"), database)
    }

    fn sent_tickets(database: &FakeTicketDatabase) -> Vec<TicketRequest> {
        database
            .bodies()
            .iter()
            .map(|body| {
                serde_json::from_str::<NotionCreatePageRequest>(body)
                    .expect("page request")
                    .into_ticket_request()
            })
            .collect()
    }

    #[tokio::test]
    async fn submits_filled_form() {
        let script = "Jane Doe\n1\n3\nHigh\nPrinter jammed\n.\ns\nn\n";

        let (output, database) = run_session(StatusCode::OK, script).await;

        assert!(output.starts_with(HEADER));
        assert!(output.contains("Ticket information submitted successfully."));
        assert!(output.contains("View ticket: https://www.notion.so/page-1"));
        assert_eq!(sent_tickets(&database), vec![jane_doe()]);
    }

    #[tokio::test]
    async fn blank_field_is_rejected_then_corrected() {
        // Severity left blank on the first pass, then chosen while the other
        // answers are kept with Enter.
        let script = concat!(
            "Jane Doe\n1\n3\n\nPrinter jammed\n.\ns\n",
            "\n\n\n3\n\ns\nn\n",
        );

        let (output, database) = run_session(StatusCode::OK, script).await;

        assert!(output.contains("Error: Please fill in all fields."));
        assert!(output.contains("Name [Jane Doe]"));
        assert_eq!(sent_tickets(&database), vec![jane_doe()]);
    }

    #[tokio::test]
    async fn failed_submission_keeps_values_for_retry() {
        let script = "Jane Doe\n1\n3\n3\nPrinter jammed\n.\ns\n\n\n\n\n\ns\n";

        let (output, database) = run_session(StatusCode::INTERNAL_SERVER_ERROR, script).await;

        assert_eq!(
            output.matches("Error: Submission failed, please retry.").count(),
            2
        );
        assert!(!output.contains("submitted successfully"));
        assert_eq!(sent_tickets(&database), vec![jane_doe(), jane_doe()]);
    }

    #[tokio::test]
    async fn files_second_ticket_on_fresh_form() {
        let script = concat!(
            "Jane Doe\n1\n3\n3\nPrinter jammed\n.\ns\ny\n",
            "John Roe\n2\n1\n1\nAdd a template for roof estimates\n.\ns\n",
        );

        let (output, database) = run_session(StatusCode::OK, script).await;

        // The second pass starts blank, so no kept-value hint is shown.
        assert!(!output.contains("Name [Jane Doe]"));
        let tickets = sent_tickets(&database);
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[1].submitter_name, "John Roe");
        assert_eq!(
            tickets[1].problem_application,
            Some(ProblemApplication::DocumentTemplates)
        );
        assert_eq!(tickets[1].severity, Some(Severity::Low));
    }

    #[tokio::test]
    async fn description_keeps_paragraph_breaks() {
        let script = "Jane Doe\n1\n3\n3\nFirst line\n\nSecond paragraph\n.\ns\nn\n";

        let (_, database) = run_session(StatusCode::OK, script).await;

        assert_eq!(
            sent_tickets(&database)[0].description,
            "First line\n\nSecond paragraph"
        );
    }

    #[tokio::test]
    async fn yes_starts_another_ticket() {
        let script = concat!(
            "Jane Doe\n1\n3\n3\nPrinter jammed\n.\ns\nYes\n",
            "Jane Doe\n1\n3\n3\nPrinter jammed\n.\ns\n",
        );

        let (_, database) = run_session(StatusCode::OK, script).await;

        assert_eq!(sent_tickets(&database), vec![jane_doe(), jane_doe()]);
    }

    #[test]
    fn accepts_short_and_long_yes() {
        assert!(is_yes("y"));
        assert!(is_yes("YES"));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }

    #[tokio::test]
    async fn unknown_choice_is_asked_again() {
        let script = "Jane Doe\n9\n1\n3\n3\nPrinter jammed\n.\ns\nn\n";

        let (output, database) = run_session(StatusCode::OK, script).await;

        assert!(output.contains("Unknown choice; enter a number from 0 to 3."));
        assert_eq!(sent_tickets(&database), vec![jane_doe()]);
    }

    #[tokio::test]
    async fn quitting_sends_nothing() {
        let (output, database) =
            run_session(StatusCode::OK, "Jane Doe\n1\n3\n3\nx\n.\nq\n").await;
        assert!(output.contains("Discarded unsubmitted ticket."));
        assert!(database.bodies().is_empty());

        let (_, database) = run_session(StatusCode::OK, "Jane").await;
        assert!(database.bodies().is_empty());
    }
}
