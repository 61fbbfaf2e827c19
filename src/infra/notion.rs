use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::domain::ticket::{CreatedTicket, SelectOption, ValidatedTicket};
#[cfg(test)]
use crate::domain::ticket::{ProblemApplication, Severity, TicketRequest, TicketType};
use crate::error::{AppError, AppResult};
use crate::services::TicketDatabaseService;

pub const NOTION_VERSION: &str = "2022-06-28";
const NOTION_VERSION_HEADER: &str = "Notion-Version";

pub struct NotionClient {
    http: Client,
    api_base: String,
    api_key: String,
    database_id: String,
}

impl NotionClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            api_base: config.notion_api_base.clone(),
            api_key: config.notion_api_key.clone(),
            database_id: config.database_id.clone(),
        }
    }

    fn pages_endpoint(api_base: &str) -> String {
        format!("{}/v1/pages", api_base.trim_end_matches('/'))
    }

    fn auth_header(token: &str) -> String {
        format!("Bearer {token}")
    }

    fn build_request(&self, ticket: &ValidatedTicket<'_>) -> RequestBuilder {
        let request_body = NotionCreatePageRequest::new(&self.database_id, ticket);
        self.http
            .post(Self::pages_endpoint(&self.api_base))
            .header(AUTHORIZATION, Self::auth_header(&self.api_key))
            .header(NOTION_VERSION_HEADER, NOTION_VERSION)
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
    }
}

/// Notion reports page creation with 200; anything else counts as a failed
/// submission. The response body is only logged at debug level so it never
/// lands on the terminal of the person filling in the form.
pub(crate) fn check_status(status: StatusCode, body: &str) -> AppResult<()> {
    if status == StatusCode::OK {
        return Ok(());
    }
    error!(status = %status, "Notion rejected ticket submission");
    debug!(status = %status, body, "Notion error response");
    Err(AppError::Submission(format!("Notion responded with {status}")))
}

#[async_trait]
impl TicketDatabaseService for NotionClient {
    async fn create_ticket(&self, ticket: ValidatedTicket<'_>) -> AppResult<CreatedTicket> {
        debug!(api_base = %self.api_base, "submitting ticket to Notion");

        let response = self
            .build_request(&ticket)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "failed to reach Notion");
                AppError::Submission(format!("failed to call Notion: {err}"))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        check_status(status, &body)?;

        let created = match serde_json::from_str::<NotionPageResponse>(&body) {
            Ok(page) => CreatedTicket {
                id: page.id,
                url: page.url,
            },
            Err(err) => {
                warn!(error = %err, "ticket created but Notion response could not be parsed");
                CreatedTicket::default()
            }
        };
        info!(
            page_id = created.id.as_deref().unwrap_or("<unknown>"),
            page_url = created.url.as_deref().unwrap_or("<unknown>"),
            "ticket row created"
        );
        Ok(created)
    }
}

/// Body of `POST /v1/pages` for the ticket database.
#[derive(Debug, Serialize, Deserialize)]
pub struct NotionCreatePageRequest {
    parent: NotionParent,
    properties: NotionTicketProperties,
}

impl NotionCreatePageRequest {
    pub fn new(database_id: &str, ticket: &ValidatedTicket<'_>) -> Self {
        Self {
            parent: NotionParent {
                database_id: database_id.to_string(),
            },
            properties: NotionTicketProperties {
                employee_name: NotionTitle::from_text(ticket.submitter_name),
                problem_application: NotionSelect::from_option(ticket.problem_application),
                ticket_type: NotionSelect::from_option(ticket.ticket_type),
                severity: NotionSelect::from_option(ticket.severity),
                description: NotionRichText::from_text(ticket.description),
            },
        }
    }
}

#[cfg(test)]
impl NotionCreatePageRequest {
    pub fn database_id(&self) -> &str {
        &self.parent.database_id
    }

    /// Reads the form values back out of a page request.
    pub fn into_ticket_request(self) -> TicketRequest {
        let properties = self.properties;
        TicketRequest {
            submitter_name: properties.employee_name.plain_text(),
            problem_application: ProblemApplication::from_name(
                &properties.problem_application.select.name,
            ),
            ticket_type: TicketType::from_name(&properties.ticket_type.select.name),
            severity: Severity::from_name(&properties.severity.select.name),
            description: properties.description.plain_text(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NotionParent {
    database_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct NotionTicketProperties {
    #[serde(rename = "Employee Name")]
    employee_name: NotionTitle,
    #[serde(rename = "Problem Application")]
    problem_application: NotionSelect,
    #[serde(rename = "Ticket Type")]
    ticket_type: NotionSelect,
    #[serde(rename = "Severity")]
    severity: NotionSelect,
    #[serde(rename = "Description")]
    description: NotionRichText,
}

#[derive(Debug, Serialize, Deserialize)]
struct NotionTitle {
    title: Vec<NotionTitleText>,
}

impl NotionTitle {
    fn from_text(content: &str) -> Self {
        Self {
            title: vec![NotionTitleText {
                text: NotionTextContent::new(content),
            }],
        }
    }

    #[cfg(test)]
    fn plain_text(&self) -> String {
        self.title
            .iter()
            .map(|item| item.text.content.as_str())
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NotionTitleText {
    text: NotionTextContent,
}

#[derive(Debug, Serialize, Deserialize)]
struct NotionRichText {
    rich_text: Vec<NotionRichTextItem>,
}

impl NotionRichText {
    fn from_text(content: &str) -> Self {
        Self {
            rich_text: vec![NotionRichTextItem {
                item_type: "text".to_string(),
                text: NotionTextContent::new(content),
            }],
        }
    }

    #[cfg(test)]
    fn plain_text(&self) -> String {
        self.rich_text
            .iter()
            .map(|item| item.text.content.as_str())
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NotionRichTextItem {
    #[serde(rename = "type")]
    item_type: String,
    text: NotionTextContent,
}

#[derive(Debug, Serialize, Deserialize)]
struct NotionTextContent {
    content: String,
}

impl NotionTextContent {
    fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NotionSelect {
    select: NotionSelectName,
}

impl NotionSelect {
    fn from_option<T: SelectOption>(option: T) -> Self {
        Self {
            select: NotionSelectName {
                name: option.as_str().to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NotionSelectName {
    name: String,
}

#[derive(Deserialize)]
struct NotionPageResponse {
    id: Option<String>,
    url: Option<String>,
}
