use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::domain::ticket::{CreatedTicket, ValidatedTicket};
use crate::error::AppResult;
use crate::infra::notion::{NotionCreatePageRequest, check_status};
use crate::services::TicketDatabaseService;

pub const FAKE_DATABASE_ID: &str = "test-db";

/// Stands in for the Notion endpoint: records each request body it would
/// have sent and answers with a fixed status.
pub struct FakeTicketDatabase {
    status: StatusCode,
    bodies: Mutex<Vec<String>>,
}

impl FakeTicketDatabase {
    pub fn responding(status: StatusCode) -> Self {
        Self {
            status,
            bodies: Mutex::new(Vec::new()),
        }
    }

    pub fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketDatabaseService for FakeTicketDatabase {
    async fn create_ticket(&self, ticket: ValidatedTicket<'_>) -> AppResult<CreatedTicket> {
        let body = serde_json::to_string(&NotionCreatePageRequest::new(FAKE_DATABASE_ID, &ticket))
            .unwrap();
        self.bodies.lock().unwrap().push(body);
        check_status(self.status, "{\"object\":\"error\"}")?;
        Ok(CreatedTicket {
            id: Some("page-1".to_string()),
            url: Some("https://www.notion.so/page-1".to_string()),
        })
    }
}
