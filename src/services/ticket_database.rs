use async_trait::async_trait;

use crate::domain::ticket::{CreatedTicket, ValidatedTicket};
use crate::error::AppResult;

#[async_trait]
pub trait TicketDatabaseService: Send + Sync {
    async fn create_ticket(&self, ticket: ValidatedTicket<'_>) -> AppResult<CreatedTicket>;
}
