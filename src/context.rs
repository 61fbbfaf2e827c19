use std::sync::Arc;

use crate::services::TicketDatabaseService;

#[derive(Clone)]
pub struct AppContext {
    pub ticket_database: Arc<dyn TicketDatabaseService>,
}

impl AppContext {
    pub fn new(ticket_database: Arc<dyn TicketDatabaseService>) -> Self {
        Self { ticket_database }
    }
}
