#[cfg(test)]
pub mod fake;
pub mod ticket_database;

pub use ticket_database::TicketDatabaseService;
