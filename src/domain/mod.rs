pub mod form;
pub mod ticket;
