pub mod config;
pub mod form;
pub mod prompt;
pub mod submit;
