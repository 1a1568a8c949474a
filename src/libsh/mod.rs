pub mod error;
pub mod flog;
pub mod guards;
pub mod sys;
pub mod term;
