pub mod draft;
pub mod form;
pub mod session;
pub mod submission;
pub mod validation;
