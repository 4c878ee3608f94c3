pub mod action;
pub mod runtime;
