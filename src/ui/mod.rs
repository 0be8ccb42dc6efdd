//! Front-end layer.
//!
//! The pipeline never talks to a terminal directly; it goes through the
//! [`PackagerUi`](crate::services::packaging::PackagerUi) collaborator trait.
//! [`ConsoleUi`] is the shipped implementation.

pub mod prompt;

pub use prompt::ConsoleUi;
