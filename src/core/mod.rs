//! Core module containing the request view, the guard trait and errors

pub mod error;
pub mod guard;
pub mod request;

pub use error::{
    ExtrasError, ExtrasResult, MissingRequiredFieldError, RequirementKind, ValidationError,
};
pub use guard::{Guard, GuardSet};
pub use request::{RequestView, RequestViewBuilder};
