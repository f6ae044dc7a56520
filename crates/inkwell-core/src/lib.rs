//! # Inkwell Core
//!
//! The domain layer of the Inkwell blogging API: entities, mappers to the
//! wire DTOs, repository ports and the services that tie them together.
//! This crate has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod mapper;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
