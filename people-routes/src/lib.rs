use crate::error::PersonServiceError;
use error_stack::Report;

pub type ServiceResult<T> = Result<T, Report<PersonServiceError>>;
pub type OptServiceResult<T> = Result<Option<T>, Report<PersonServiceError>>;

pub mod error;
pub mod lookup;
pub mod metrics;
pub mod report;
pub mod routes;
pub mod service;
pub mod state;
