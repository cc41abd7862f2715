#[derive(Debug, thiserror::Error)]
#[error("the person service failed")]
pub struct PersonServiceError;
