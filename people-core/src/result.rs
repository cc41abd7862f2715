use error_stack::Report;

pub type RepoResult<T> = Result<T, Report<PersonRepoError>>;
pub type OptRepoResult<T> = Result<Option<T>, Report<PersonRepoError>>;

pub type SourceResult<T> = Result<T, Report<PersonSourceError>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersonRepoError {
    #[error("failed to get person")]
    Get,
    #[error("failed to list people")]
    List,
    #[error("failed to read all people")]
    All,
    #[error("failed to save person")]
    Save,
    #[error("failed to replace person")]
    Replace,
    #[error("failed to patch person")]
    Patch,
    #[error("failed to delete person")]
    Delete,
    #[error("failed to check if person exists")]
    Exists,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to fetch people from the external source")]
pub struct PersonSourceError;
