pub mod initializer;
pub mod people;
mod statements;

pub enum ConnectionDetails {
    Url(String),
}

#[derive(Debug, thiserror::Error)]
#[error("failed to initialize postgres people repo")]
pub struct RepoInitErr;

#[derive(Debug, thiserror::Error)]
#[error("failed to run postgres migrations")]
pub struct RepoMigrationErr;
