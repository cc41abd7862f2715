use crate::postgres::people::PersonRepo;
use crate::postgres::{ConnectionDetails, RepoMigrationErr};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use error_stack::{Report, ResultExt};
use std::str::FromStr;
use tokio_postgres::{Client, Config, NoTls};
use tracing::debug;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("./src/postgres/migrations");
}

#[derive(Debug, thiserror::Error)]
#[error("failed to create people repo")]
pub struct RepoCreationErr;

/// Builds a connection pool, brings the schema up to date and hands back a
/// repo running on that pool.
pub async fn create_repo(
    connection_details: ConnectionDetails,
    pool_size: Option<usize>,
) -> Result<PersonRepo, Report<RepoCreationErr>> {
    let config = match connection_details {
        ConnectionDetails::Url(url) => Config::from_str(&url)
            .change_context(RepoCreationErr)
            .attach("invalid postgres connection url")?,
    };

    let mgr_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(config, NoTls, mgr_config);
    let mut pool_builder = Pool::builder(mgr);
    if let Some(pool_size) = pool_size {
        pool_builder = pool_builder.max_size(pool_size);
    }
    debug!("building connection pool..");
    let pool = pool_builder.build().change_context(RepoCreationErr)?;
    debug!("connection pool built, running migrations");

    run_migrations(&pool)
        .await
        .change_context(RepoCreationErr)?;

    PersonRepo::new(pool)
        .await
        .change_context(RepoCreationErr)
}

// the connection is dropped before returning so a pool of size 1 is free
// again for the repo
async fn run_migrations(pool: &Pool) -> Result<(), Report<RepoMigrationErr>> {
    let mut handle = pool.get().await.change_context(RepoMigrationErr)?;

    migrate(&mut **handle).await
}

async fn migrate(client: &mut Client) -> Result<(), Report<RepoMigrationErr>> {
    let report = embedded::migrations::runner()
        .run_async(client)
        .await
        .change_context(RepoMigrationErr)
        .attach("people repo")?;

    debug!("applied {} migration(s)", report.applied_migrations().len());
    Ok(())
}
