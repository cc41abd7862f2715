use dotenv::dotenv;
use engine::app::{AppError, AppProperties, AppResult};
use error_stack::ResultExt;
use error_stack::fmt::ColorMode;
use people_app::AppEngine;
use people_app::config::AppConfig;
use people_core::PersonRepository;
use people_routes::lookup::{HttpPersonSource, spawn_scheduled_lookup};
use people_routes::metrics;
use people_routes::state::PersonAppState;
use repositories::memory::MemoryPersonRepo;
use repositories::postgres::ConnectionDetails;
use repositories::postgres::initializer::create_repo;
use repositories::postgres::people::PersonRepo;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    match try_main().await {
        Ok(_) => info!("people service shutting down"),
        Err(e) => {
            error!("people service exited with error: {e:?}");
        }
    }
}

fn init_logging() {
    error_stack::Report::set_color_mode(ColorMode::None);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("PEOPLE_LOG"))
        .init();
}

async fn try_main() -> AppResult<()> {
    init_logging();

    if let Err(e) = dotenv() {
        warn!("failed to load .env file: {e}");
    }

    let config = AppConfig::from_env().change_context(AppError)?;

    let source = HttpPersonSource::new(config.lookup_url.clone());

    match config.database_url.clone() {
        Some(url) => {
            let repo = build_postgres_repo(url, config.db_pool_size).await?;
            serve(AppEngine::new(repo, source), &config).await
        }
        None => {
            warn!("DATABASE_URL is not set, people are kept in memory and lost on shutdown");
            serve(AppEngine::new(MemoryPersonRepo::new(), source), &config).await
        }
    }
}

#[instrument(skip_all)]
async fn build_postgres_repo(url: String, pool_size: Option<usize>) -> AppResult<PersonRepo> {
    debug!("initializing postgres repository");
    create_repo(ConnectionDetails::Url(url), pool_size)
        .await
        .change_context(AppError)
}

async fn serve<R>(app_engine: AppEngine<R>, config: &AppConfig) -> AppResult<()>
where
    R: PersonRepository + Clone + Send + Sync + 'static,
{
    let state = if config.metrics {
        let handle = metrics::setup_recorder().change_context(AppError)?;
        PersonAppState::new_with_metrics(app_engine, handle)
    } else {
        PersonAppState::new_without_metrics(app_engine)
    };

    match spawn_scheduled_lookup(state.service.clone(), config.lookup_interval) {
        Some(_) => info!(
            "looking up new people from {} every {}s",
            config.lookup_url,
            config.lookup_interval.as_secs()
        ),
        None => info!("scheduled lookup disabled"),
    }

    debug!("building routes..");
    let routes = people_routes::routes::build(state);

    engine::app::run(routes, AppProperties { port: config.port }).await
}
