use crate::service::PersonService;
use error_stack::ResultExt;
use people_core::model::Person;
use people_core::result::{PersonSourceError, SourceResult};
use people_core::{PersonEngine, PersonSource};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, instrument};

/// Reads people from an HTTP endpoint that answers `GET` with a JSON array of
/// person objects.
#[derive(Debug, Clone)]
pub struct HttpPersonSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPersonSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PersonSource for HttpPersonSource {
    #[instrument(skip_all, name = "lookup#fetch", fields(url = %self.url))]
    async fn fetch(&self) -> SourceResult<Vec<Person>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .change_context(PersonSourceError)
            .attach_with(|| format!("GET {}", self.url))?
            .error_for_status()
            .change_context(PersonSourceError)?;

        response
            .json::<Vec<Person>>()
            .await
            .change_context(PersonSourceError)
            .attach("response body is not a list of people")
    }
}

/// Runs [`PersonService::lookup_and_save_new_people`] every `period`, the
/// first run one full period after this is called. Failed runs are logged and
/// the next run happens as usual.
///
/// Returns `None` without spawning anything when `period` is zero or too
/// large to schedule from now.
pub fn spawn_scheduled_lookup<T>(
    service: PersonService<T>,
    period: Duration,
) -> Option<JoinHandle<()>>
where
    T: PersonEngine,
{
    if period.is_zero() {
        return None;
    }

    let Some(first_run) = Instant::now().checked_add(period) else {
        error!(
            "lookup interval of {}s is too large to schedule, scheduled lookup disabled",
            period.as_secs()
        );
        return None;
    };

    Some(tokio::spawn(async move {
        let mut timer = tokio::time::interval_at(first_run, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            timer.tick().await;

            match service.lookup_and_save_new_people().await {
                Ok(saved) => info!("scheduled lookup imported {} people", saved.len()),
                Err(e) => error!("scheduled lookup failed: {e:?}"),
            }
        }
    }))
}
