use people_core::{PersonEngine, PersonRepository};
use people_routes::lookup::HttpPersonSource;

pub mod config;

/// The engine the service runs on: a repository picked at start-up and the
/// HTTP person source.
#[derive(Debug, Clone)]
pub struct AppEngine<R> {
    repo: R,
    source: HttpPersonSource,
}

impl<R> AppEngine<R> {
    pub fn new(repo: R, source: HttpPersonSource) -> Self {
        Self { repo, source }
    }
}

impl<R> PersonEngine for AppEngine<R>
where
    R: PersonRepository + Clone + Send + Sync + 'static,
{
    type Repo = R;
    type Source = HttpPersonSource;

    fn repo(&self) -> Self::Repo {
        self.repo.clone()
    }

    fn source(&self) -> Self::Source {
        self.source.clone()
    }
}
