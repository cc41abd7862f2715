use crate::service::PersonService;
use axum::extract::FromRef;
use metrics_exporter_prometheus::PrometheusHandle;
use people_core::PersonEngine;

#[derive(Clone)]
pub struct PersonAppState<T: PersonEngine> {
    pub service: PersonService<T>,
    /// Renders the installed recorder. `None` when metrics are disabled.
    pub metrics: Option<PrometheusHandle>,
}

impl<T: PersonEngine> PersonAppState<T> {
    pub fn new_with_metrics(engine: T, metrics: PrometheusHandle) -> Self {
        Self {
            service: PersonService::new(engine),
            metrics: Some(metrics),
        }
    }

    pub fn new_without_metrics(engine: T) -> Self {
        Self {
            service: PersonService::new(engine),
            metrics: None,
        }
    }

    pub fn metrics_enabled(&self) -> bool {
        self.metrics.is_some()
    }
}

impl<T: PersonEngine> FromRef<PersonAppState<T>> for PersonService<T> {
    fn from_ref(input: &PersonAppState<T>) -> Self {
        input.service.clone()
    }
}
