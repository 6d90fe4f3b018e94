use prometheus::{
    opts, register_int_counter_vec_with_registry, register_int_counter_with_registry, IntCounter,
    IntCounterVec, Registry,
};

use crate::PipelineStage;

const METRICS_NAMESPACE: &str = "lenster_publisher";

/// Prefix a metric name with the namespace.
fn namespaced(name: &str) -> String {
    format!("{}_{}", METRICS_NAMESPACE, name)
}

/// Metrics of the community creation pipeline
#[derive(Clone)]
pub struct PublisherMetrics {
    /// Metrics registry for adding new metrics and gathering reports
    registry: Registry,
    /// Successful submissions, labelled by path, "relay" or "direct"
    pub submissions: IntCounterVec,
    /// Relay refusals that were followed by a direct submission
    pub relay_fallbacks: IntCounter,
    /// Pipeline runs that stopped with an error, labelled by stage
    pub pipeline_failures: IntCounterVec,
}

impl std::fmt::Debug for PublisherMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublisherMetrics").finish_non_exhaustive()
    }
}

impl PublisherMetrics {
    /// Register the metrics with `registry`.
    pub fn new(registry: Registry) -> eyre::Result<Self> {
        let submissions = register_int_counter_vec_with_registry!(
            opts!(
                namespaced("submissions"),
                "The number of posts submitted, by submission path",
            ),
            &["path"],
            registry.clone()
        )?;
        let relay_fallbacks = register_int_counter_with_registry!(
            opts!(
                namespaced("relay_fallbacks"),
                "The number of relay refusals followed by a direct submission",
            ),
            registry.clone()
        )?;
        let pipeline_failures = register_int_counter_vec_with_registry!(
            opts!(
                namespaced("pipeline_failures"),
                "The number of community creations that failed, by stage",
            ),
            &["stage"],
            registry.clone()
        )?;
        Ok(Self {
            registry,
            submissions,
            relay_fallbacks,
            pipeline_failures,
        })
    }

    /// The registry the metrics live in
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn record_submission(&self, relayed: bool) {
        let path = if relayed { "relay" } else { "direct" };
        self.submissions.with_label_values(&[path]).inc();
    }

    pub(crate) fn record_failure(&self, stage: PipelineStage) {
        self.pipeline_failures
            .with_label_values(&[stage.as_str()])
            .inc();
    }

    #[cfg(test)]
    pub fn dummy_instance() -> Self {
        let registry = Registry::new();
        let instance = Self::new(registry.clone());
        instance.unwrap()
    }
}
