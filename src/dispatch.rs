//! Fan-out of a bucket request to the selected providers.
//!
//! Each selected provider runs as its own tokio task. The dispatcher waits
//! for all of them before returning; there is no cancellation or timeout.

use futures::future::join_all;
use tracing::{error, info};

use crate::provider::{FailureKind, Outcome, Provider};
use crate::registry::ProviderRegistry;
use crate::report::Diagnostic;
use crate::request::BucketRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitReport {
    pub provider: Provider,
    pub outcome: Outcome,
}

/// Outcomes of every unit, in the order of the request's providers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub units: Vec<UnitReport>,
}

impl Summary {
    pub fn has_failures(&self) -> bool {
        self.units.iter().any(|unit| !unit.outcome.is_success())
    }

    pub fn failed(&self) -> usize {
        self.units.iter().filter(|unit| !unit.outcome.is_success()).count()
    }
}

/// Run the request against every selected provider concurrently.
pub async fn run(request: &BucketRequest, registry: &ProviderRegistry) -> Summary {
    let units = request.providers.iter().map(|&provider| {
        let client = registry.get(provider);
        let mode = request.mode;
        let bucket = request.bucket.clone();

        let handle = client.map(|client| {
            tokio::spawn(async move {
                info!(%provider, %mode, bucket = %bucket, "Starting unit");
                client.run(mode, &bucket).await
            })
        });

        async move {
            let outcome = match handle {
                Some(handle) => handle.await.unwrap_or_else(|err| {
                    error!(%provider, error = %err, "Unit did not complete");
                    Diagnostic::failure(format!(
                        "{} operation aborted: {err}",
                        provider.display_name()
                    ))
                    .print();
                    Outcome::Failed(FailureKind::Aborted)
                }),
                None => {
                    error!(%provider, "No client registered");
                    Diagnostic::failure(format!(
                        "No client available for {}",
                        provider.display_name()
                    ))
                    .print();
                    Outcome::Failed(FailureKind::Aborted)
                }
            };
            info!(%provider, ?outcome, "Unit finished");
            UnitReport { provider, outcome }
        }
    });

    // `map` is lazy; collecting spawns every task before the first await.
    let units: Vec<_> = units.collect();
    Summary {
        units: join_all(units).await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Barrier;

    use super::*;
    use crate::provider::BucketProvider;
    use crate::request::Mode;

    #[derive(Default)]
    struct Calls {
        created: AtomicUsize,
        deleted: AtomicUsize,
    }

    struct MockProvider {
        provider: Provider,
        calls: Arc<Calls>,
        outcome: Outcome,
    }

    impl MockProvider {
        fn new(provider: Provider, outcome: Outcome) -> (Self, Arc<Calls>) {
            let calls = Arc::new(Calls::default());
            let mock = Self {
                provider,
                calls: Arc::clone(&calls),
                outcome,
            };
            (mock, calls)
        }
    }

    #[async_trait]
    impl BucketProvider for MockProvider {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn create_bucket(&self, _name: &str) -> Outcome {
            self.calls.created.fetch_add(1, Ordering::SeqCst);
            self.outcome
        }

        async fn delete_bucket(&self, _name: &str) -> Outcome {
            self.calls.deleted.fetch_add(1, Ordering::SeqCst);
            self.outcome
        }
    }

    /// Waits on a shared barrier, so it only finishes if its peer runs at
    /// the same time.
    struct RendezvousProvider {
        provider: Provider,
        barrier: Arc<Barrier>,
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl BucketProvider for RendezvousProvider {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn create_bucket(&self, _name: &str) -> Outcome {
            self.barrier.wait().await;
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.finished.store(true, Ordering::SeqCst);
            Outcome::Succeeded
        }

        async fn delete_bucket(&self, name: &str) -> Outcome {
            self.create_bucket(name).await
        }
    }

    struct PanickingProvider;

    #[async_trait]
    impl BucketProvider for PanickingProvider {
        fn provider(&self) -> Provider {
            Provider::Gcp
        }

        async fn create_bucket(&self, _name: &str) -> Outcome {
            panic!("provider blew up");
        }

        async fn delete_bucket(&self, _name: &str) -> Outcome {
            panic!("provider blew up");
        }
    }

    fn request(mode: Mode, providers: &[Provider]) -> BucketRequest {
        BucketRequest {
            mode,
            providers: providers.to_vec(),
            bucket: "test-bucket-123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_only_selected_provider_runs() {
        let (aws, aws_calls) = MockProvider::new(Provider::Aws, Outcome::Succeeded);
        let (gcp, gcp_calls) = MockProvider::new(Provider::Gcp, Outcome::Succeeded);
        let mut registry = ProviderRegistry::new();
        registry.register(aws);
        registry.register(gcp);

        let summary = run(&request(Mode::Create, &[Provider::Aws]), &registry).await;

        assert_eq!(aws_calls.created.load(Ordering::SeqCst), 1);
        assert_eq!(aws_calls.deleted.load(Ordering::SeqCst), 0);
        assert_eq!(gcp_calls.created.load(Ordering::SeqCst), 0);
        assert_eq!(
            summary.units,
            vec![UnitReport {
                provider: Provider::Aws,
                outcome: Outcome::Succeeded
            }]
        );
        assert!(!summary.has_failures());
    }

    #[tokio::test]
    async fn test_both_providers_run_selected_mode() {
        let (aws, aws_calls) = MockProvider::new(Provider::Aws, Outcome::Succeeded);
        let (gcp, gcp_calls) =
            MockProvider::new(Provider::Gcp, Outcome::Failed(FailureKind::Remote));
        let mut registry = ProviderRegistry::new();
        registry.register(aws);
        registry.register(gcp);

        let summary = run(
            &request(Mode::Delete, &[Provider::Aws, Provider::Gcp]),
            &registry,
        )
        .await;

        assert_eq!(aws_calls.deleted.load(Ordering::SeqCst), 1);
        assert_eq!(gcp_calls.deleted.load(Ordering::SeqCst), 1);
        assert_eq!(aws_calls.created.load(Ordering::SeqCst), 0);
        assert_eq!(summary.units.len(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(summary.has_failures());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_units_run_concurrently_and_are_joined() {
        let barrier = Arc::new(Barrier::new(2));
        let aws_done = Arc::new(AtomicBool::new(false));
        let gcp_done = Arc::new(AtomicBool::new(false));

        let mut registry = ProviderRegistry::new();
        registry.register(RendezvousProvider {
            provider: Provider::Aws,
            barrier: Arc::clone(&barrier),
            finished: Arc::clone(&aws_done),
        });
        registry.register(RendezvousProvider {
            provider: Provider::Gcp,
            barrier: Arc::clone(&barrier),
            finished: Arc::clone(&gcp_done),
        });

        let summary = tokio::time::timeout(
            Duration::from_secs(5),
            run(
                &request(Mode::Create, &[Provider::Aws, Provider::Gcp]),
                &registry,
            ),
        )
        .await
        .expect("units should run concurrently");

        assert!(aws_done.load(Ordering::SeqCst));
        assert!(gcp_done.load(Ordering::SeqCst));
        assert!(!summary.has_failures());
    }

    #[tokio::test]
    async fn test_panicking_unit_does_not_stop_the_other() {
        let (aws, aws_calls) = MockProvider::new(Provider::Aws, Outcome::Succeeded);
        let mut registry = ProviderRegistry::new();
        registry.register(aws);
        registry.register(PanickingProvider);

        let summary = run(
            &request(Mode::Create, &[Provider::Aws, Provider::Gcp]),
            &registry,
        )
        .await;

        assert_eq!(aws_calls.created.load(Ordering::SeqCst), 1);
        assert_eq!(
            summary.units,
            vec![
                UnitReport {
                    provider: Provider::Aws,
                    outcome: Outcome::Succeeded
                },
                UnitReport {
                    provider: Provider::Gcp,
                    outcome: Outcome::Failed(FailureKind::Aborted)
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_unregistered_provider_is_a_failed_unit() {
        let registry = ProviderRegistry::new();
        let summary = run(&request(Mode::Create, &[Provider::Gcp]), &registry).await;
        assert_eq!(
            summary.units[0].outcome,
            Outcome::Failed(FailureKind::Aborted)
        );
    }
}
