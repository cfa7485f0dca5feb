//! Repeated pipeline invocations over live sources
//!
//! Each pass pulls fresh snapshots of both worksheets and produces one
//! complete result; there is no incremental update. Snapshots load
//! concurrently on the blocking pool, the classification pass itself is
//! serialized, and every pass takes a generation number so that a pass
//! finishing after a newer one has been published is discarded instead of
//! replacing it.

use crate::error::{Result, SemaforoError};
use crate::models::{PipelineOutput, View};
use crate::pipeline::Pipeline;
use crate::source::TableSource;
use crate::table::RawTable;
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shortest interval `watch` will tick at
pub const MIN_WATCH_INTERVAL: Duration = Duration::from_millis(1);

/// Result of one published pass
#[derive(Debug, Clone)]
pub struct PublishedRun {
    pub generation: u64,
    pub finished_at: DateTime<Local>,
    pub output: PipelineOutput,
}

/// Owns the sources and the pipeline; at most one classification pass runs at a time
pub struct PipelineRunner {
    primary: Arc<dyn TableSource>,
    secondary: Arc<dyn TableSource>,
    pipeline: Arc<Pipeline>,
    run_lock: Mutex<()>,
    next_generation: AtomicU64,
    published: RwLock<Option<Arc<PublishedRun>>>,
}

impl PipelineRunner {
    pub fn new(
        primary: Arc<dyn TableSource>,
        secondary: Arc<dyn TableSource>,
        pipeline: Pipeline,
    ) -> Self {
        Self {
            primary,
            secondary,
            pipeline: Arc::new(pipeline),
            run_lock: Mutex::new(()),
            next_generation: AtomicU64::new(1),
            published: RwLock::new(None),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Last published result, if any pass has completed
    pub async fn latest(&self) -> Option<Arc<PublishedRun>> {
        self.published.read().await.clone()
    }

    /// Load both sources, classify, and publish
    pub async fn run_once(&self, view: View) -> Result<Arc<PublishedRun>> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        debug!("Starting pass {} for view '{}'", generation, view);

        let (primary, secondary) = self.load_snapshots().await?;
        self.classify_and_publish(generation, view, primary, secondary)
            .await
    }

    /// Load both snapshots in parallel on the blocking pool
    pub async fn load_snapshots(&self) -> Result<(RawTable, RawTable)> {
        futures::try_join!(
            load_blocking(Arc::clone(&self.primary)),
            load_blocking(Arc::clone(&self.secondary)),
        )
    }

    async fn classify_and_publish(
        &self,
        generation: u64,
        view: View,
        primary: RawTable,
        secondary: RawTable,
    ) -> Result<Arc<PublishedRun>> {
        let _guard = self.run_lock.lock().await;

        if let Some(current) = self.published.read().await.as_ref() {
            if current.generation > generation {
                warn!(
                    "Discarding pass {} because pass {} is already published",
                    generation, current.generation
                );
                return Err(SemaforoError::RunSuperseded { generation });
            }
        }

        let pipeline = Arc::clone(&self.pipeline);
        let output = tokio::task::spawn_blocking(move || pipeline.run(view, &primary, &secondary))
            .await
            .map_err(|e| SemaforoError::SourceUnreadable {
                table: view.to_string(),
                reason: format!("classification task failed: {e}"),
            })??;

        let run = Arc::new(PublishedRun {
            generation,
            finished_at: Local::now(),
            output,
        });
        *self.published.write().await = Some(Arc::clone(&run));
        info!(
            "Published pass {} for view '{}' with {} records",
            generation, view, run.output.summary.total
        );
        Ok(run)
    }

    /// Re-run on a fixed interval until `cancel` fires
    ///
    /// The first pass starts immediately. A failed pass is handed to
    /// `on_result` like any other and the loop keeps going. Returns the
    /// number of passes attempted. A zero interval is raised to
    /// [`MIN_WATCH_INTERVAL`].
    pub async fn watch<F>(
        &self,
        view: View,
        interval: Duration,
        cancel: CancellationToken,
        mut on_result: F,
    ) -> usize
    where
        F: FnMut(Result<Arc<PublishedRun>>),
    {
        if interval < MIN_WATCH_INTERVAL {
            warn!(
                "Watch interval {:?} is below the minimum, using {:?}",
                interval, MIN_WATCH_INTERVAL
            );
        }
        let mut ticker = tokio::time::interval(interval.max(MIN_WATCH_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut passes = 0;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Watch cancelled after {} passes", passes);
                    break;
                }
                _ = ticker.tick() => {
                    passes += 1;
                    let result = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            info!("Watch cancelled during pass {}", passes);
                            break;
                        }
                        result = self.run_once(view) => result,
                    };
                    if let Err(e) = &result {
                        warn!("Pass {} failed: {}", passes, e);
                    }
                    on_result(result);
                }
            }
        }

        passes
    }
}

async fn load_blocking(source: Arc<dyn TableSource>) -> Result<RawTable> {
    let name = source.name().to_string();
    let table = tokio::task::spawn_blocking(move || source.load())
        .await
        .map_err(|e| SemaforoError::SourceUnreadable {
            table: name.clone(),
            reason: format!("load task failed: {e}"),
        })??;
    debug!("Loaded {} rows from '{}'", table.len(), name);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryTableSource;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sources() -> (Arc<dyn TableSource>, Arc<dyn TableSource>) {
        let primary = RawTable::new(
            "Logistica",
            strings(&["Remision", "no. pedido", "Tiempo surtimiento"]),
            vec![
                strings(&["R1", "P1", "1:00:00"]),
                strings(&["R2", "P2", "4:00:00"]),
            ],
        );
        let secondary = RawTable::new(
            "Ped Pendientes",
            strings(&["no. pedido", "Estatus operativo"]),
            vec![strings(&["P1", "EMBARQUES"]), strings(&["P2", "EMBARQUES"])],
        );
        (
            Arc::new(MemoryTableSource::new(primary)),
            Arc::new(MemoryTableSource::new(secondary)),
        )
    }

    struct UnavailableSource;

    impl TableSource for UnavailableSource {
        fn name(&self) -> &str {
            "Ped Pendientes"
        }

        fn load(&self) -> Result<RawTable> {
            Err(SemaforoError::SourceUnreadable {
                table: "Ped Pendientes".to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_run_once_publishes() {
        let (primary, secondary) = sources();
        let runner = PipelineRunner::new(primary, secondary, Pipeline::default());
        assert!(runner.latest().await.is_none());

        let first = runner.run_once(View::Invoicing).await.unwrap();
        let second = runner.run_once(View::Invoicing).await.unwrap();

        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        assert_eq!(first.output, second.output);
        assert_eq!(runner.latest().await.unwrap().generation, 2);
    }

    #[tokio::test]
    async fn test_stale_pass_is_discarded() {
        let (primary, secondary) = sources();
        let runner = PipelineRunner::new(primary, secondary, Pipeline::default());
        let (p, s) = runner.load_snapshots().await.unwrap();

        runner
            .classify_and_publish(5, View::All, p.clone(), s.clone())
            .await
            .unwrap();
        let stale = runner.classify_and_publish(4, View::All, p, s).await;

        assert!(matches!(
            stale,
            Err(SemaforoError::RunSuperseded { generation: 4 })
        ));
        assert_eq!(runner.latest().await.unwrap().generation, 5);
    }

    #[tokio::test]
    async fn test_unavailable_source_fails_the_pass() {
        let (primary, _) = sources();
        let runner = PipelineRunner::new(primary, Arc::new(UnavailableSource), Pipeline::default());

        let result = runner.run_once(View::All).await;
        assert!(matches!(result, Err(SemaforoError::SourceUnreadable { .. })));
        assert!(runner.latest().await.is_none());
    }

    #[tokio::test]
    async fn test_watch_stops_on_cancel() {
        let (primary, secondary) = sources();
        let runner = PipelineRunner::new(primary, secondary, Pipeline::default());
        let cancel = CancellationToken::new();

        let mut results = Vec::new();
        let stopper = cancel.clone();
        let passes = runner
            .watch(View::Fulfillment, Duration::from_millis(10), cancel, |result| {
                results.push(result.map(|run| run.generation));
                if results.len() == 3 {
                    stopper.cancel();
                }
            })
            .await;

        assert_eq!(passes, 3);
        let generations: Vec<u64> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(generations, [1, 2, 3]);
    }

    #[tokio::test]
    async fn test_watch_with_zero_interval_still_runs() {
        let (primary, secondary) = sources();
        let runner = PipelineRunner::new(primary, secondary, Pipeline::default());
        let cancel = CancellationToken::new();

        let stopper = cancel.clone();
        let passes = runner
            .watch(View::All, Duration::ZERO, cancel, |result| {
                assert!(result.is_ok());
                stopper.cancel();
            })
            .await;

        assert_eq!(passes, 1);
    }

    #[tokio::test]
    async fn test_watch_survives_failed_passes() {
        let (primary, _) = sources();
        let runner = PipelineRunner::new(primary, Arc::new(UnavailableSource), Pipeline::default());
        let cancel = CancellationToken::new();

        let mut failures = 0;
        let stopper = cancel.clone();
        runner
            .watch(View::All, Duration::from_millis(5), cancel, |result| {
                assert!(result.is_err());
                failures += 1;
                if failures == 2 {
                    stopper.cancel();
                }
            })
            .await;

        assert_eq!(failures, 2);
    }
}
