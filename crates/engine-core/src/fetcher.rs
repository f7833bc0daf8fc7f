use crate::{
    connect::{Connector, DriverConnector},
    error::FetchError,
    metrics::Metrics,
    progress::{LogProgress, ProgressReporter, ProgressStage},
    request::FetchRequest,
    tuning::{ChunkSample, ChunkTuner},
};
use connectors::{
    settings::ConnectionSettings,
    sql::base::{adapter::SqlAdapter, cursor::RowCursor},
};
use model::{
    core::value::Value,
    records::{display::DisplayOptions, table::TableData},
};
use planner::query::{
    ast::{
        common::{Projection, TableRef},
        select::{CountRows, Select},
    },
    renderer::to_sql,
};
use serde::Serialize;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

/// Row cap applied to every SELECT while debug mode is on.
pub const DEBUG_ROW_LIMIT: u64 = 2000;

/// What a fetch learned besides the rows themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchStats {
    /// `COUNT(*)` as seen just before the SELECT. Ignores the debug cap.
    pub total_rows: u64,
    pub rows_fetched: usize,
    /// Size asked of the cursor on every round trip, including the last
    /// empty one.
    pub requested_sizes: Vec<usize>,
    /// Rows actually received per non-empty batch.
    pub batch_sizes: Vec<usize>,
    /// Adaptive mode only.
    pub samples: Vec<ChunkSample>,
    /// Adaptive mode only: the sampled size with the best throughput.
    pub optimal_chunk_size: Option<usize>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutput {
    pub table: TableData,
    pub stats: FetchStats,
}

/// Reads whole tables into memory, a chunk at a time.
///
/// Each call opens its own connection and closes it before returning, so a
/// single fetcher can serve concurrent calls.
#[derive(Clone)]
pub struct TableFetcher {
    settings: ConnectionSettings,
    debug: bool,
    connector: Arc<dyn Connector>,
    progress: Arc<dyn ProgressReporter>,
    metrics: Metrics,
}

struct Drained {
    batches: Vec<Vec<Vec<Value>>>,
    requested_sizes: Vec<usize>,
    batch_sizes: Vec<usize>,
    tuner: Option<ChunkTuner>,
}

impl TableFetcher {
    pub fn new(settings: ConnectionSettings, debug: bool) -> Self {
        TableFetcher {
            settings,
            debug,
            connector: Arc::new(DriverConnector),
            progress: Arc::new(LogProgress::default()),
            metrics: Metrics::new(),
        }
    }

    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// How results should be printed for this fetcher's mode.
    pub fn display_options(&self) -> DisplayOptions {
        if self.debug {
            DisplayOptions::debug()
        } else {
            DisplayOptions::default()
        }
    }

    pub fn row_limit(&self) -> Option<u64> {
        self.debug.then_some(DEBUG_ROW_LIMIT)
    }

    /// Reads `request.table` into memory.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<TableData, FetchError> {
        self.fetch_with_stats(request)
            .await
            .map(|output| output.table)
    }

    /// Like [`fetch`](Self::fetch), also returning batch and timing details.
    pub async fn fetch_with_stats(
        &self,
        request: &FetchRequest,
    ) -> Result<FetchOutput, FetchError> {
        let (table, projection) = request.plan()?;
        let label = table.to_string();
        self.metrics.increment_fetches();

        let result = self.fetch_planned(request, &table, projection, &label).await;
        match &result {
            Ok(output) => {
                self.progress.stage(&label, ProgressStage::Done);
                info!(
                    table = %label,
                    rows = output.stats.rows_fetched,
                    batches = output.stats.batch_sizes.len(),
                    elapsed = ?output.stats.elapsed,
                    "Fetch complete"
                );
            }
            Err(err) => {
                self.metrics.increment_failures();
                self.progress.stage(&label, ProgressStage::Failed);
                warn!(table = %label, error = %err, "Fetch failed");
            }
        }
        result
    }

    async fn fetch_planned(
        &self,
        request: &FetchRequest,
        table: &TableRef,
        projection: Projection,
        label: &str,
    ) -> Result<FetchOutput, FetchError> {
        self.progress.stage(label, ProgressStage::Connecting);
        debug!("Connecting to {} ({})", self.settings.endpoint(), self.settings.driver);
        let mut adapter = self.connector.connect(&self.settings).await?;

        let result = self
            .run(adapter.as_mut(), request, table, projection, label)
            .await;

        // the connection is released on every path
        let closed = adapter.close().await;
        match (result, closed) {
            (Ok(output), Ok(())) => Ok(output),
            (Ok(_), Err(err)) => Err(FetchError::Query(err)),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                warn!(error = %close_err, "Failed to close connection after error");
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        adapter: &mut dyn SqlAdapter,
        request: &FetchRequest,
        table: &TableRef,
        projection: Projection,
        label: &str,
    ) -> Result<FetchOutput, FetchError> {
        let started = Instant::now();

        let count_sql = to_sql(
            &CountRows {
                from: table.clone(),
            },
            adapter.dialect(),
        );
        let select_sql = to_sql(
            &Select::new(table.clone(), projection).limit(self.row_limit()),
            adapter.dialect(),
        );

        self.progress.stage(label, ProgressStage::Counting);
        let total_rows = adapter.count_rows(&count_sql).await?;

        self.progress.stage(label, ProgressStage::Fetching);
        self.progress.start(label, total_rows);

        let mut cursor = adapter.open_cursor(&select_sql).await?;
        let drained = self.drain(cursor.as_mut(), request, total_rows).await;
        let closed = cursor.close().await;
        let columns = cursor.columns().to_vec();
        drop(cursor);

        let drained = match (drained, closed) {
            (Ok(drained), Ok(())) => drained,
            (Ok(_), Err(err)) => return Err(FetchError::Query(err)),
            (Err(err), Ok(())) => return Err(err),
            (Err(err), Err(close_err)) => {
                warn!(error = %close_err, "Failed to close cursor after error");
                return Err(err);
            }
        };

        let Drained {
            batches,
            requested_sizes,
            batch_sizes,
            tuner,
        } = drained;

        let table = TableData::from_batches(columns, batches)?;
        self.progress.finish(table.num_rows());

        let optimal_chunk_size = tuner.as_ref().and_then(ChunkTuner::optimal_chunk_size);
        if let Some(size) = optimal_chunk_size {
            info!("Optimal chunk size for {}: {}", label, size);
        }

        let stats = FetchStats {
            total_rows,
            rows_fetched: table.num_rows(),
            requested_sizes,
            batch_sizes,
            samples: tuner.map(ChunkTuner::into_samples).unwrap_or_default(),
            optimal_chunk_size,
            elapsed: started.elapsed(),
        };
        Ok(FetchOutput { table, stats })
    }

    /// Pulls batches until the cursor comes back empty.
    async fn drain(
        &self,
        cursor: &mut dyn RowCursor,
        request: &FetchRequest,
        total_rows: u64,
    ) -> Result<Drained, FetchError> {
        let mut tuner = request
            .adaptive
            .then(|| ChunkTuner::new(request.chunk_size, total_rows, request.latency_threshold));

        let mut drained = Drained {
            batches: Vec::new(),
            requested_sizes: Vec::new(),
            batch_sizes: Vec::new(),
            tuner: None,
        };

        loop {
            let chunk_size = tuner
                .as_ref()
                .map_or(request.chunk_size, ChunkTuner::current);
            drained.requested_sizes.push(chunk_size);

            let started = Instant::now();
            let rows = cursor.fetch_many(chunk_size).await?;
            let elapsed = started.elapsed();

            if rows.is_empty() {
                break;
            }

            debug!(
                requested = chunk_size,
                received = rows.len(),
                elapsed = ?elapsed,
                "Fetched batch"
            );
            self.progress.advance(rows.len());
            self.metrics.record_batch(rows.len());

            if let Some(tuner) = tuner.as_mut() {
                let next = tuner.observe(elapsed);
                if next != chunk_size {
                    debug!("Chunk size {} -> {}", chunk_size, next);
                }
            }

            drained.batch_sizes.push(rows.len());
            drained.batches.push(rows);
        }

        drained.tuner = tuner;
        Ok(drained)
    }
}
