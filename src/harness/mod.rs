//! Connectivity harness
//!
//! A run goes through a fixed sequence of phases:
//!
//! 1. format the descriptor from [`ConnectionConfig`](crate::connection::ConnectionConfig)
//! 2. open a connection through the configured driver
//! 3. ping it
//! 4. optionally run the configured statement and write every decoded row
//!    to the output sink
//!
//! The first failing phase aborts the run. Whatever was opened is closed
//! exactly once before the error is returned, cursor first, then connection.

mod state;

pub use state::HarnessState;

use crate::config::HarnessConfig;
use crate::connection::DataSourceDescriptor;
use crate::driver::{row_stream, Conn, Driver, DriverRegistry, RowValue, Rows};
use crate::metrics::{counters, histograms, labels};
use crate::{Error, Result};
use futures::TryStreamExt;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Driver the run used
    pub driver: String,
    /// Descriptor with the password masked
    pub descriptor: String,
    /// Rows written to the sink, `None` when the query phase was skipped
    pub rows: Option<usize>,
}

/// Connectivity harness bound to one driver
pub struct Harness {
    driver: Arc<dyn Driver>,
    config: HarnessConfig,
}

impl Harness {
    /// Create a harness around an already resolved driver
    pub fn new(driver: Arc<dyn Driver>, config: HarnessConfig) -> Self {
        Self { driver, config }
    }

    /// Resolve `config.driver` in `registry` and create a harness
    ///
    /// The driver is looked up once here; runs reuse it.
    pub fn from_registry(registry: &DriverRegistry, config: HarnessConfig) -> Result<Self> {
        let driver = registry.get(&config.driver)?;
        Ok(Self::new(driver, config))
    }

    /// Name of the resolved driver
    pub fn driver_name(&self) -> &str {
        self.driver.name()
    }

    /// Descriptor for the configured connection
    pub fn descriptor(&self) -> DataSourceDescriptor {
        DataSourceDescriptor::from_config(&self.config.connection)
    }

    /// Execute one run, writing decoded rows to `out`
    ///
    /// Rows are written as one JSON document per line, flushed as they
    /// arrive. The error of the first failing phase is returned after every
    /// opened resource has been released.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn example() -> dbping::Result<()> {
    /// use dbping::config::HarnessConfig;
    /// use dbping::connection::ConnectionConfig;
    /// use dbping::driver::memory::{MemoryDriver, Script};
    /// use dbping::driver::DriverRegistry;
    /// use dbping::Harness;
    /// use std::sync::Arc;
    ///
    /// let registry = DriverRegistry::new();
    /// registry.register(Arc::new(MemoryDriver::new(Script::new())))?;
    ///
    /// let connection = ConnectionConfig::new("scott", "tiger", "127.0.0.1", "2881", "test");
    /// let config = HarnessConfig::builder(connection).driver("memory").build();
    ///
    /// let harness = Harness::from_registry(&registry, config)?;
    /// let report = harness.run(&mut std::io::stdout()).await?;
    /// assert_eq!(report.rows, None);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<W>(&self, out: &mut W) -> Result<RunReport>
    where
        W: Write + ?Sized,
    {
        let started = Instant::now();
        let driver = self.driver.name().to_string();

        let result = self
            .run_phases(out)
            .instrument(tracing::info_span!(
                "harness",
                driver = %driver,
                host = %self.config.connection.host,
                database = %self.config.connection.database
            ))
            .await;

        let outcome = match &result {
            Ok(report) => {
                tracing::info!(driver = %driver, rows = ?report.rows, "run complete");
                labels::OUTCOME_OK
            }
            Err(e) => {
                tracing::error!(driver = %driver, phase = e.phase(), error = %e, "run failed");
                counters::phase_failed(&driver, e.phase());
                labels::OUTCOME_ERROR
            }
        };
        histograms::run_duration(&driver, outcome, started.elapsed().as_millis() as u64);

        result
    }

    async fn run_phases<W>(&self, out: &mut W) -> Result<RunReport>
    where
        W: Write + ?Sized,
    {
        let driver = self.driver.name();
        let mut state = HarnessState::Init;
        let descriptor = self.descriptor();

        state.transition(HarnessState::Opening)?;
        tracing::debug!(descriptor = %descriptor.redacted(), "opening connection");
        let mut conn = self
            .driver
            .open(&descriptor)
            .await
            .map_err(Error::Connection)?;
        state.transition(HarnessState::Opened)?;
        counters::phase_completed(driver, labels::PHASE_OPEN);

        let outcome = self.exercise(conn.as_mut(), &mut state, out).await;

        tracing::debug!(state = %state, "closing connection");
        let released = conn.close().await.map_err(Error::Close);
        state.transition(HarnessState::Closed)?;

        let rows = settle(outcome, released)?;
        counters::phase_completed(driver, labels::PHASE_CLOSE);

        Ok(RunReport {
            driver: driver.to_string(),
            descriptor: descriptor.redacted(),
            rows,
        })
    }

    /// Ping, then optionally query; returns the number of rows emitted
    async fn exercise<W>(
        &self,
        conn: &mut dyn Conn,
        state: &mut HarnessState,
        out: &mut W,
    ) -> Result<Option<usize>>
    where
        W: Write + ?Sized,
    {
        let driver = self.driver.name();

        state.transition(HarnessState::Verifying)?;
        conn.ping().await.map_err(Error::Liveness)?;
        state.transition(HarnessState::Verified)?;
        counters::phase_completed(driver, labels::PHASE_VERIFY);
        tracing::info!("ping ok");

        if !self.config.run_query {
            return Ok(None);
        }

        state.transition(HarnessState::Querying)?;
        tracing::debug!(statement = %self.config.statement, "executing query");
        let mut rows = conn
            .query(&self.config.statement)
            .await
            .map_err(Error::Query)?;
        counters::phase_completed(driver, labels::PHASE_QUERY);

        state.transition(HarnessState::Iterating)?;
        let emitted = self.emit_rows(rows.as_mut(), out).await;

        tracing::debug!("closing cursor");
        let released = rows.close().await.map_err(Error::Close);
        let count = settle(emitted, released)?;

        state.transition(HarnessState::Done)?;
        counters::phase_completed(driver, labels::PHASE_ITERATE);
        tracing::info!(rows = count, "query ok");

        Ok(Some(count))
    }

    async fn emit_rows<W>(&self, rows: &mut dyn Rows, out: &mut W) -> Result<usize>
    where
        W: Write + ?Sized,
    {
        let driver = self.driver.name();
        let stream = row_stream(rows);
        futures::pin_mut!(stream);

        let mut emitted = 0;
        while let Some(value) = stream.try_next().await? {
            write_row(out, &value)?;
            emitted += 1;
            counters::rows_emitted(driver, 1);
        }

        Ok(emitted)
    }
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("driver", &self.driver.name())
            .field("config", &self.config)
            .finish()
    }
}

fn write_row<W>(out: &mut W, value: &RowValue) -> Result<()>
where
    W: Write + ?Sized,
{
    serde_json::to_writer(&mut *out, value).map_err(io::Error::from)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Combine a phase outcome with the release that followed it
///
/// The phase error wins; a release error is only returned when the phase
/// itself succeeded.
fn settle<T>(outcome: Result<T>, released: Result<()>) -> Result<T> {
    match (outcome, released) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) | (Err(e), Ok(())) => Err(e),
        (Err(e), Err(release_error)) => {
            tracing::warn!(error = %release_error, "release failed after an earlier error");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionConfig;
    use crate::driver::memory::{Call, MemoryDriver, Script};
    use crate::error::DriverError;

    fn harness(script: Script, run_query: bool) -> (Harness, MemoryDriver) {
        let driver = MemoryDriver::new(script);
        let config = HarnessConfig::builder(ConnectionConfig::new(
            "scott", "tiger", "127.0.0.1", "2881", "test",
        ))
        .driver("memory")
        .run_query(run_query)
        .build();
        (Harness::new(Arc::new(driver.clone()), config), driver)
    }

    #[tokio::test]
    async fn test_ping_only() {
        let (harness, driver) = harness(Script::new().rows(["1"]), false);
        let mut out = Vec::new();

        let report = harness.run(&mut out).await.unwrap();

        assert_eq!(report.rows, None);
        assert_eq!(report.descriptor, "scott/***@127.0.0.1:2881/test");
        assert!(out.is_empty());
        assert_eq!(
            driver.log().calls(),
            vec![Call::Open, Call::Ping, Call::CloseConnection]
        );
    }

    #[tokio::test]
    async fn test_query_writes_one_line_per_row() {
        let (harness, _) = harness(Script::new().rows([r#"{"A":1}"#, "[1,2]"]), true);
        let mut out = Vec::new();

        let report = harness.run(&mut out).await.unwrap();

        assert_eq!(report.rows, Some(2));
        assert_eq!(String::from_utf8(out).unwrap(), "{\"A\":1}\n[1,2]\n");
    }

    #[tokio::test]
    async fn test_close_error_reported_when_run_succeeded() {
        let (harness, driver) = harness(Script::new().fail_close("socket reset"), false);

        let err = harness.run(&mut Vec::new()).await.unwrap_err();

        assert!(matches!(err, Error::Close(_)));
        assert_eq!(driver.log().count(Call::CloseConnection), 1);
    }

    #[tokio::test]
    async fn test_close_error_does_not_mask_phase_error() {
        let (harness, _) = harness(
            Script::new().fail_ping("ORA-03113").fail_close("socket reset"),
            false,
        );

        let err = harness.run(&mut Vec::new()).await.unwrap_err();
        assert!(matches!(err, Error::Liveness(_)));
    }

    #[tokio::test]
    async fn test_output_failure_still_releases() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let (harness, driver) = harness(Script::new().rows(["1", "2"]), true);
        let err = harness.run(&mut Broken).await.unwrap_err();

        assert!(matches!(err, Error::Output(_)));
        assert_eq!(driver.log().count(Call::CloseCursor), 1);
        assert_eq!(driver.log().count(Call::CloseConnection), 1);
    }

    #[test]
    fn test_from_registry_unknown_driver() {
        let registry = DriverRegistry::new();
        let config = HarnessConfig::new(ConnectionConfig::default());

        let err = Harness::from_registry(&registry, config).unwrap_err();
        assert!(matches!(err, Error::UnknownDriver(name) if name == "gobci"));
    }

    #[test]
    fn test_settle() {
        assert_eq!(settle(Ok(1), Ok(())).unwrap(), 1);
        assert!(matches!(
            settle(Ok(1), Err(Error::Close(DriverError::new("x")))),
            Err(Error::Close(_))
        ));
        assert!(matches!(
            settle::<()>(
                Err(Error::Query(DriverError::new("q"))),
                Err(Error::Close(DriverError::new("c")))
            ),
            Err(Error::Query(_))
        ));
    }
}
