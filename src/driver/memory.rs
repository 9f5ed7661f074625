//! In-memory scripted driver
//!
//! Behaves like a real driver without a database behind it. A [`Script`]
//! decides which calls fail and which raw rows the cursor returns; every call
//! the driver receives is recorded in a shared [`CallLog`].
//!
//! Rows are held as JSON text and decoded on `scan`, so a malformed row is a
//! decode failure exactly where a real driver would report one.

use super::{Conn, Driver, DriverResult, RowValue, Rows};
use crate::connection::DataSourceDescriptor;
use crate::error::DriverError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// Default name of the memory driver
pub const MEMORY_DRIVER: &str = "memory";

/// A call received by the memory driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// `Driver::open`
    Open,
    /// `Conn::ping`
    Ping,
    /// `Conn::query`
    Query,
    /// `Conn::close`
    CloseConnection,
    /// `Rows::next`
    Next,
    /// `Rows::scan`
    Scan,
    /// `Rows::close`
    CloseCursor,
}

/// Ordered record of driver calls, shared by a driver and everything it opens
#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<Vec<Call>>,
}

impl CallLog {
    /// Create an empty log
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Call>> {
        // A panic while holding the lock cannot leave the Vec inconsistent
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: Call) {
        self.lock().push(call);
    }

    /// All calls in the order they were received
    pub fn calls(&self) -> Vec<Call> {
        self.lock().clone()
    }

    /// Number of times `call` was received
    pub fn count(&self, call: Call) -> usize {
        self.lock().iter().filter(|c| **c == call).count()
    }

    /// Forget every recorded call
    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Scripted behaviour of a [`MemoryDriver`]
#[derive(Debug, Clone, Default)]
pub struct Script {
    open_error: Option<String>,
    ping_error: Option<String>,
    query_error: Option<String>,
    fetch_error: Option<(usize, String)>,
    close_error: Option<String>,
    cursor_close_error: Option<String>,
    rows: Vec<String>,
}

impl Script {
    /// Script where every call succeeds and the result set is empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON text of each row, in cursor order
    pub fn rows<I, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows = rows.into_iter().map(Into::into).collect();
        self
    }

    /// Fail `open` with `message`
    pub fn fail_open(mut self, message: impl Into<String>) -> Self {
        self.open_error = Some(message.into());
        self
    }

    /// Fail `ping` with `message`
    pub fn fail_ping(mut self, message: impl Into<String>) -> Self {
        self.ping_error = Some(message.into());
        self
    }

    /// Fail `query` with `message`
    pub fn fail_query(mut self, message: impl Into<String>) -> Self {
        self.query_error = Some(message.into());
        self
    }

    /// Fail the fetch of the row at `position` (0-based) with `message`
    pub fn fail_fetch_at(mut self, position: usize, message: impl Into<String>) -> Self {
        self.fetch_error = Some((position, message.into()));
        self
    }

    /// Fail the first `close` of a connection with `message`
    pub fn fail_close(mut self, message: impl Into<String>) -> Self {
        self.close_error = Some(message.into());
        self
    }

    /// Fail the first `close` of a cursor with `message`
    pub fn fail_cursor_close(mut self, message: impl Into<String>) -> Self {
        self.cursor_close_error = Some(message.into());
        self
    }

    /// Cursor over this script's rows, recording into `log`
    pub fn cursor(&self, log: Arc<CallLog>) -> MemoryRows {
        MemoryRows {
            rows: self.rows.clone(),
            fetch_error: self.fetch_error.clone(),
            close_error: self.cursor_close_error.clone(),
            position: 0,
            current: None,
            closed: false,
            log,
        }
    }
}

/// Scripted in-process driver
#[derive(Debug, Clone)]
pub struct MemoryDriver {
    name: String,
    script: Arc<Script>,
    log: Arc<CallLog>,
}

impl MemoryDriver {
    /// Create a driver registered as [`MEMORY_DRIVER`]
    pub fn new(script: Script) -> Self {
        Self::named(MEMORY_DRIVER, script)
    }

    /// Create a driver under a custom name
    pub fn named(name: impl Into<String>, script: Script) -> Self {
        Self {
            name: name.into(),
            script: Arc::new(script),
            log: CallLog::new(),
        }
    }

    /// Call log shared with every connection and cursor this driver opens
    pub fn log(&self) -> Arc<CallLog> {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self, descriptor: &DataSourceDescriptor) -> DriverResult<Box<dyn Conn>> {
        self.log.record(Call::Open);

        if let Some(message) = &self.script.open_error {
            return Err(DriverError::new(message.clone()));
        }

        let config = descriptor
            .parse()
            .map_err(|e| DriverError::new(e.to_string()))?;
        let missing = config.empty_fields();
        if !missing.is_empty() {
            return Err(DriverError::new(format!(
                "descriptor has empty fields: {}",
                missing.join(", ")
            )));
        }

        tracing::debug!(driver = %self.name, "memory connection opened");

        Ok(Box::new(MemoryConn {
            script: Arc::clone(&self.script),
            log: Arc::clone(&self.log),
            closed: false,
        }))
    }
}

/// Connection opened by [`MemoryDriver`]
#[derive(Debug)]
pub struct MemoryConn {
    script: Arc<Script>,
    log: Arc<CallLog>,
    closed: bool,
}

impl MemoryConn {
    fn ensure_open(&self) -> DriverResult<()> {
        if self.closed {
            return Err(DriverError::new("connection is closed"));
        }
        Ok(())
    }
}

#[async_trait]
impl Conn for MemoryConn {
    async fn ping(&mut self) -> DriverResult<()> {
        self.log.record(Call::Ping);
        self.ensure_open()?;

        match &self.script.ping_error {
            Some(message) => Err(DriverError::new(message.clone())),
            None => Ok(()),
        }
    }

    async fn query(&mut self, _statement: &str) -> DriverResult<Box<dyn Rows>> {
        self.log.record(Call::Query);
        self.ensure_open()?;

        if let Some(message) = &self.script.query_error {
            return Err(DriverError::new(message.clone()));
        }

        Ok(Box::new(self.script.cursor(Arc::clone(&self.log))))
    }

    async fn close(&mut self) -> DriverResult<()> {
        self.log.record(Call::CloseConnection);

        if self.closed {
            return Ok(());
        }
        self.closed = true;

        match &self.script.close_error {
            Some(message) => Err(DriverError::new(message.clone())),
            None => Ok(()),
        }
    }
}

/// Cursor returned by [`MemoryConn::query`]
#[derive(Debug)]
pub struct MemoryRows {
    rows: Vec<String>,
    fetch_error: Option<(usize, String)>,
    close_error: Option<String>,
    position: usize,
    current: Option<usize>,
    closed: bool,
    log: Arc<CallLog>,
}

#[async_trait]
impl Rows for MemoryRows {
    async fn next(&mut self) -> DriverResult<bool> {
        self.log.record(Call::Next);

        if self.closed {
            return Err(DriverError::new("cursor is closed"));
        }

        if let Some((position, message)) = &self.fetch_error {
            if *position == self.position {
                return Err(DriverError::new(message.clone()));
            }
        }

        if self.position >= self.rows.len() {
            self.current = None;
            return Ok(false);
        }

        self.current = Some(self.position);
        self.position += 1;
        Ok(true)
    }

    fn scan(&mut self) -> DriverResult<RowValue> {
        self.log.record(Call::Scan);

        let index = self
            .current
            .ok_or_else(|| DriverError::new("scan called without a current row"))?;

        serde_json::from_str(&self.rows[index])
            .map_err(|e| DriverError::new(format!("cannot decode row: {}", e)))
    }

    async fn close(&mut self) -> DriverResult<()> {
        self.log.record(Call::CloseCursor);

        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.current = None;

        match &self.close_error {
            Some(message) => Err(DriverError::new(message.clone())),
            None => Ok(()),
        }
    }
}
