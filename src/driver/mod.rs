//! Driver capability
//!
//! The harness talks to databases only through these traits. A driver opens
//! connections from a [`DataSourceDescriptor`]; a connection answers pings and
//! runs statements; a cursor yields rows that decode into [`RowValue`].
//!
//! Closing an already-closed connection or cursor must be a no-op on the
//! driver side.

pub mod memory;
mod registry;
mod stream;

pub use memory::MemoryDriver;
pub use registry::DriverRegistry;
pub use stream::row_stream;

use crate::connection::DataSourceDescriptor;
use crate::error::DriverError;
use async_trait::async_trait;

/// Decoded row of unknown shape
pub type RowValue = serde_json::Value;

/// Result type returned by driver methods
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// A named database driver
#[async_trait]
pub trait Driver: Send + Sync {
    /// Name the driver is registered under
    fn name(&self) -> &str;

    /// Open a connection
    async fn open(&self, descriptor: &DataSourceDescriptor) -> DriverResult<Box<dyn Conn>>;
}

/// An open connection
#[async_trait]
pub trait Conn: Send {
    /// Liveness check
    async fn ping(&mut self) -> DriverResult<()>;

    /// Execute a statement and return a cursor over its rows
    async fn query(&mut self, statement: &str) -> DriverResult<Box<dyn Rows>>;

    /// Release the connection
    async fn close(&mut self) -> DriverResult<()>;
}

/// Cursor over a result set
#[async_trait]
pub trait Rows: Send {
    /// Advance to the next row; `false` once the result set is exhausted
    async fn next(&mut self) -> DriverResult<bool>;

    /// Decode the current row
    fn scan(&mut self) -> DriverResult<RowValue>;

    /// Release the cursor
    async fn close(&mut self) -> DriverResult<()>;
}
