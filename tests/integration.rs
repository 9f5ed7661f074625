//! Live connectivity check
//!
//! This crate ships no network driver, so this test is a template for
//! applications that embed `dbping` together with a real driver. Such an
//! application registers its driver in `register_live_drivers` under the name
//! it sets in `OBDRIVER`, then points the standard environment keys
//! (`USERNAME`, `PASSWORD`, `OBIP`, `OBPORT`, `OBDATABASE`) at a reachable
//! database.
//!
//! Run with: cargo test --test integration -- --ignored --nocapture

use dbping::config::HarnessConfig;
use dbping::driver::DriverRegistry;
use dbping::{Error, Harness};

/// Register the drivers under test
///
/// Empty here; an embedding application adds e.g.
/// `registry.register(Arc::new(MyDriver::new()))?`.
fn register_live_drivers(_registry: &DriverRegistry) -> dbping::Result<()> {
    Ok(())
}

#[tokio::test]
#[ignore] // Requires a database and a registered driver
async fn test_live_ping_and_query() {
    let registry = DriverRegistry::new();
    register_live_drivers(&registry).expect("register drivers");

    let mut config = HarnessConfig::from_env().expect("config");
    config.run_query = true;

    let harness = match Harness::from_registry(&registry, config) {
        Ok(harness) => harness,
        Err(Error::UnknownDriver(name)) => panic!(
            "no driver registered as {:?}; add it in register_live_drivers (registered: {:?})",
            name,
            registry.names()
        ),
        Err(e) => panic!("harness setup failed: {}", e),
    };

    let mut out = Vec::new();
    let report = harness.run(&mut out).await.expect("run");

    println!("{}", String::from_utf8_lossy(&out));
    assert!(report.rows.is_some());
}
