//! Helpers shared by the integration tests.

use simplelog::{Config, LevelFilter, TestLogger};

/// Route log output through the test harness so it shows up for failing
/// tests. Safe to call from every test.
pub fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}
