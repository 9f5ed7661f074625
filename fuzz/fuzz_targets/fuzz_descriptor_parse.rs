#![no_main]

use dbping::connection::DataSourceDescriptor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let descriptor = DataSourceDescriptor::from_raw(data);
    let _ = descriptor.redacted();

    // Whatever parses must format back to the same string
    if let Ok(config) = descriptor.parse() {
        let formatted = DataSourceDescriptor::from_config(&config);
        assert_eq!(formatted.as_str(), data);
    }
});
