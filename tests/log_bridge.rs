//! Records from the `log` facade land in the global logger.

use log::LevelFilter;
use tierlog::{ColorMode, LogBridge, LogConfig, Logger, MemoryWriter};

#[test]
fn log_macros_reach_installed_logger() {
    let console = MemoryWriter::new();
    let logger = Logger::builder(
        LogConfig::new()
            .with_console(true)
            .with_console_level("info")
            .with_color(ColorMode::Never),
    )
    .with_console_writer(console.clone())
    .build()
    .unwrap();
    tierlog::install(logger);
    LogBridge::init(LevelFilter::Trace).unwrap();

    log::debug!("filtered by threshold");
    let line = line!() + 1;
    log::warn!("disk at {}%", 91);
    log::error!(target: "db", "connection lost");
    log::logger().flush();

    let output = console.contents();
    assert!(!output.contains("filtered by threshold"));
    assert!(
        output.contains(&format!("log_bridge.rs:{}] [WARNING] disk at 91%", line)),
        "{}",
        output
    );
    assert!(output.contains("[ERROR] connection lost"));
    assert_eq!(console.lines().len(), 2);

    assert!(LogBridge::init(LevelFilter::Info).is_err());
    tierlog::reset();
}
