//! Lifecycle of the process-wide logger.

use std::{fs, sync::Mutex};

use tierlog::{
    registry, ColorMode, Error, Format, LevelSpec, LogConfig, Logger, MemoryWriter, Severity, Threshold,
};

static TEST_REGISTRY_GUARD: Mutex<()> = Mutex::new(());

fn install_memory_logger(config: LogConfig) -> MemoryWriter {
    let console = MemoryWriter::new();
    let logger = Logger::builder(config.with_console(true).with_color(ColorMode::Never))
        .with_console_writer(console.clone())
        .build()
        .unwrap();
    tierlog::install(logger);
    console
}

#[test]
fn lazily_installs_default_logger() {
    let _guard = TEST_REGISTRY_GUARD.lock().unwrap();
    tierlog::reset();
    assert!(!registry::is_initialized());
    assert!(tierlog::config().is_none());

    tierlog::ensure_initialized();

    let logger = tierlog::instance().unwrap();
    assert_eq!(logger.format(), Format::Standard);
    assert_eq!(logger.console_threshold(), Some(Threshold::At(Severity::Info)));
    assert_eq!(logger.file_threshold(), None);
    tierlog::reset();
}

#[test]
fn first_call_initializes_registry() {
    let _guard = TEST_REGISTRY_GUARD.lock().unwrap();
    tierlog::reset();

    tierlog::trace(&[&"below the default threshold"]);

    assert!(registry::is_initialized());
    tierlog::reset();
}

#[test]
fn initialize_replaces_previous_logger() {
    let _guard = TEST_REGISTRY_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");

    tierlog::initialize(LogConfig::new().with_file(&first).with_file_level("info")).unwrap();
    tierlog::info(&[&"one"]);
    tierlog::initialize(LogConfig::new().with_file(&second).with_file_level("info")).unwrap();
    tierlog::info(&[&"two"]);
    tierlog::reset();

    assert!(fs::read_to_string(&first).unwrap().contains("[INFO] one"));
    let second_contents = fs::read_to_string(&second).unwrap();
    assert!(second_contents.contains("[INFO] two"));
    assert!(!second_contents.contains("one"));
}

#[test]
fn failed_initialize_leaves_registry_empty() {
    let _guard = TEST_REGISTRY_GUARD.lock().unwrap();
    install_memory_logger(LogConfig::new());
    assert!(registry::is_initialized());

    let err = tierlog::initialize(LogConfig::new().with_console_level("shouting")).unwrap_err();

    assert!(matches!(err, Error::InvalidLevelName(_)));
    assert!(!registry::is_initialized());
    tierlog::reset();
}

#[test]
fn reports_directory_errors() {
    let _guard = TEST_REGISTRY_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");

    let err = tierlog::initialize(LogConfig::new().with_directory(&missing)).unwrap_err();

    assert!(matches!(err, Error::DirectoryMissing(path) if path == missing));
    tierlog::reset();
}

#[test]
fn config_reflects_defaults_of_installed_logger() {
    let _guard = TEST_REGISTRY_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();

    tierlog::initialize(LogConfig::new().with_directory(dir.path())).unwrap();
    let config = tierlog::config().unwrap();
    tierlog::reset();

    assert_eq!(config.file_path(), Some(dir.path().join("log.txt")));
    assert_eq!(config.format, Some(Format::Standard));
    assert_eq!(config.file_level, Some(LevelSpec::Name("warning".into())));
    assert_eq!(config.console_level, Some(LevelSpec::Name("warning".into())));
    assert_eq!(config.rotation.max_size_mb, 10);
    assert_eq!(config.rotation.max_backups, 7);
    assert_eq!(config.rotation.max_age_days, 30);
}

#[test]
fn package_functions_route_through_installed_logger() {
    let _guard = TEST_REGISTRY_GUARD.lock().unwrap();
    let console = install_memory_logger(LogConfig::new().with_console_level("debug"));

    tierlog::trace(&[&"hidden"]);
    tierlog::debugf(format_args!("{} items", 3));
    tierlog::warningln(&[&"spaced"]);
    tierlog::print(&[&"always"]);
    let line = line!() + 1;
    tierlog::error!("macro ", 7);
    tierlog::print_log!("banner");
    tierlog::infof!("{:>3}", 5);
    tierlog::reset();

    let output = console.contents();
    assert!(!output.contains("hidden"));
    assert!(output.contains("[DEBUG] 3 items"));
    assert!(output.contains("[WARNING] spaced\n\n"));
    assert!(output.contains("[PRINT] always"));
    assert!(output.contains(&format!("registry.rs:{}] [ERROR] macro 7", line)), "{}", output);
    assert!(output.contains("[PRINT] banner"));
    assert!(output.contains("[INFO]   5"));
}

#[test]
fn reset_discards_instance() {
    let _guard = TEST_REGISTRY_GUARD.lock().unwrap();
    let console = install_memory_logger(LogConfig::new().with_console_level("info"));

    let snapshot = tierlog::instance().unwrap();
    tierlog::reset();
    assert!(!registry::is_initialized());

    // A snapshot taken before the reset keeps working.
    snapshot.info(&[&"still here"]);
    assert!(console.contents().contains("still here"));
}

#[test]
fn concurrent_initialize_and_logging() {
    let _guard = TEST_REGISTRY_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.log");
    tierlog::initialize(LogConfig::new().with_file(&path).with_file_level("info")).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let path = path.clone();
            std::thread::spawn(move || {
                for i in 0..20 {
                    if worker == 0 && i % 5 == 0 {
                        tierlog::initialize(
                            LogConfig::new().with_file(&path).with_file_level("info"),
                        )
                        .unwrap();
                    }
                    tierlog::info(&[&"worker ", &worker, &" record ", &i]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    tierlog::reset();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 80);
    assert!(contents.lines().all(|line| line.contains("[INFO] worker ")));
}
