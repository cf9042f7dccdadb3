use zitems_logger::{ConsoleTarget, LevelFilter, Logger};

#[test]
fn stderr_console_has_no_guard() {
    let logger = Logger::builder()
        .name("zitems-console-only")
        .console_target(ConsoleTarget::Stderr)
        .ansi(false)
        .level(LevelFilter::INFO)
        .init()
        .expect("logger should initialize");

    assert!(logger.guard().is_none(), "console-only logger should not create a file guard");
}
