use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static TUI_MODE: AtomicBool = AtomicBool::new(false);

/// Console logging through env_logger. Every record is also forwarded to
/// tui-logger so the log pane has history once the terminal UI starts.
pub fn init_logger(level: log::LevelFilter) {
    let drain = tui_logger::Drain::new();
    let result = env_logger::Builder::default()
        .filter_level(level)
        .format(move |buf, record| {
            drain.log(record);

            if TUI_MODE.load(Ordering::Relaxed) {
                return Ok(());
            }

            let timestamp = chrono::Local::now().format("%H:%M:%S");
            let target = record.target();
            if target != record.module_path().unwrap_or("unknown") {
                writeln!(buf, "[{timestamp}] {} [{target}]: {}", record.level(), record.args())
            } else {
                writeln!(buf, "[{timestamp}] {}: {}", record.level(), record.args())
            }
        })
        .try_init();

    tui_logger::set_default_level(level);

    match result {
        Ok(()) => log::debug!("Logger initialized at {level}"),
        Err(e) => eprintln!("logger already initialized: {e}"),
    }
}

pub fn switch_to_tui_logging() {
    TUI_MODE.store(true, Ordering::Relaxed);
    log::info!("Switched to TUI logging");
}

pub fn switch_to_console_logging() {
    TUI_MODE.store(false, Ordering::Relaxed);
}
