use log::{Level, LevelFilter, Metadata, Record};

/// Console logger with per-component tags.
///
/// `Logger::init` also installs it as the `log` backend so messages from
/// the `shared` crate end up in the browser console.
pub struct Logger;

static CONSOLE_BRIDGE: ConsoleBridge = ConsoleBridge;

impl Logger {
    pub fn init() {
        if log::set_logger(&CONSOLE_BRIDGE).is_ok() {
            let level = if cfg!(debug_assertions) {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            };
            log::set_max_level(level);
        }
    }

    pub fn debug_with_component(component: &str, message: &str) {
        Self::log(Level::Debug, component, message);
    }

    pub fn info_with_component(component: &str, message: &str) {
        Self::log(Level::Info, component, message);
    }

    pub fn warn_with_component(component: &str, message: &str) {
        Self::log(Level::Warn, component, message);
    }

    pub fn error_with_component(component: &str, message: &str) {
        Self::log(Level::Error, component, message);
    }

    fn log(level: Level, component: &str, message: &str) {
        if level > log::max_level() {
            return;
        }
        let line = format!("[{}] {}", component, message);
        match level {
            Level::Error => gloo::console::error!(line),
            Level::Warn => gloo::console::warn!(line),
            Level::Info => gloo::console::info!(line),
            Level::Debug | Level::Trace => gloo::console::debug!(line),
        }
    }
}

struct ConsoleBridge;

impl log::Log for ConsoleBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            Logger::log(record.level(), record.target(), &record.args().to_string());
        }
    }

    fn flush(&self) {}
}
