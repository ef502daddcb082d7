//! FILENAME: app/src/logging.rs
// PURPOSE: Unified logging system for the dashboards.
// FORMAT: seq|level|category|message

use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use once_cell::sync::Lazy;

// ============================================================================
// UNIFIED LOGGING SYSTEM
// ============================================================================

/// Global sequence counter
static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Global log file handle
pub static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

/// Path of the open log file, if any
static LOG_PATH: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

/// Set once `init_logger` has chosen a level
static LEVEL_SET: AtomicBool = AtomicBool::new(false);

/// Bridge so crates logging through the `log` facade land in the same file
static LOGGER: UnifiedLogger = UnifiedLogger;

/// Get next sequence number
pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

/// Get the unified log file path, if a file has been opened
pub fn get_log_path() -> Option<PathBuf> {
    LOG_PATH.lock().ok().and_then(|guard| guard.clone())
}

/// Initialize the unified log file (truncating any previous run)
pub fn init_log_file(log_path: &Path) -> Result<PathBuf, String> {
    if let Some(dir) = log_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create log dir at {:?}: {}", dir, e))?;
        }
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(log_path)
        .map_err(|e| format!("Failed to create log file {:?}: {}", log_path, e))?;

    let mut log_file = LOG_FILE.lock()
        .map_err(|e| format!("Lock error: {}", e))?;
    *log_file = Some(file);

    if let Ok(mut guard) = LOG_PATH.lock() {
        *guard = Some(log_path.to_path_buf());
    }

    Ok(log_path.to_path_buf())
}

/// Install the `log` facade bridge. Safe to call more than once; the
/// level applies to the unified macros as well.
pub fn init_logger(max_level: log::LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(max_level);
    LEVEL_SET.store(true, Ordering::SeqCst);
}

/// Whether debug lines (including ENTER/EXIT tracing) are written.
/// Everything is written until `init_logger` picks a level.
pub fn debug_enabled() -> bool {
    !LEVEL_SET.load(Ordering::SeqCst) || log::max_level() >= log::LevelFilter::Debug
}

/// Write a log line in unified format
pub fn write_log(level: &str, category: &str, message: &str) {
    let seq = next_seq();
    let line = format!("{}|{}|{}|{}", seq, level, category, message);

    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            if let Err(e) = writeln!(file, "{}", line) {
                eprintln!("[LOG_ERROR] Failed to write: {}", e);
            }
            let _ = file.flush();
        }
    }

    // stdout carries command output
    eprintln!("{}", line);
}

/// Write an ENTER log line for function entry
pub fn write_log_enter(level: &str, category: &str, func_name: &str, params: &str) {
    let message = if params.is_empty() {
        format!("ENTER {}", func_name)
    } else {
        format!("ENTER {} {}", func_name, params)
    };
    write_log(level, category, &message);
}

/// Write an EXIT log line for function exit
pub fn write_log_exit(level: &str, category: &str, func_name: &str, result: &str) {
    let message = if result.is_empty() {
        format!("EXIT {}", func_name)
    } else {
        format!("EXIT {} {}", func_name, result)
    };
    write_log(level, category, &message);
}

fn level_code(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "E",
        log::Level::Warn => "W",
        log::Level::Info => "I",
        log::Level::Debug | log::Level::Trace => "D",
    }
}

// ============================================================================
// LOG FACADE BRIDGE
// ============================================================================

/// `log::Log` implementation writing through [`write_log`]. The record
/// target becomes the category.
pub struct UnifiedLogger;

impl log::Log for UnifiedLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            write_log(
                level_code(record.level()),
                record.target(),
                &record.args().to_string(),
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some(ref mut file) = *guard {
                let _ = file.flush();
            }
        }
    }
}

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::write_log("D", $cat, &format!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("I", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("W", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("E", $cat, &format!($($arg)*))
    };
}

// ENTER/EXIT macros for function tracing

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::write_log_enter("D", $cat, $func, "")
        }
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::write_log_enter("D", $cat, $func, &format!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::write_log_exit("D", $cat, $func, "")
        }
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::write_log_exit("D", $cat, $func, &format!($($arg)*))
        }
    };
}

pub use log_debug;
pub use log_info;
pub use log_warn;
pub use log_error;
pub use log_enter;
pub use log_exit;
