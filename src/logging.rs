//! Append-only call log.
//!
//! Every prompt, response and failure handled by [`LlmClient`] is written as
//! one timestamped line to `<log-dir>/llm_calls_<YYYYMMDD>.log`. The log owns
//! a private [`Dispatch`], so its lines never reach the process's global
//! subscriber and global diagnostics never land in the call log.
//!
//! [`LlmClient`]: crate::client::LlmClient

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use once_cell::sync::OnceCell;
use tracing::dispatcher::{self, Dispatch};
use tracing::{error, info, warn, Level};
use tracing_subscriber::fmt::time::ChronoLocal;

use crate::config::ClientConfig;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static GLOBAL: OnceCell<Arc<CallLog>> = OnceCell::new();

/// Handle to the call log file.
pub struct CallLog {
    dispatch: Dispatch,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for CallLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallLog").field("path", &self.path).finish()
    }
}

/// File name of the log for `date`.
pub fn log_file_name(date: NaiveDate) -> String {
    format!("llm_calls_{}.log", date.format("%Y%m%d"))
}

impl CallLog {
    /// Open (creating if needed) today's log file inside `dir`.
    pub fn open(dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(log_file_name(Local::now().date_naive()));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let subscriber = tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
            .with_max_level(Level::INFO)
            .finish();

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            path: Some(path),
        })
    }

    /// A log that discards every line.
    pub fn disabled() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_max_level(Level::ERROR)
            .finish();
        Self {
            dispatch: Dispatch::new(subscriber),
            path: None,
        }
    }

    /// Initialize the process-wide log in `dir`.
    ///
    /// Only the first call opens a file; later calls return the existing
    /// handle whatever `dir` they pass. If the file cannot be opened the
    /// process-wide log discards lines instead of failing callers.
    pub fn init(dir: &Path) -> Arc<Self> {
        GLOBAL
            .get_or_init(|| match Self::open(dir) {
                Ok(log) => Arc::new(log),
                Err(e) => {
                    tracing::warn!(
                        dir = %dir.display(),
                        error = %e,
                        "Could not open call log, call logging disabled"
                    );
                    Arc::new(Self::disabled())
                }
            })
            .clone()
    }

    /// The process-wide log, initialized from `LOG_DIR` on first use.
    pub fn global() -> Arc<Self> {
        if let Some(log) = GLOBAL.get() {
            return log.clone();
        }
        Self::init(&ClientConfig::log_dir_from_env())
    }

    /// Path of the backing file, `None` for a disabled log.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn info(&self, message: &str) {
        dispatcher::with_default(&self.dispatch, || info!("{}", message));
    }

    pub fn warn(&self, message: &str) {
        dispatcher::with_default(&self.dispatch, || warn!("{}", message));
    }

    pub fn error(&self, message: &str) {
        dispatcher::with_default(&self.dispatch, || error!("{}", message));
    }
}
