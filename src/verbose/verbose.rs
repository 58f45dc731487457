// src/verbose/verbose.rs
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, info, trace, Level};
use tracing_subscriber::{fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Hierarchical logging levels for scheduler debugging.
///
/// Each level includes all lower levels, providing increasingly detailed
/// output. Uses JSON structured logging via the `tracing` crate.
///
/// # Examples
///
/// ```rust
/// use tcg_intersection_sim::verbose::{VerboseLevel, set_verbose_level};
///
/// set_verbose_level(VerboseLevel::Main);
///
/// if VerboseLevel::Main.is_at_least(VerboseLevel::Additional) {
///     println!("Will log additional details");
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum VerboseLevel {
    /// No debug at all
    None = 0,
    /// Major phases - TCG build, simulator start/restart, termination - `info` level
    Main = 1,
    /// Function-level details - `debug` level
    Additional = 2,
    /// Loop iterations and fine operations - `debug` level
    Detailed = 3,
    /// Everything including traces - `trace` level
    All = 4,
}

impl fmt::Display for VerboseLevel {
    /// ```rust
    /// use tcg_intersection_sim::verbose::VerboseLevel;
    ///
    /// assert_eq!(format!("{}", VerboseLevel::None), "none");
    /// assert_eq!(format!("{}", VerboseLevel::Main), "main");
    /// assert_eq!(format!("{}", VerboseLevel::Additional), "additional");
    /// assert_eq!(format!("{}", VerboseLevel::Detailed), "detailed");
    /// assert_eq!(format!("{}", VerboseLevel::All), "all");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerboseLevel::None => "none",
            VerboseLevel::Main => "main",
            VerboseLevel::Additional => "additional",
            VerboseLevel::Detailed => "detailed",
            VerboseLevel::All => "all",
        };
        write!(f, "{}", s)
    }
}

impl From<VerboseLevel> for Level {
    fn from(level: VerboseLevel) -> Self {
        match level {
            VerboseLevel::None => Level::ERROR,
            VerboseLevel::Main => Level::INFO,
            VerboseLevel::Additional => Level::DEBUG,
            VerboseLevel::Detailed => Level::DEBUG,
            VerboseLevel::All => Level::TRACE,
        }
    }
}

// Event type constants: one per TCG / simulator / environment / q-learning
// phase boundary that actually emits a log line in this crate.
pub const EVENT_TCG_BUILD: &str = "tcg_build";
pub const EVENT_TCG_START_EXECUTE: &str = "tcg_start_execute";
pub const EVENT_TCG_FINISH_EXECUTE: &str = "tcg_finish_execute";
pub const EVENT_TCG_DEADLOCK: &str = "tcg_deadlock";
pub const EVENT_SIM_START: &str = "simulator_start";
pub const EVENT_SIM_RESTART: &str = "simulator_restart";
pub const EVENT_STEP: &str = "step";
pub const EVENT_SIM_TERMINATED: &str = "simulator_terminated";
pub const EVENT_ENV_RESET: &str = "env_reset";
pub const EVENT_ENV_STEP: &str = "env_step";
pub const EVENT_QLEARN_EPISODE: &str = "qlearning_episode";

// Global verbose level storage
static VERBOSE_LEVEL: OnceLock<VerboseLevel> = OnceLock::new();
static LOGGER_INITIALIZED: OnceLock<bool> = OnceLock::new();

/// Initialize the tracing logger once
pub fn init_logger() {
    if LOGGER_INITIALIZED.set(true).is_ok() {
        tracing_subscriber::registry()
            .with(
                tracing_fmt::layer()
                    .json()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

/// Sets the global verbose level and updates tracing filter
pub fn set_verbose_level(level: VerboseLevel) {
    let _ = VERBOSE_LEVEL.set(level);
    init_logger();
}

/// Gets the current global verbose level
pub fn get_verbose_level() -> VerboseLevel {
    *VERBOSE_LEVEL.get().unwrap_or(&VerboseLevel::None)
}

/// Checks if current global verbose level is at least the specified level
pub fn is_verbose_level(level: VerboseLevel) -> bool {
    get_verbose_level() >= level
}

/// Logs a message if the global verbose level allows it
pub fn verbose_log(level: VerboseLevel, event: &str, message: &str) {
    if !is_verbose_level(level) {
        return;
    }
    match level {
        VerboseLevel::None => {}
        VerboseLevel::Main => info!(event = event, message),
        VerboseLevel::Additional => debug!(event = event, message),
        VerboseLevel::Detailed => debug!(event = event, message),
        VerboseLevel::All => trace!(event = event, message),
    }
}

impl VerboseLevel {
    /// Checks if this level is at least the minimum level
    pub fn is_at_least(self, min_level: VerboseLevel) -> bool {
        self >= min_level
    }
}

/// Logs an `info`-level message if the global verbose level is at least
/// [`VerboseLevel::Main`].
#[macro_export]
macro_rules! log_main {
    ($event:expr, $msg:literal, $($key:ident = $value:expr),* $(,)?) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Main) {
            tracing::info!(event = $event, $($key = $value,)* $msg);
        }
    };
}

/// Logs a `debug`-level message if the global verbose level is at least
/// [`VerboseLevel::Additional`].
///
/// Use for function-level details: TCG vertex/edge counts, vehicle added,
/// start_execute/finish_execute calls.
#[macro_export]
macro_rules! log_additional {
    ($event:expr, $msg:literal, $($key:ident = $value:expr),* $(,)?) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Additional) {
            tracing::debug!(event = $event, $($key = $value,)* $msg);
        }
    };
}

/// Logs a `debug`-level message if the global verbose level is at least
/// [`VerboseLevel::Detailed`]. Use for per-step loop internals (ee
/// recomputation, executable-set membership).
#[macro_export]
macro_rules! log_detailed {
    ($event:expr, $msg:literal, $($key:ident = $value:expr),* $(,)?) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Detailed) {
            tracing::debug!(event = $event, $($key = $value,)* $msg);
        }
    };
}

/// Logs a `trace`-level message if the global verbose level is
/// [`VerboseLevel::All`].
#[macro_export]
macro_rules! log_all {
    ($event:expr, $msg:literal, $($key:ident = $value:expr),* $(,)?) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::All) {
            tracing::trace!(event = $event, $($key = $value,)* $msg);
        }
    };
}
