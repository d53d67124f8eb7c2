//! A library of routines for sweeping the SimpleSSD standalone simulator over traces, device
//! configurations and P/E cycle counts.
//!
//! Each sweep variant lives in its own `exp_*` module and exposes `cli_options` and `run`, so
//! that `main` only needs to dispatch on the subcommand name.

pub mod cli;
pub mod output;
pub mod sweep;

pub mod exp_group;
pub mod exp_selected;
pub mod exp_temp;

/// Common paths, relative to the directory the runner is invoked from.
pub mod paths {
    /// The simulator binary. Per-temperature builds append `-temp<temperature>`.
    pub const SIMULATOR: &str = "./simplessd-standalone";

    /// Root of all simulator output.
    pub const LOG_DIR: &str = "./log";

    /// Trace configurations for the "selected" Alibaba traces.
    pub const SELECTED_TRACE_CONFIG_DIR: &str = "./config/selected";

    /// Trace configurations for everything else.
    pub const TRACE_CONFIG_DIR: &str = "./config";

    /// SSD (device) configurations.
    pub const DEVICE_CONFIG_DIR: &str = "./simplessd/config";
}
