//! Some routines for adding common CLI options in a consistent, less boilerplatey way.

/// CLI options shared by every sweep: where things live and what to do on failure.
pub mod sweep {
    use clap::{App, Arg, ArgMatches};

    use crate::sweep::{FailurePolicy, SweepConfig};

    pub fn add_cli_options<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
        app.arg(
            Arg::with_name("SIMULATOR")
                .long("simulator")
                .takes_value(true)
                .help("The simulator binary to run (e.g. ./simplessd-standalone)"),
        )
        .arg(
            Arg::with_name("LOG_DIR")
                .long("log_dir")
                .takes_value(true)
                .help("The directory under which simulator output goes (default: ./log)"),
        )
        .arg(
            Arg::with_name("CONFIG_DIR")
                .long("config_dir")
                .takes_value(true)
                .help("The directory containing the trace configurations"),
        )
        .arg(
            Arg::with_name("DEVICE_CONFIG_DIR")
                .long("device_config_dir")
                .takes_value(true)
                .help("The directory containing the SSD configurations (default: ./simplessd/config)"),
        )
        .arg(
            Arg::with_name("ABORT_ON_FAILURE")
                .long("abort_on_failure")
                .help(
                    "Stop the sweep as soon as the simulator exits unsuccessfully. By default, \
                     failures are logged and the next trace is run.",
                ),
        )
        .arg(
            Arg::with_name("DRY_RUN")
                .long("dry_run")
                .help("Print the simulator commands without creating directories or running them."),
        )
        .arg(
            Arg::with_name("RECORD")
                .long("record")
                .conflicts_with("DRY_RUN")
                .help("Write a JSON .params file into each output directory before simulating."),
        )
    }

    /// Apply the values added by `add_cli_options` on top of the given defaults.
    pub fn parse_cli_options(sub_m: &ArgMatches<'_>, mut config: SweepConfig) -> SweepConfig {
        if let Some(simulator) = sub_m.value_of("SIMULATOR") {
            config.simulator = simulator.into();
        }
        if let Some(log_dir) = sub_m.value_of("LOG_DIR") {
            config.log_dir = log_dir.into();
        }
        if let Some(config_dir) = sub_m.value_of("CONFIG_DIR") {
            config.trace_config_dir = config_dir.into();
        }
        if let Some(device_config_dir) = sub_m.value_of("DEVICE_CONFIG_DIR") {
            config.device_config_dir = device_config_dir.into();
        }

        config.policy = if sub_m.is_present("ABORT_ON_FAILURE") {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        };
        config.dry_run = sub_m.is_present("DRY_RUN");
        config.record = sub_m.is_present("RECORD");

        config
    }

}
