//! Run one trace with the per-temperature simulator build.
//!
//! The trace config is `<trace>_<cycle>_<temp>.cfg`, the SSD config is `temp<temp>_pe<cycle>.cfg`
//! and everything is written straight into `./log`.

use clap::clap_app;

use crate::{
    paths::*,
    sweep::{DeviceConfigName, FailurePolicy, LogLayout, SweepConfig, SweepParams, TraceConfigName},
};

pub const DEFAULT_TEMPERATURE: &str = "25";

pub fn cli_options() -> clap::App<'static, 'static> {
    let app = clap_app! { temp =>
        (about: "Simulate one trace with the simulator built for a given temperature.")
        (@setting ArgRequiredElseHelp)
        (@setting DisableVersion)
        (@arg TRACE: +required +takes_value "The trace to simulate (e.g. ali_1)")
        (@arg CYCLE: +required +takes_value "The P/E cycle count (e.g. 3000)")
        (@arg TEMPERATURE: --temperature +takes_value
         "The temperature; selects the simulator build and configs (default: 25)")
    };

    crate::cli::sweep::add_cli_options(app)
}

/// The simulator binary built for `temperature`, e.g. `./simplessd-standalone-temp25`.
pub fn simulator_for(temperature: &str) -> String {
    format!("{}-temp{}", SIMULATOR, temperature)
}

pub fn default_config(temperature: &str) -> SweepConfig {
    SweepConfig {
        simulator: simulator_for(temperature).into(),
        log_dir: LOG_DIR.into(),
        trace_config_dir: TRACE_CONFIG_DIR.into(),
        device_config_dir: DEVICE_CONFIG_DIR.into(),
        layout: LogLayout::Flat,
        trace_config: TraceConfigName::CycleTemperature,
        device_config: DeviceConfigName::Temperature,
        policy: FailurePolicy::Continue,
        dry_run: false,
        record: false,
    }
}

pub fn params(sub_m: &clap::ArgMatches<'_>) -> Result<SweepParams, failure::Error> {
    let trace = sub_m.value_of("TRACE").unwrap_or_default();
    let cycle = sub_m.value_of("CYCLE").unwrap_or_default();
    let temperature = sub_m.value_of("TEMPERATURE").unwrap_or(DEFAULT_TEMPERATURE);

    Ok(SweepParams::new(
        vec![trace.into()],
        cycle,
        temperature,
        None,
    )?)
}

pub fn run(sub_m: &clap::ArgMatches<'_>) -> Result<(), failure::Error> {
    let params = params(sub_m)?;
    let config =
        crate::cli::sweep::parse_cli_options(sub_m, default_config(params.temperature()));

    crate::sweep::run(&params, &config)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    #[test]
    fn default_invocation() {
        let matches = cli_options().get_matches_from(&["temp", "ali_1", "3000"]);
        let params = params(&matches).unwrap();
        let inv = default_config(params.temperature()).invocation(&params, "ali_1");

        assert_eq!(inv.simulator, PathBuf::from("./simplessd-standalone-temp25"));
        assert_eq!(inv.trace_config, PathBuf::from("./config/ali_1_3000_25.cfg"));
        assert_eq!(
            inv.device_config,
            PathBuf::from("./simplessd/config/temp25_pe3000.cfg")
        );
        assert_eq!(inv.output_dir, PathBuf::from("./log"));
    }

    #[test]
    fn other_temperature() {
        let matches =
            cli_options().get_matches_from(&["temp", "ali_1", "5000", "--temperature", "50"]);
        let params = params(&matches).unwrap();
        let config = crate::cli::sweep::parse_cli_options(
            &matches,
            default_config(params.temperature()),
        );
        let inv = config.invocation(&params, "ali_1");

        assert_eq!(inv.simulator, PathBuf::from("./simplessd-standalone-temp50"));
        assert_eq!(inv.trace_config, PathBuf::from("./config/ali_1_5000_50.cfg"));
        assert_eq!(
            inv.device_config,
            PathBuf::from("./simplessd/config/temp50_pe5000.cfg")
        );
    }
}
