//! Run traces against the grouped-refresh SSD configurations at several P/E cycle counts.
//!
//! For each cycle count (3000 and 5000 by default), every trace is simulated with
//! `temp<temp>_pe<cycle>_<label>.cfg`, and its output goes to
//! `./log/temp<temp>/PE<cycle>/<label>/<trace>`.

use clap::clap_app;

use log::info;

use crate::{
    paths::*,
    sweep::{
        DeviceConfigName, FailurePolicy, LogLayout, SweepConfig, SweepError, SweepParams,
        TraceConfigName,
    },
};

pub const DEFAULT_CYCLES: &str = "3000,5000";
pub const DEFAULT_LABEL: &str = "group1";
pub const DEFAULT_TEMPERATURE: &str = "25";

pub fn cli_options() -> clap::App<'static, 'static> {
    let app = clap_app! { group =>
        (about: "Simulate traces with grouped refresh at several P/E cycle counts.")
        (@setting ArgRequiredElseHelp)
        (@setting DisableVersion)
        (@arg TRACES: +required +takes_value +multiple
         "The traces to simulate (e.g. ali_1)")
        (@arg CYCLES: --cycles +takes_value
         "Comma-separated P/E cycle counts (default: 3000,5000)")
        (@arg LABEL: --label +takes_value
         "The grouping label, used in both the SSD config name and output path (default: group1)")
        (@arg TEMPERATURE: --temperature +takes_value
         "The temperature of the SSD config (default: 25)")
    };

    crate::cli::sweep::add_cli_options(app)
}

pub fn default_config() -> SweepConfig {
    SweepConfig {
        simulator: SIMULATOR.into(),
        log_dir: LOG_DIR.into(),
        trace_config_dir: TRACE_CONFIG_DIR.into(),
        device_config_dir: DEVICE_CONFIG_DIR.into(),
        layout: LogLayout::PerTemperatureTrace,
        trace_config: TraceConfigName::Plain,
        device_config: DeviceConfigName::TemperatureLabel,
        policy: FailurePolicy::Continue,
        dry_run: false,
        record: false,
    }
}

/// Parse a comma-separated list of cycle counts, skipping blanks.
pub fn parse_cycles(cycles: &str) -> Vec<String> {
    cycles
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

/// One set of sweep parameters per cycle count, in the order given.
pub fn params(sub_m: &clap::ArgMatches<'_>) -> Result<Vec<SweepParams>, failure::Error> {
    let traces: Vec<String> = sub_m
        .values_of("TRACES")
        .map(|values| values.map(String::from).collect())
        .unwrap_or_else(Vec::new);
    let cycles = parse_cycles(sub_m.value_of("CYCLES").unwrap_or(DEFAULT_CYCLES));
    let label = sub_m.value_of("LABEL").unwrap_or(DEFAULT_LABEL);
    let temperature = sub_m.value_of("TEMPERATURE").unwrap_or(DEFAULT_TEMPERATURE);

    if cycles.is_empty() {
        return Err(SweepError::MissingCycle.into());
    }

    cycles
        .into_iter()
        .map(|cycle| {
            SweepParams::new(traces.clone(), cycle, temperature, Some(label.into()))
                .map_err(failure::Error::from)
        })
        .collect()
}

pub fn run(sub_m: &clap::ArgMatches<'_>) -> Result<(), failure::Error> {
    let sweeps = params(sub_m)?;
    let config = crate::cli::sweep::parse_cli_options(sub_m, default_config());

    for params in sweeps.iter() {
        info!("Starting sweep for PE {}", params.cycle());
        crate::sweep::run(params, &config)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    #[test]
    fn cycles() {
        assert_eq!(parse_cycles("3000,5000"), vec!["3000", "5000"]);
        assert_eq!(parse_cycles(" 3000 , ,5000,"), vec!["3000", "5000"]);
        assert!(parse_cycles(",").is_empty());
    }

    #[test]
    fn default_sweep() {
        let matches = cli_options().get_matches_from(&["group", "ali_3"]);
        let sweeps = params(&matches).unwrap();
        assert_eq!(sweeps.len(), 2);

        let config = default_config();
        let first = config.invocation(&sweeps[0], "ali_3");
        assert_eq!(first.trace_config, PathBuf::from("./config/ali_3.cfg"));
        assert_eq!(
            first.device_config,
            PathBuf::from("./simplessd/config/temp25_pe3000_group1.cfg")
        );
        assert_eq!(
            first.output_dir,
            PathBuf::from("./log/temp25/PE3000/group1/ali_3")
        );

        let second = config.invocation(&sweeps[1], "ali_3");
        assert_eq!(
            second.device_config,
            PathBuf::from("./simplessd/config/temp25_pe5000_group1.cfg")
        );
        assert_eq!(
            second.output_dir,
            PathBuf::from("./log/temp25/PE5000/group1/ali_3")
        );
    }

    #[test]
    fn overrides() {
        let matches = cli_options().get_matches_from(&[
            "group",
            "a",
            "b",
            "--cycles",
            "1000",
            "--label",
            "group3",
            "--temperature",
            "50",
        ]);
        let sweeps = params(&matches).unwrap();
        assert_eq!(sweeps.len(), 1);
        assert_eq!(sweeps[0].traces().len(), 2);

        let inv = default_config().invocation(&sweeps[0], "b");
        assert_eq!(
            inv.device_config,
            PathBuf::from("./simplessd/config/temp50_pe1000_group3.cfg")
        );
        assert_eq!(inv.output_dir, PathBuf::from("./log/temp50/PE1000/group3/b"));
    }

    #[test]
    fn no_cycles() {
        let matches = cli_options().get_matches_from(&["group", "a", "--cycles", ","]);
        assert!(params(&matches).is_err());
    }
}
