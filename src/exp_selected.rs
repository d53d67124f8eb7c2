//! Run the selected Alibaba traces at one P/E cycle count, at 25C.
//!
//! Usage: `selected <trace1> [<trace2> ...] <cycle>`. Output goes to
//! `./log/PE<cycle>/selected/vanila` unless `--label` says otherwise.

use clap::clap_app;

use crate::{
    paths::*,
    sweep::{
        DeviceConfigName, FailurePolicy, LogLayout, SweepConfig, SweepError, SweepParams,
        TraceConfigName,
    },
};

/// The temperature all of the selected traces are simulated at.
pub const TEMPERATURE: &str = "25";

/// The default output label.
pub const DEFAULT_LABEL: &str = "selected/vanila";

pub fn cli_options() -> clap::App<'static, 'static> {
    let app = clap_app! { selected =>
        (about: "Simulate the selected Alibaba traces at the given P/E cycle count.")
        (@setting ArgRequiredElseHelp)
        (@setting DisableVersion)
        (@arg ARGS: +required +takes_value +multiple
         "One or more trace names followed by the P/E cycle count (e.g. ali_1 ali_2 3000)")
        (@arg LABEL: --label +takes_value
         "The output label nested under the P/E directory. Pass an empty string for none. \
          (default: selected/vanila)")
    };

    crate::cli::sweep::add_cli_options(app)
}

/// The default configuration for this sweep, before CLI overrides.
pub fn default_config() -> SweepConfig {
    SweepConfig {
        simulator: SIMULATOR.into(),
        log_dir: LOG_DIR.into(),
        trace_config_dir: SELECTED_TRACE_CONFIG_DIR.into(),
        device_config_dir: DEVICE_CONFIG_DIR.into(),
        layout: LogLayout::PerCycle,
        trace_config: TraceConfigName::Plain,
        device_config: DeviceConfigName::Alibaba,
        policy: FailurePolicy::Continue,
        dry_run: false,
        record: false,
    }
}

/// All but the last argument are traces; the last is the P/E cycle count.
pub fn split_traces_and_cycle(mut args: Vec<String>) -> Result<(Vec<String>, String), SweepError> {
    if args.len() < 2 {
        return Err(SweepError::MissingCycle);
    }

    let cycle = args.pop().ok_or(SweepError::MissingCycle)?;
    Ok((args, cycle))
}

/// Turn the parsed subcommand into sweep parameters.
pub fn params(sub_m: &clap::ArgMatches<'_>) -> Result<SweepParams, failure::Error> {
    let args = sub_m
        .values_of("ARGS")
        .map(|values| values.map(String::from).collect())
        .unwrap_or_else(Vec::new);
    let (traces, cycle) = split_traces_and_cycle(args)?;
    let label = sub_m.value_of("LABEL").unwrap_or(DEFAULT_LABEL);

    Ok(SweepParams::new(
        traces,
        cycle,
        TEMPERATURE,
        Some(label.into()),
    )?)
}

pub fn run(sub_m: &clap::ArgMatches<'_>) -> Result<(), failure::Error> {
    let params = params(sub_m)?;
    let config = crate::cli::sweep::parse_cli_options(sub_m, default_config());

    crate::sweep::run(&params, &config)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn last_argument_is_cycle() {
        let (traces, cycle) = split_traces_and_cycle(strings(&["A", "B", "3000"])).unwrap();
        assert_eq!(traces, strings(&["A", "B"]));
        assert_eq!(cycle, "3000");
    }

    #[test]
    fn needs_a_trace_and_a_cycle() {
        assert!(matches!(
            split_traces_and_cycle(strings(&["3000"])),
            Err(SweepError::MissingCycle)
        ));
        assert!(matches!(
            split_traces_and_cycle(vec![]),
            Err(SweepError::MissingCycle)
        ));
    }

    #[test]
    fn parses_subcommand() {
        let matches = cli_options().get_matches_from(&["selected", "A", "B", "3000"]);
        let params = params(&matches).unwrap();

        assert_eq!(params.traces(), &strings(&["A", "B"])[..]);
        assert_eq!(params.cycle(), "3000");
        assert_eq!(params.temperature(), "25");
        assert_eq!(params.label(), Some("selected/vanila"));

        let inv = default_config().invocation(&params, "A");
        assert_eq!(
            inv.output_dir,
            std::path::PathBuf::from("./log/PE3000/selected/vanila")
        );
    }

    #[test]
    fn empty_label() {
        let matches =
            cli_options().get_matches_from(&["selected", "A", "3000", "--label", ""]);
        let params = params(&matches).unwrap();
        assert_eq!(params.label(), None);
    }
}
