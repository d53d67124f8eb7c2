//! The sweep driver: for each trace, make sure the output directory exists and run the simulator
//! on it, one trace at a time.
//!
//! Everything here is driven by a `SweepParams` (what to run) and a `SweepConfig` (where things
//! live and how names are formed). Launching goes through the `Launcher` trait so that the driver
//! can be exercised without a real simulator.

use std::path::{Path, PathBuf};
use std::process::Command;

use failure::{Fail, ResultExt};

use log::{debug, info, warn};

use serde::Serialize;

use crate::output;

/// Errors produced by the sweep driver itself (as opposed to I/O or launch errors).
#[derive(Debug, Fail)]
pub enum SweepError {
    #[fail(display = "No traces given")]
    NoTraces,

    #[fail(display = "Expected at least one trace followed by a P/E cycle count")]
    MissingCycle,

    #[fail(display = "Invalid {} \"{}\": {}", field, value, reason)]
    InvalidSegment {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[fail(display = "Simulator failed on trace {} (exit code: {:?})", trace, code)]
    SimulatorFailed { trace: String, code: Option<i32> },
}

/// Check that `value` can be used as a single path component.
pub fn validate_segment(field: &'static str, value: &str) -> Result<(), SweepError> {
    let reason = if value.is_empty() {
        Some("must not be empty")
    } else if value == "." || value == ".." {
        Some("must not be `.` or `..`")
    } else if value.contains('/') || value.contains(std::path::MAIN_SEPARATOR) {
        Some("must not contain a path separator")
    } else if value.contains('\0') {
        Some("must not contain a NUL byte")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SweepError::InvalidSegment {
            field,
            value: value.into(),
            reason,
        }),
        None => Ok(()),
    }
}

/// What to run. Construct with `SweepParams::new`, which validates every field that ends up in a
/// path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SweepParams {
    traces: Vec<String>,
    cycle: String,
    temperature: String,
    label: Option<String>,
}

impl SweepParams {
    /// `label` may contain `/` to nest the output (e.g. `selected/vanila`). An empty label is the
    /// same as no label.
    pub fn new<C, T>(
        traces: Vec<String>,
        cycle: C,
        temperature: T,
        label: Option<String>,
    ) -> Result<Self, SweepError>
    where
        C: Into<String>,
        T: Into<String>,
    {
        let cycle = cycle.into();
        let temperature = temperature.into();
        let label = label.filter(|l| !l.is_empty());

        if traces.is_empty() {
            return Err(SweepError::NoTraces);
        }
        for trace in traces.iter() {
            validate_segment("trace", trace)?;
        }
        validate_segment("P/E cycle", &cycle)?;
        validate_segment("temperature", &temperature)?;
        if let Some(label) = &label {
            for segment in label.split('/') {
                validate_segment("label", segment)?;
            }
        }

        Ok(SweepParams {
            traces,
            cycle,
            temperature,
            label,
        })
    }

    pub fn traces(&self) -> &[String] {
        &self.traces
    }

    pub fn cycle(&self) -> &str {
        &self.cycle
    }

    pub fn temperature(&self) -> &str {
        &self.temperature
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_ref().map(String::as_str)
    }

    fn label_segments(&self) -> impl Iterator<Item = &str> {
        self.label.iter().flat_map(|l| l.split('/'))
    }
}

/// How the output directory of a single simulation is laid out under the log directory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum LogLayout {
    /// `<log>/PE<cycle>[/<label>...]`
    PerCycle,

    /// `<log>/temp<temperature>/PE<cycle>[/<label>...]/<trace>`
    PerTemperatureTrace,

    /// `<log>`
    Flat,
}

impl LogLayout {
    pub fn output_dir(self, log_dir: &Path, params: &SweepParams, trace: &str) -> PathBuf {
        let mut dir = log_dir.to_path_buf();

        match self {
            LogLayout::PerCycle => {
                dir.push(format!("PE{}", params.cycle));
                dir.extend(params.label_segments());
            }
            LogLayout::PerTemperatureTrace => {
                dir.push(format!("temp{}", params.temperature));
                dir.push(format!("PE{}", params.cycle));
                dir.extend(params.label_segments());
                dir.push(trace);
            }
            LogLayout::Flat => {}
        }

        dir
    }
}

/// File name template for the trace (simulator) configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TraceConfigName {
    /// `<trace>.cfg`
    Plain,

    /// `<trace>_<cycle>_<temperature>.cfg`
    CycleTemperature,
}

impl TraceConfigName {
    pub fn file_name(self, params: &SweepParams, trace: &str) -> String {
        match self {
            TraceConfigName::Plain => format!("{}.cfg", trace),
            TraceConfigName::CycleTemperature => {
                format!("{}_{}_{}.cfg", trace, params.cycle, params.temperature)
            }
        }
    }
}

/// File name template for the SSD (device) configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DeviceConfigName {
    /// `alibaba_pe<cycle>.cfg`
    Alibaba,

    /// `temp<temperature>_pe<cycle>.cfg`
    Temperature,

    /// `temp<temperature>_pe<cycle>_<label>.cfg`, with nested label segments joined by `_`.
    /// Without a label this is the same as `Temperature`.
    TemperatureLabel,
}

impl DeviceConfigName {
    pub fn file_name(self, params: &SweepParams) -> String {
        match self {
            DeviceConfigName::Alibaba => format!("alibaba_pe{}.cfg", params.cycle),
            DeviceConfigName::Temperature => {
                format!("temp{}_pe{}.cfg", params.temperature, params.cycle)
            }
            DeviceConfigName::TemperatureLabel => match &params.label {
                Some(label) => format!(
                    "temp{}_pe{}_{}.cfg",
                    params.temperature,
                    params.cycle,
                    label.replace('/', "_")
                ),
                None => DeviceConfigName::Temperature.file_name(params),
            },
        }
    }
}

/// What to do when the simulator exits unsuccessfully.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum FailurePolicy {
    /// Log it and move on to the next trace.
    Continue,
    /// Stop the sweep with an error.
    Abort,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Continue
    }
}

/// Where things live and how names are formed.
#[derive(Clone, Debug, Serialize)]
pub struct SweepConfig {
    pub simulator: PathBuf,
    pub log_dir: PathBuf,
    pub trace_config_dir: PathBuf,
    pub device_config_dir: PathBuf,

    pub layout: LogLayout,
    pub trace_config: TraceConfigName,
    pub device_config: DeviceConfigName,

    pub policy: FailurePolicy,

    /// Don't touch the filesystem; the launcher is expected not to launch anything either.
    pub dry_run: bool,

    /// Write a `.params` file into the output directory before each simulation.
    pub record: bool,
}

impl SweepConfig {
    /// Build the simulator invocation for one trace.
    pub fn invocation(&self, params: &SweepParams, trace: &str) -> Invocation {
        Invocation {
            simulator: self.simulator.clone(),
            trace_config: self
                .trace_config_dir
                .join(self.trace_config.file_name(params, trace)),
            device_config: self
                .device_config_dir
                .join(self.device_config.file_name(params)),
            output_dir: self.layout.output_dir(&self.log_dir, params, trace),
        }
    }
}

/// One run of the simulator: `simulator trace_config device_config output_dir`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub simulator: PathBuf,
    pub trace_config: PathBuf,
    pub device_config: PathBuf,
    pub output_dir: PathBuf,
}

impl Invocation {
    /// The command to run. stdout and stderr are inherited.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.simulator);
        cmd.arg(&self.trace_config)
            .arg(&self.device_config)
            .arg(&self.output_dir);
        cmd
    }
}

/// How a simulation ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimStatus {
    /// `None` if the simulator was killed by a signal.
    pub code: Option<i32>,
}

impl SimStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Something that can run a simulation and wait for it to finish.
pub trait Launcher {
    /// Returns `Err` only if the simulator could not be run at all (e.g. it doesn't exist).
    fn launch(&mut self, invocation: &Invocation) -> Result<SimStatus, failure::Error>;
}

/// Runs the simulator as a child process and blocks until it exits.
#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, invocation: &Invocation) -> Result<SimStatus, failure::Error> {
        let mut cmd = invocation.command();

        debug!("{:?}", cmd);

        let status = cmd.status().with_context(|_| {
            format!("launching simulator {}", invocation.simulator.display())
        })?;

        Ok(SimStatus {
            code: status.code(),
        })
    }
}

/// Prints what would be run and pretends it succeeded.
#[derive(Debug, Default)]
pub struct DryRunLauncher {
    pub launched: usize,
}

impl Launcher for DryRunLauncher {
    fn launch(&mut self, invocation: &Invocation) -> Result<SimStatus, failure::Error> {
        println!("{:?}", invocation.command());
        self.launched += 1;
        Ok(SimStatus { code: Some(0) })
    }
}

/// The result of simulating one trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceOutcome {
    pub trace: String,
    pub status: SimStatus,
}

/// Create `dir` (and its parents) unless it is already a directory. Returns true if it was
/// created.
pub fn ensure_dir(dir: &Path) -> Result<bool, failure::Error> {
    if dir.is_dir() {
        return Ok(false);
    }

    debug!("Creating output directory {}", dir.display());
    std::fs::create_dir_all(dir)
        .with_context(|_| format!("creating output directory {}", dir.display()))?;

    Ok(true)
}

/// Run the simulator once per trace, in order.
///
/// Launch and directory errors stop the sweep immediately. What happens when the simulator
/// itself fails is up to `config.policy`.
pub fn run_sweep<L: Launcher>(
    params: &SweepParams,
    config: &SweepConfig,
    launcher: &mut L,
) -> Result<Vec<TraceOutcome>, failure::Error> {
    let mut outcomes = Vec::with_capacity(params.traces.len());

    for trace in params.traces.iter() {
        let invocation = config.invocation(params, trace);

        output::print_banner(trace, &params.temperature, &params.cycle);

        if !config.dry_run {
            ensure_dir(&invocation.output_dir)?;

            if config.record {
                let path = output::record_params(trace, params, config, &invocation)?;
                debug!("Recorded parameters in {}", path.display());
            }
        }

        info!(
            "Simulating {} ({} / {}) -> {}",
            trace,
            invocation.trace_config.display(),
            invocation.device_config.display(),
            invocation.output_dir.display()
        );

        let status = launcher.launch(&invocation)?;

        output::print_banner_end();

        if !status.success() {
            warn!(
                "Simulator exited with {:?} on trace {}",
                status.code, trace
            );

            if config.policy == FailurePolicy::Abort {
                return Err(SweepError::SimulatorFailed {
                    trace: trace.clone(),
                    code: status.code,
                }
                .into());
            }
        }

        outcomes.push(TraceOutcome {
            trace: trace.clone(),
            status,
        });
    }

    Ok(outcomes)
}

/// Run a sweep with the launcher implied by `config.dry_run` and log a summary.
pub fn run(params: &SweepParams, config: &SweepConfig) -> Result<Vec<TraceOutcome>, failure::Error> {
    let outcomes = if config.dry_run {
        run_sweep(params, config, &mut DryRunLauncher::default())?
    } else {
        run_sweep(params, config, &mut ProcessLauncher)?
    };

    let failed = outcomes.iter().filter(|o| !o.status.success()).count();
    info!(
        "PE {}: {} traces simulated, {} failed",
        params.cycle,
        outcomes.len(),
        failed
    );

    Ok(outcomes)
}
