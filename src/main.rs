//! This program runs the SimpleSSD standalone simulator over sets of traces. Which sweep is run is
//! chosen by passing different subcommands. Each sweep takes its own arguments.

fn run() -> Result<(), failure::Error> {
    let matches = clap::App::new("ssd-runner")
        .about(
            "This program runs the SimpleSSD standalone simulator over sets of traces. Which \
             sweep is run is chosen by passing different subcommands.",
        )
        .subcommand(ssd_runner::exp_selected::cli_options())
        .subcommand(ssd_runner::exp_group::cli_options())
        .subcommand(ssd_runner::exp_temp::cli_options())
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)
        .setting(clap::AppSettings::DisableVersion)
        .get_matches();

    match matches.subcommand() {
        ("selected", Some(sub_m)) => ssd_runner::exp_selected::run(sub_m),
        ("group", Some(sub_m)) => ssd_runner::exp_group::run(sub_m),
        ("temp", Some(sub_m)) => ssd_runner::exp_temp::run(sub_m),

        _ => {
            unreachable!();
        }
    }
}

fn main() {
    use console::style;

    env_logger::init();

    // Always get backtraces. The performance penalty doesn't matter next to a simulation.
    std::env::set_var("RUST_BACKTRACE", "1");

    if let Err(err) = run() {
        const MESSAGE: &str = r#"== ERROR ==================================================================================
`ssd-runner` encountered an error. The simulator output above may offer clues. Setting
RUST_LOG=debug prints every directory created and every command run.
"#;

        println!("{}", style(MESSAGE).red().bold());

        match err.downcast_ref::<ssd_runner::sweep::SweepError>() {
            Some(ssd_runner::sweep::SweepError::SimulatorFailed { .. }) => {
                println!("The simulator failed and --abort_on_failure was given.")
            }
            Some(_) => println!("The arguments could not be turned into a valid sweep."),
            None => {}
        }

        println!(
            "`ssd-runner` encountered the following error:\n{}\n{}",
            err.as_fail(),
            err.backtrace(),
        );

        for cause in err.iter_causes() {
            println!("caused by: {}", cause);
        }

        std::process::exit(101);
    }
}
