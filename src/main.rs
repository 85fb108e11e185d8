use clap::{Arg, ArgAction, Command};
use nbsimu::gen::Config;
use nbsimu::sim::SimBuilder;
use nbsimu::utils;
use std::error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn error::Error>> {
    let matches = Command::new("nbsimu")
        .about("neighbor table simulator for beaconing nodes")
        .version("0.1.0")
        .subcommand_required(true)
        .arg_required_else_help(true)
        // subcommands
        .subcommand(
            Command::new("gen")
                .about("generate a beacon scenario")
                .arg(
                    Arg::new("input_file_path")
                        .short('i')
                        .long("input")
                        .action(ArgAction::Set)
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("output_file_path")
                        .short('o')
                        .long("output")
                        .action(ArgAction::Set)
                        .num_args(1)
                        .required(false),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("run simulation")
                .arg(
                    Arg::new("input_file_path")
                        .short('i')
                        .long("input")
                        .action(ArgAction::Set)
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("output_file_path")
                        .short('o')
                        .long("output")
                        .action(ArgAction::Set)
                        .num_args(1)
                        .required(false),
                )
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .action(ArgAction::SetTrue)
                        .required(false),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("gen", gen_matches)) => {
            init_tracing(false);
            let input = gen_matches
                .get_one::<String>("input_file_path")
                .ok_or("missing input")?;
            let output = match gen_matches.get_one::<String>("output_file_path") {
                Some(output) => output.clone(),
                None => format!("{input}.out.json"),
            };

            let mut config = Config::new(PathBuf::from(input), PathBuf::from(output))?;

            config.build()?;
            config.generate()?;
        }
        Some(("run", run_matches)) => {
            init_tracing(run_matches.get_flag("verbose"));
            let input = run_matches
                .get_one::<String>("input_file_path")
                .ok_or("missing input")?;
            let mut sim = SimBuilder::new(PathBuf::from(input)).build()?;

            sim.run()?;

            let summary = sim.summary();
            for (key, value) in summary.iter() {
                println!("{key}: {value}");
            }
            if let Some(output) = run_matches.get_one::<String>("output_file_path") {
                utils::write_json(output, &summary)?;
            }
        }
        _ => unreachable!(),
    };
    Ok(())
}

// RUST_LOG wins over --verbose
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_run() {
        let testfile_dir = "tests/run/";
        // every scenario under tests/run must run to completion
        for entry in fs::read_dir(testfile_dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_file() {
                let mut sim = SimBuilder::new(path.clone()).build().unwrap();
                sim.run().unwrap();
                let summary = sim.summary();
                assert_eq!(summary["density_underflows"], 0.0, "{path:?}");
                assert_eq!(
                    summary["final_neighbors"], summary["final_density_total"],
                    "{path:?}"
                );
            }
        }
    }
}
