/// Entry point for the solar comparison service.
///
/// Usage:
///   solcomp_service [CONFIG_PATH] [--json REPORT_PATH] [--country NAME]...
///
/// Reads `config.toml` (or the given path), runs the comparison over all
/// countries (or the `--country` selection), prints the console summary and
/// optionally writes the full JSON report for the dashboard layer.

use std::path::PathBuf;
use std::process::ExitCode;

use solcomp_service::comparator;
use solcomp_service::config;
use solcomp_service::countries::Country;
use solcomp_service::logging::{self, LogLevel, Stage};
use solcomp_service::report;

struct CliArgs {
    config_path: PathBuf,
    json_path: Option<PathBuf>,
    selected: Vec<Country>,
}

fn parse_args() -> Result<CliArgs, String> {
    let mut config_path = PathBuf::from("./config.toml");
    let mut json_path = None;
    let mut selected = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => {
                let path = args.next().ok_or("--json requires a path argument")?;
                json_path = Some(PathBuf::from(path));
            }
            "--country" => {
                let name = args.next().ok_or("--country requires a name argument")?;
                let country = Country::parse(&name)
                    .ok_or_else(|| format!("unknown country: {}", name))?;
                if !selected.contains(&country) {
                    selected.push(country);
                }
            }
            other if !other.starts_with('-') => {
                config_path = PathBuf::from(other);
            }
            other => return Err(format!("unknown flag: {}", other)),
        }
    }

    if selected.is_empty() {
        selected = Country::ALL.to_vec();
    }

    Ok(CliArgs {
        config_path,
        json_path,
        selected,
    })
}

fn main() -> ExitCode {
    logging::init_logger(LogLevel::Info, None, false);

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return ExitCode::FAILURE;
        }
    };

    let config = match config::load_config(&args.config_path) {
        Ok(config) => config,
        Err(e) => {
            logging::error(Stage::System, None, &format!("bad configuration: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let comparison = match comparator::run_comparison(&config, &args.selected) {
        Ok(comparison) => comparison,
        Err(e) => {
            // Only malformed input files reach here; everything recoverable
            // is inside the report.
            logging::error(Stage::System, None, &e.to_string());
            return ExitCode::FAILURE;
        }
    };

    report::print_summary(&comparison);

    if let Some(path) = &args.json_path {
        match comparison.to_json() {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    logging::error(
                        Stage::System,
                        None,
                        &format!("failed to write report to {}: {}", path.display(), e),
                    );
                    return ExitCode::FAILURE;
                }
                println!("\n📄 Full report saved to: {}", path.display());
            }
            Err(e) => {
                logging::error(Stage::System, None, &format!("failed to serialize report: {}", e));
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
