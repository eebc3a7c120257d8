//! Shape validator CLI.

use shape_cache::{BuildError, Registry};
use shapec::{parse_check_args, run_check, warm};

fn main() {
    shapec::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "shapes" => {
            for name in shape_fhir::shape_names() {
                println!("{name}");
            }
        }
        "warm" => {
            let mut seal = false;
            for arg in args.iter().skip(2) {
                if arg == "--seal" {
                    seal = true;
                } else {
                    eprintln!("error: unknown option `{arg}`");
                    eprintln!("Usage: shapec warm [--seal]");
                    std::process::exit(1);
                }
            }

            match warm(Registry::global(), seal) {
                Ok(stats) => {
                    println!("{stats}");
                    if seal {
                        println!("registry sealed");
                    }
                }
                Err(err) => {
                    report_build_error(&err);
                    std::process::exit(1);
                }
            }
        }
        "check" => {
            let config = match parse_check_args(&args[2..]) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("error: {err}");
                    eprintln!("Usage: shapec check <Shape> <file.json>... [options]");
                    eprintln!();
                    print_check_options();
                    std::process::exit(1);
                }
            };

            let summary = match run_check(Registry::global(), &config) {
                Ok(summary) => summary,
                Err(shape_fhir::CatalogError::Build(err)) => {
                    report_build_error(&err);
                    std::process::exit(1);
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    eprintln!("Run `shapec shapes` to list known shapes.");
                    std::process::exit(1);
                }
            };

            if config.json {
                match summary.to_json() {
                    Ok(json) => println!("{json}"),
                    Err(err) => {
                        eprintln!("error: cannot serialize report: {err}");
                        std::process::exit(1);
                    }
                }
            } else {
                print!("{}", summary.render(config.quiet));
            }

            if !summary.is_success() {
                std::process::exit(1);
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("shapec {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Print a construction failure with the chain of shapes that led to it.
fn report_build_error(err: &BuildError) {
    eprintln!("error: {err}");
    let trace = err.trace();
    if trace.len() > 1 {
        eprintln!("  construction path: {}", trace.join(" -> "));
        eprintln!("  cause: {}", err.root_cause());
    }
}

fn print_usage() {
    println!("Shape validator");
    println!();
    println!("Usage: shapec <command> [options]");
    println!();
    println!("Commands:");
    println!("  shapes                        List known shape names");
    println!("  warm [--seal]                 Construct every shape and print cache statistics");
    println!("  check <Shape> <file.json>...  Validate JSON documents against a shape");
    println!("  help                          Show this help message");
    println!("  version                       Show version information");
    println!();
    print_check_options();
    println!();
    println!("Logging:");
    println!("  SHAPEC_LOG=<filter>  Enable tracing (falls back to RUST_LOG), e.g. shape_cache=debug");
    println!();
    println!("Examples:");
    println!("  shapec check Patient patient.json");
    println!("  shapec check 'Bundle<Observation>' results/*.json --quiet");
    println!("  shapec warm --seal");
}

fn print_check_options() {
    println!("Check options:");
    println!("  --max-depth=<n>  Deepest nesting checked (default: 1024)");
    println!("  --no-parallel    Check files sequentially");
    println!("  --quiet, -q      Only print failures and the summary");
    println!("  --json           Print the report as JSON");
}
