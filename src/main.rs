/// Tailspin - Scheme evaluator CLI
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;

use tailspin::engine::{eval_source, top_level_environment, Value};
use tailspin::repl;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    eprintln!("Tailspin v{}", VERSION);
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    tailspin [OPTIONS] <INPUT>");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -h, --help       Print this help message");
    eprintln!("    -v, --version    Print version information");
    eprintln!("    --repl           Start interactive REPL");
    eprintln!();
    eprintln!("ARGUMENTS:");
    eprintln!("    <INPUT>          Input Scheme file (use '-' for stdin)");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    tailspin program.scm");
    eprintln!("    tailspin --repl");
    eprintln!("    cat program.scm | tailspin -");
}

fn print_version() {
    println!("Tailspin {}", VERSION);
}

struct Options {
    input: Option<String>,
    repl_mode: bool,
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();

    let mut input = None;
    let mut repl_mode = false;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                process::exit(0);
            }
            "--repl" => {
                repl_mode = true;
            }
            arg if arg.starts_with('-') && arg != "-" => {
                return Err(format!("Unknown option: {}", arg));
            }
            arg => {
                if input.is_some() {
                    return Err("Multiple input files specified".to_string());
                }
                input = Some(arg.to_string());
            }
        }
        i += 1;
    }

    Ok(Options { input, repl_mode })
}

fn read_input(input: &str) -> Result<String, String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else {
        let path = Path::new(input);
        if !path.exists() {
            return Err(format!("Input file not found: {}", input));
        }
        fs::read_to_string(path).map_err(|e| format!("Failed to read file '{}': {}", input, e))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let options = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if options.repl_mode {
        repl::run();
        return;
    }

    let Some(input) = options.input else {
        eprintln!("Error: Missing input file");
        eprintln!();
        print_usage();
        process::exit(1);
    };

    let source = match read_input(&input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let env = top_level_environment();
    match eval_source(&env, &source) {
        Ok(Value::Unspecified) => {}
        Ok(value) => println!("{}", value),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
