//! tsqlfmt CLI - a configurable T-SQL formatter

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tsqlfmt::analyzer::{self, AnalyzeOptions};
use tsqlfmt::cli::{self, Cli};
use tsqlfmt::config::FormatConfig;
use tsqlfmt::parser::lexer::tokenize;
use tsqlfmt::parser::trivia::attach_trivia;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.style {
        Some(path) => match tsqlfmt::config::load_style_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                return ExitCode::from(2);
            }
        },
        None => FormatConfig::default(),
    };
    cli.apply_overrides(&mut config);

    let ok = match &cli.input {
        Some(path) if path != Path::new("-") && path.is_dir() => {
            run_directory(&cli, &config, path)
        }
        Some(path) if path != Path::new("-") => run_file(&cli, &config, path),
        _ => run_stdin(&cli, &config),
    };
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn run_stdin(cli: &Cli, config: &FormatConfig) -> bool {
    let mut bytes = Vec::new();
    if let Err(e) = std::io::stdin().read_to_end(&mut bytes) {
        eprintln!("error: failed to read stdin: {e}");
        return false;
    }
    let source = match cli::decode_source(&bytes) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: {e}");
            return false;
        }
    };
    process_source(cli, config, &source, None)
}

fn run_file(cli: &Cli, config: &FormatConfig, path: &Path) -> bool {
    let source = match cli::read_source(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            return false;
        }
    };
    process_source(cli, config, &source, Some(path))
}

fn run_directory(cli: &Cli, config: &FormatConfig, path: &Path) -> bool {
    let files = cli::discover_files(&[path.to_path_buf()]);
    if files.is_empty() {
        eprintln!("{}: no .sql files found", path.display());
        return false;
    }
    let mut ok = true;
    for file in files {
        if !run_file(cli, config, &file) {
            ok = false;
        }
    }
    ok
}

fn process_source(cli: &Cli, config: &FormatConfig, source: &str, path: Option<&Path>) -> bool {
    if cli.tokens {
        let tokens = tokenize(source);
        return match serde_json::to_string_pretty(&tokens) {
            Ok(json) => {
                println!("{json}");
                true
            }
            Err(e) => {
                eprintln!("error: {e}");
                false
            }
        };
    }

    let script = tsqlfmt::parser::parse_script(&attach_trivia(tokenize(source)));

    if cli.ast {
        return match serde_json::to_string_pretty(&script) {
            Ok(json) => {
                println!("{json}");
                true
            }
            Err(e) => {
                eprintln!("error: {e}");
                false
            }
        };
    }

    if cli.analyze {
        let options = AnalyzeOptions {
            warn_missing_schema: cli.warn_missing_schema,
            warn_missing_alias: cli.warn_missing_alias,
        };
        for warning in analyzer::analyze(&script, &options) {
            match (warning.line, warning.col) {
                (Some(line), Some(col)) => eprintln!("{line}:{col}: {}", warning.message),
                _ => eprintln!("{}", warning.message),
            }
        }
    }

    let formatted = tsqlfmt::formatter::format_script(&script, config);
    if cli.write {
        if let Some(path) = path {
            if formatted != source {
                if let Err(e) = std::fs::write(path, &formatted) {
                    eprintln!("{}: {}", path.display(), e);
                    return false;
                }
            }
            return true;
        }
    }
    print!("{formatted}");
    true
}
