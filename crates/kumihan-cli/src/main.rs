use anyhow::{Context, Result, bail};
use kumihan_config::Config;
use kumihan_engine::parsing::snapshot;
use kumihan_engine::{Parser, Strategy};
use std::{env, path::PathBuf, process};

struct Args {
    input: PathBuf,
    strategy: Option<Strategy>,
    config: Option<PathBuf>,
}

fn usage(program: &str) -> String {
    format!("Usage: {program} [--strategy sequential|parallel|streaming] [--config <path>] <file>")
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut input = None;
    let mut strategy = None;
    let mut config = None;
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--strategy" => {
                let value = iter.next().context("--strategy needs a value")?;
                strategy = Some(value.parse::<Strategy>()?);
            }
            "--config" => {
                let value = iter.next().context("--config needs a value")?;
                config = Some(PathBuf::from(value));
            }
            other if other.starts_with("--") => bail!("unknown option {other}"),
            other => {
                if input.replace(PathBuf::from(other)).is_some() {
                    bail!("only one input file may be given");
                }
            }
        }
    }
    Ok(Args {
        input: input.context("no input file given")?,
        strategy,
        config,
    })
}

/// Decodes `bytes` as UTF-8, falling back to Latin-1 for legacy files.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("input is not valid UTF-8 ({e}), decoding as Latin-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map_or("kumihan", String::as_str);
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", usage(program));
            process::exit(2);
        }
    };

    let config_path = args.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from_path(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?
    {
        Some(config) => {
            log::info!("Loaded config from {}", config_path.display());
            config
        }
        None => {
            log::debug!("No config at {}, using defaults", config_path.display());
            Config::default()
        }
    };
    let registry = config.registry().context("building keyword registry")?;

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let text = decode(bytes);

    let parser = Parser::new(&registry, config.parser.clone());
    let strategy = args
        .strategy
        .unwrap_or_else(|| parser.select_strategy(&text));
    log::info!(
        "Parsing {} ({} bytes, {strategy})",
        args.input.display(),
        text.len()
    );
    let out = parser.parse_with(&text, strategy);

    println!("{}", snapshot::dump(&out.nodes, &[]));
    for error in &out.errors {
        eprintln!("{}: {error}", args.input.display());
    }
    if out.has_errors() {
        process::exit(1);
    }
    Ok(())
}
