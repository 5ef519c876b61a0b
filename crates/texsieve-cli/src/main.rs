use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use texsieve_log::{Diagnostic, FnSink, LogParser, ParserConfig};

#[derive(Parser)]
#[command(name = "texsieve")]
#[command(about = "Extract errors and warnings from TeX compiler output", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify saved or piped compiler output
    Parse {
        /// Path to the output or .log file, `-` for stdin
        #[arg(value_name = "FILE", default_value = "-")]
        path: PathBuf,
        /// JSON configuration file
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,
        /// Override the wrap width
        #[arg(long)]
        wrap_width: Option<usize>,
        /// Drop a message still being collected when the input ends
        #[arg(long)]
        no_flush: bool,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the effective warning prefixes
    Prefixes {
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn load_config(path: Option<&Path>, wrap_width: Option<usize>) -> anyhow::Result<ParserConfig> {
    let mut config = match path {
        Some(path) => ParserConfig::load(path)?,
        None => ParserConfig::default(),
    };
    if let Some(width) = wrap_width {
        config = config.with_wrap_width(width)?;
    }
    Ok(config)
}

fn print_text(out: &mut impl Write, diagnostic: &Diagnostic) -> io::Result<()> {
    match &diagnostic.location {
        Some(location) => writeln!(
            out,
            "{}:{}: {}: {}",
            location.file.as_deref().unwrap_or("<unknown>"),
            location.line,
            diagnostic.kind,
            diagnostic.message
        ),
        None => writeln!(out, "{}: {}", diagnostic.kind, diagnostic.message),
    }
}

fn parse(path: &Path, config: ParserConfig, no_flush: bool, format: Format) -> anyhow::Result<()> {
    let reader: Box<dyn BufRead> = if path.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = fs::File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        Box::new(io::BufReader::new(file))
    };

    let config = Arc::new(config);
    match format {
        Format::Text => {
            let stdout = io::stdout();
            let mut parser = LogParser::with_sink(
                config,
                FnSink(|d: Diagnostic| {
                    if let Err(e) = print_text(&mut stdout.lock(), &d) {
                        log::error!("Failed to write diagnostic: {}", e);
                    }
                }),
            );
            for line in reader.split(b'\n') {
                let line = line.context("Failed to read input")?;
                parser.push_line(&String::from_utf8_lossy(&line));
            }
            if no_flush {
                parser.into_sink();
            } else {
                parser.finish();
            }
        }
        Format::Json => {
            let mut parser = LogParser::with_config(config);
            for line in reader.split(b'\n') {
                let line = line.context("Failed to read input")?;
                parser.push_line(&String::from_utf8_lossy(&line));
            }
            let diagnostics = if no_flush { parser.into_sink() } else { parser.finish() };
            println!("{}", serde_json::to_string_pretty(&diagnostics)?);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Parse {
            path,
            config,
            wrap_width,
            no_flush,
            format,
        } => {
            let config = load_config(config.as_deref(), *wrap_width)?;
            parse(path, config, *no_flush, *format)?;
        }
        Commands::Prefixes { config } => {
            let config = load_config(config.as_deref(), None)?;
            for prefix in config.warning_prefixes() {
                println!("{}", prefix);
            }
        }
    }
    Ok(())
}
