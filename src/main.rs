use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use tableau::constants::common::{DEFAULT_LOG_FILTER, SCENE_EXT, TABLEAU, VERBOSE_LOG_FILTER};
use tableau::util::file::{is_scene_file, read_source};
use tableau::{load, syntax_analyze, tokenize};

#[derive(Parser, Debug)]
#[command(name = TABLEAU, version, about = "Interpret a tableau scene description")]
struct Cli {
    /// Scene file to read
    file: PathBuf,

    /// Print the token stream and stop
    #[arg(long)]
    tokens: bool,

    /// Print the parsed declarations and stop
    #[arg(long)]
    ast: bool,

    /// Log every interpreted declaration
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    });

    fmt().with_env_filter(filter).with_target(false).init();
}

fn run(cli: &Cli) -> Result<(), String> {
    if !is_scene_file(&cli.file) {
        warn!("{} does not end with {SCENE_EXT}", cli.file.display());
    }
    let code = read_source(&cli.file).map_err(|e| e.to_string())?;

    if cli.tokens {
        for token in tokenize(&code).map_err(|e| e.to_string())? {
            println!("{token}");
        }
        return Ok(());
    }
    if cli.ast {
        let file = syntax_analyze(&code).map_err(|e| e.to_string())?;
        print!("{file}");
        return Ok(());
    }

    let scene = load(&code).map_err(|e| e.to_string())?;
    info!("loaded {}", cli.file.display());
    print!("{scene}");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{e}");
        process::exit(1);
    }
}
