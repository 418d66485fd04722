use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use std::path::PathBuf;
use trackname::naming::{FeaturingMode, Layout, ParsedName, ReleaseBound};

#[derive(ClapParser)]
#[command(name = "trackname", version, about = "Music library filename parser and normalizer")]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Names are written "Title - Artists" instead of "Artists - Title"
    #[arg(long, global = true)]
    title_first: bool,

    /// Only accept "(ft. ...)" featuring clauses and reject unclosed ones
    #[arg(long, global = true)]
    strict: bool,

    /// Search the release tag's "]" the way older normalized libraries did
    #[arg(long, global = true)]
    legacy_release_bound: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse filename stems (no extension) and print their parts
    Parse {
        /// Names to parse (@file reads one name per line)
        #[arg(required = true)]
        names: Vec<String>,

        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Split an artist list into individual names
    Split {
        /// Artist list, e.g. "a, b & c"
        text: String,
    },

    /// Show the canonical name for each file (nothing is renamed)
    Normalize {
        /// Audio files (@file reads one path per line)
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Show where each file would be filed under the library root
    Destination {
        /// Library root directory
        #[arg(long)]
        root: PathBuf,

        /// Audio files (@file reads one path per line)
        #[arg(required = true)]
        files: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing); CLI flags win
    let mut config = trackname::config::AppConfig::load();
    if cli.title_first {
        config.layout = Layout::TitleFirst;
    }
    config.strict_featuring |= cli.strict;
    config.legacy_release_bound |= cli.legacy_release_bound;

    let parser = config.parser().context("Invalid alias configuration")?;
    let options = parser.options();
    log::info!(
        "Layout: {:?}, featuring: {}, release bound: {}",
        options.layout,
        match options.featuring {
            FeaturingMode::Tolerant => "tolerant",
            FeaturingMode::Strict => "strict",
        },
        match options.release_bound {
            ReleaseBound::Independent => "independent",
            ReleaseBound::Legacy => "legacy",
        }
    );

    match cli.command {
        Commands::Parse { names, json } => {
            let names = expand_list_args(names)?;
            let mut failed = 0usize;

            for name in &names {
                match parser.parse(name) {
                    Ok(parsed) if json => {
                        println!("{}", serde_json::to_string(&parsed)?);
                    }
                    Ok(parsed) => print_parsed(&parsed),
                    Err(e) => {
                        log::warn!("{}", e);
                        failed += 1;
                    }
                }
            }

            if failed > 0 {
                anyhow::bail!("{} of {} names could not be parsed", failed, names.len());
            }
        }

        Commands::Split { text } => {
            for artist in parser.splitter().split(&text) {
                println!("{}", artist);
            }
        }

        Commands::Normalize { files } => {
            let files = audio_paths(expand_list_args(files)?);
            let results = trackname::planner::plan_batch(&files, &parser);

            let mut renamed = 0usize;
            let mut unchanged = 0usize;
            let mut errors = 0usize;
            for (path, result) in &results {
                match result {
                    Ok(Some(rename)) => {
                        renamed += 1;
                        println!("{} -> {}", path.display(), rename.to.display());
                    }
                    Ok(None) => unchanged += 1,
                    // Already logged by plan_batch
                    Err(_) => errors += 1,
                }
            }

            println!(
                "Normalize complete: {} to rename, {} already canonical, {} errors",
                renamed, unchanged, errors
            );
        }

        Commands::Destination { root, files } => {
            let files = audio_paths(expand_list_args(files)?);
            let mut errors = 0usize;

            for file in &files {
                match trackname::planner::destination(file, &root, &parser) {
                    Ok(dest) => println!("{} -> {}", file.display(), dest.display()),
                    Err(e) => {
                        log::warn!("Skipping {}: {}", file.display(), e);
                        errors += 1;
                    }
                }
            }

            if errors > 0 {
                println!("{} files could not be placed", errors);
            }
        }
    }

    Ok(())
}

/// Replace every `@list.txt` argument with the non-blank lines of that file.
fn expand_list_args(args: Vec<String>) -> Result<Vec<String>> {
    let mut expanded = Vec::with_capacity(args.len());
    for arg in args {
        match arg.strip_prefix('@') {
            Some(list) => {
                let list = list.trim().trim_matches('"');
                let contents = std::fs::read_to_string(list)
                    .with_context(|| format!("Failed to read list file {}", list))?;
                expanded.extend(
                    contents
                        .lines()
                        .map(|line| line.trim().trim_matches('"'))
                        .filter(|line| !line.is_empty())
                        .map(str::to_string),
                );
            }
            None => expanded.push(arg),
        }
    }
    Ok(expanded)
}

/// Keep audio files, logging whatever else was passed.
fn audio_paths(args: Vec<String>) -> Vec<PathBuf> {
    args.into_iter()
        .map(PathBuf::from)
        .filter(|p| {
            let keep = trackname::planner::is_audio_file(p);
            if !keep {
                log::info!("Not an audio file, skipping: {}", p.display());
            }
            keep
        })
        .collect()
}

/// Print one parsed name with its canonical form on top.
fn print_parsed(parsed: &ParsedName) {
    println!("{}", parsed);
    println!("  artists:   {}", parsed.artists.join("; "));
    println!("  title:     {}", parsed.title);
    if !parsed.featuring.is_empty() {
        println!("  featuring: {}", parsed.featuring.join("; "));
    }
    if !parsed.remix_tag.is_empty() {
        println!("  remix:     {}", parsed.remix_tag);
    }
    if !parsed.release_tag.is_empty() {
        println!("  release:   {}", parsed.release_tag);
    }
}
