// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use crate::config::consts::*;
use crate::config::options::{FetchOptions, RunOptions};
use crate::core::net::HttpSource;
use crate::pipeline::{self, Catalog};
use crate::progress::ConsoleProgress;
use crate::retry::RetryPolicy;
use crate::specs::ratings::{RatingsScraper, parse_ttid};
use crate::titles::Category;

#[derive(Parser, Debug)]
#[command(name = "gender_rank", version, about = "Gender-weighted genre ranking from IMDb dumps")]
pub struct Cli {
    /// Directory holding title.basics.tsv and title.ratings.tsv
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Directory for vote tables and progress logs
    #[arg(long, global = true, default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Genre tag the report keeps (exact match)
    #[arg(long, global = true, default_value = DEFAULT_GENRE)]
    pub genre: String,

    /// Minimum published votes for a title to be scraped
    #[arg(long, global = true, default_value_t = MIN_VOTES)]
    pub min_votes: u64,

    /// Fixed pause between fetch attempts
    #[arg(long, global = true, default_value_t = RETRY_DELAY_SECS)]
    pub retry_delay_secs: u64,

    /// Give up on a title after this many attempts (default: never)
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Per-request timeout
    #[arg(long, global = true, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scrape, weigh and print the report (default)
    Run,
    /// Scrape gender votes, resuming from the progress logs
    Scrape {
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
    },
    /// Recompute weighted votes from the scraped tables
    Weigh,
    /// Print the ranking from the weighted tables
    Report,
    /// Fetch one title's gender votes by URL or ttid
    Fetch { target: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryArg {
    Movie,
    Show,
}

impl From<CategoryArg> for Category {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::Movie => Category::Movie,
            CategoryArg::Show => Category::Show,
        }
    }
}

impl Cli {
    pub fn options(&self) -> RunOptions {
        let retry = RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: Duration::from_secs(self.retry_delay_secs),
        };
        RunOptions {
            data_dir: self.data_dir.clone(),
            out_dir: self.out_dir.clone(),
            genre: self.genre.clone(),
            min_votes: self.min_votes,
            fetch: FetchOptions { retry, timeout: Duration::from_secs(self.timeout_secs) },
        }
    }
}

fn scraper(opts: &RunOptions) -> Result<RatingsScraper<HttpSource>> {
    let source = HttpSource::new(opts.fetch.timeout).wrap_err("building HTTP client")?;
    Ok(RatingsScraper::new(source, opts.fetch.retry))
}

fn catalog(opts: &RunOptions) -> Result<Catalog> {
    pipeline::load_catalog(opts).wrap_err_with(|| format!("loading dumps from {}", opts.data_dir.display()))
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::log::init(&cli.log).map_err(|e| color_eyre::eyre::eyre!("logging setup failed: {e}"))?;
    dispatch(&cli)
}

pub fn dispatch(cli: &Cli) -> Result<()> {
    let opts = cli.options();

    match cli.command.clone().unwrap_or(Command::Run) {
        Command::Run => {
            let catalog = catalog(&opts)?;
            let report = pipeline::run_all(&opts, &catalog, &scraper(&opts)?)?;
            print!("{report}");
        }
        Command::Scrape { category } => {
            let catalog = catalog(&opts)?;
            let scraper = scraper(&opts)?;
            let picked: Vec<Category> = match category {
                Some(c) => vec![c.into()],
                None => Category::ALL.to_vec(),
            };
            for c in picked {
                let mut progress = ConsoleProgress::new(format!("scrape {c}"));
                let s = pipeline::scrape_category(&opts, &catalog, c, &scraper, Some(&mut progress))?;
                info!("{c}: {} skipped, {} processed, {} row(s) written", s.skipped, s.processed, s.rows_written);
            }
        }
        Command::Weigh => {
            let catalog = catalog(&opts)?;
            for c in Category::ALL {
                pipeline::weigh_category(&opts, &catalog, c)?;
            }
        }
        Command::Report => {
            let catalog = catalog(&opts)?;
            print!("{}", pipeline::report(&opts, &catalog.index)?);
        }
        Command::Fetch { target } => {
            let id = parse_ttid(&target)?;
            match scraper(&opts)?.fetch(&id) {
                Some(v) => println!("{}", v.to_row(&id).join("\t")),
                None => println!("{id}\t\t"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_consts() {
        let cli = Cli::try_parse_from(["gender_rank"]).unwrap();
        assert_eq!(cli.command, None);
        let opts = cli.options();
        assert_eq!(opts, RunOptions::default());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gender_rank", "scrape", "--category", "show", "--max-attempts", "3", "--retry-delay-secs", "0",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Command::Scrape { category: Some(CategoryArg::Show) }));
        let opts = cli.options();
        assert_eq!(opts.fetch.retry, RetryPolicy::bounded(3, Duration::ZERO));
    }

    #[test]
    fn fetch_takes_a_target() {
        let cli = Cli::try_parse_from(["gender_rank", "fetch", "https://www.imdb.com/title/tt0111161/"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Fetch { ref target }) if target.contains("tt0111161")));
    }
}
