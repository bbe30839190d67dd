// src/pipeline.rs
// Stage functions the CLI strings together:
//   load_catalog → scrape_category → weigh_category → report

use tracing::info;

use crate::batch::{BatchJob, BatchSummary};
use crate::config::options::RunOptions;
use crate::core::net::PageSource;
use crate::error::Result;
use crate::progress::{ConsoleProgress, Progress};
use crate::rank::{merge_for_report, rank_category, render_report};
use crate::specs::ratings::RatingsScraper;
use crate::titles::{self, Category, TitleIndex, TitleRecord, Ttid};
use crate::votes::{self, GENDER_HEADER, WEIGHTED_HEADER};

/// Everything read from the dumps, loaded once per run.
pub struct Catalog {
    pub titles: Vec<TitleRecord>,
    pub index: TitleIndex,
}

pub fn load_catalog(opts: &RunOptions) -> Result<Catalog> {
    let titles = titles::load_titles(&opts.basics_path(), &opts.ratings_path())?;
    let index = TitleIndex::new(&titles);
    Ok(Catalog { titles, index })
}

/// Scrape gender votes for every eligible title of `category` that the
/// progress log doesn't already cover.
pub fn scrape_category<S: PageSource>(
    opts: &RunOptions,
    catalog: &Catalog,
    category: Category,
    scraper: &RatingsScraper<S>,
    progress: Option<&mut dyn Progress>,
) -> Result<BatchSummary> {
    let ids = titles::eligible(&catalog.titles, category, opts.min_votes);
    info!("{category}: {} title(s) with at least {} votes", ids.len(), opts.min_votes);

    let job = BatchJob::new(opts.gender_votes_path(category), &GENDER_HEADER);
    job.run(
        ids,
        |id: &Ttid| id.clone(),
        |id: &Ttid| scraper.fetch(id).map(|v| vec![v.to_row(id)]).unwrap_or_default(),
        progress,
    )
}

/// Recompute the weighted table for `category` from its gender votes.
/// The previous weighted table and log are discarded first.
pub fn weigh_category(opts: &RunOptions, catalog: &Catalog, category: Category) -> Result<Vec<(Ttid, f64)>> {
    let job = BatchJob::new(opts.weighted_votes_path(category), &WEIGHTED_HEADER);
    job.reset()?;

    let ids = titles::eligible(&catalog.titles, category, opts.min_votes);
    if ids.is_empty() {
        info!("{category}: no eligible titles, nothing to weigh");
        return Ok(Vec::new());
    }

    let gender = votes::read_gender_votes(&opts.gender_votes_path(category))?;
    let weighted = votes::weigh(&ids, &gender, category)?;

    let summary = job.run(
        weighted.iter(),
        |w: &&(Ttid, f64)| w.0.clone(),
        |w: &&(Ttid, f64)| vec![row![w.0, w.1]],
        None,
    )?;
    info!("{category}: wrote {} weighted score(s)", summary.rows_written);
    Ok(weighted)
}

/// Rank both categories from their weighted tables and render the report.
pub fn report(opts: &RunOptions, index: &TitleIndex) -> Result<String> {
    let mut rankings = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let scores = votes::read_weighted_votes(&opts.weighted_votes_path(category))?;
        let ranked = rank_category(&scores, index, category, &opts.genre);
        info!("{category}: {} title(s) tagged {:?}", ranked.len(), opts.genre);
        rankings.push(ranked);
    }
    Ok(render_report(&merge_for_report(rankings)))
}

/// Scrape, weigh and report, category by category.
pub fn run_all<S: PageSource>(opts: &RunOptions, catalog: &Catalog, scraper: &RatingsScraper<S>) -> Result<String> {
    for category in Category::ALL {
        let mut progress = ConsoleProgress::new(format!("scrape {category}"));
        scrape_category(opts, catalog, category, scraper, Some(&mut progress))?;
    }
    for category in Category::ALL {
        weigh_category(opts, catalog, category)?;
    }
    report(opts, &catalog.index)
}
