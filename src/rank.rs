// src/rank.rs
// Join weighted scores with title metadata, keep one genre, rank per
// category, then regroup everything by year for the printed report.

use std::cmp::Ordering;

use tracing::warn;

use crate::titles::{Category, TitleIndex, Ttid, has_genre};

#[derive(Clone, Debug, PartialEq)]
pub struct RankedItem {
    /// 1-based position inside its category.
    pub rank: usize,
    pub category: Category,
    pub year: Option<u32>,
    pub title: String,
    pub score: f64,
    pub genres: String,
}

/// Rank one category's weighted scores.
///
/// Titles missing from `index` are skipped with a warning. The sort is stable,
/// so equal scores keep the order they had in `scores`.
pub fn rank_category(
    scores: &[(Ttid, f64)],
    index: &TitleIndex,
    category: Category,
    genre: &str,
) -> Vec<RankedItem> {
    let mut picked = Vec::new();
    for (id, score) in scores {
        let Some(meta) = index.get(id) else {
            warn!("{id}: weighted score has no title metadata, skipped");
            continue;
        };
        if !has_genre(&meta.genres, genre) {
            continue;
        }
        picked.push(RankedItem {
            rank: 0,
            category,
            year: meta.year,
            title: meta.name.clone(),
            score: *score,
            genres: meta.genres.clone(),
        });
    }

    picked.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (i, item) in picked.iter_mut().enumerate() {
        item.rank = i + 1;
    }
    picked
}

fn report_order(a: &RankedItem, b: &RankedItem) -> Ordering {
    a.year
        .cmp(&b.year)
        .then_with(|| a.category.label().cmp(b.category.label()))
        .then_with(|| a.score.total_cmp(&b.score))
}

/// Merge per-category rankings and order them by (year, category, score),
/// unknown years first.
pub fn merge_for_report<I>(rankings: I) -> Vec<RankedItem>
where
    I: IntoIterator<Item = Vec<RankedItem>>,
{
    let mut all: Vec<RankedItem> = rankings.into_iter().flatten().collect();
    all.sort_by(report_order);
    all
}

/// One line per item (`rank  category  year  genres  title`), with a blank
/// line each time the year changes.
pub fn render_report(items: &[RankedItem]) -> String {
    let mut out = s!();
    let mut prev_year: Option<Option<u32>> = None;

    for item in items {
        if prev_year.is_some_and(|y| y != item.year) {
            out.push('\n');
        }
        prev_year = Some(item.year);

        let year = item.year.map_or_else(|| s!("?"), |y| y.to_string());
        out.push_str(&format!(
            "{:>4}  {:<5}  {:>4}  {}  {}\n",
            item.rank, item.category.label(), year, item.genres, item.title
        ));
    }
    out
}
