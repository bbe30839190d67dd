// src/votes.rs
// Gender vote tables and the bias-corrected weighting.
//
// bias     = total male votes / total female votes   (over one category)
// weighted = male + bias * female                    (per title)
//
// Recency bias is left alone on purpose: old and brand-new titles keep their
// atypical vote counts.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::titles::{Category, Ttid};
use crate::tsv;

pub const GENDER_HEADER: [&str; 3] = ["tconst", "male_votes", "female_votes"];
pub const WEIGHTED_HEADER: [&str; 2] = ["tconst", "weighted_votes"];

/// Either side is `None` when its link was missing from the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenderVotes {
    pub male: Option<u64>,
    pub female: Option<u64>,
}

impl GenderVotes {
    pub fn both(&self) -> Option<(u64, u64)> {
        Some((self.male?, self.female?))
    }

    /// Table row; an absent side is an empty cell.
    pub fn to_row(&self, id: &Ttid) -> Vec<String> {
        let cell = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_default();
        vec![s!(id.as_str()), cell(self.male), cell(self.female)]
    }
}

fn parse_opt_count(cell: &str) -> Option<u64> {
    let t = cell.trim();
    if t.is_empty() { None } else { t.parse().ok() }
}

/// Load a gender vote table into a lookup. A missing table is an empty map.
pub fn read_gender_votes(path: &Path) -> Result<HashMap<Ttid, GenderVotes>> {
    let Some(rows) = tsv::read_columns(path, &GENDER_HEADER)? else {
        return Ok(HashMap::new());
    };
    let mut out = HashMap::with_capacity(rows.len());
    for row in rows {
        let Ok(id) = row[0].parse::<Ttid>() else {
            warn!("{}: skipping row with bad id {row:?}", path.display());
            continue;
        };
        let votes = GenderVotes { male: parse_opt_count(&row[1]), female: parse_opt_count(&row[2]) };
        out.insert(id, votes);
    }
    Ok(out)
}

/// Weighted scores in file order.
pub fn read_weighted_votes(path: &Path) -> Result<Vec<(Ttid, f64)>> {
    let Some(rows) = tsv::read_columns(path, &WEIGHTED_HEADER)? else {
        return Ok(Vec::new());
    };
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        match (row[0].parse::<Ttid>(), row[1].trim().parse::<f64>()) {
            (Ok(id), Ok(score)) => out.push((id, score)),
            _ => warn!("{}: skipping unusable row {row:?}", path.display()),
        }
    }
    Ok(out)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoteTotals {
    pub male: u64,
    pub female: u64,
    /// Eligible titles with no scraped record.
    pub not_found: usize,
}

/// Sum both sides over `ids`. Titles absent from `votes` are logged and skipped.
pub fn totals(ids: &[Ttid], votes: &HashMap<Ttid, GenderVotes>) -> VoteTotals {
    let mut t = VoteTotals::default();
    for id in ids {
        match votes.get(id) {
            Some(v) => {
                t.male += v.male.unwrap_or(0);
                t.female += v.female.unwrap_or(0);
            }
            None => {
                debug!("{id}: not found in gender votes");
                t.not_found += 1;
            }
        }
    }
    if t.not_found > 0 {
        warn!("{} title(s) not found in gender votes", t.not_found);
    }
    t
}

pub fn bias_factor(totals: VoteTotals, category: Category) -> Result<f64> {
    if totals.female == 0 {
        return Err(Error::ZeroFemaleVotes { category });
    }
    Ok(totals.male as f64 / totals.female as f64)
}

pub fn weighted_score(male: u64, female: u64, bias: f64) -> f64 {
    male as f64 + bias * female as f64
}

/// Weighted score for every title in `ids` that has both sides, in `ids` order.
pub fn weigh(
    ids: &[Ttid],
    votes: &HashMap<Ttid, GenderVotes>,
    category: Category,
) -> Result<Vec<(Ttid, f64)>> {
    let t = totals(ids, votes);
    let bias = bias_factor(t, category)?;
    info!("{category}: male={} female={} bias={bias:.4}", t.male, t.female);

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(v) = votes.get(id) else { continue };
        match v.both() {
            Some((m, f)) => out.push((id.clone(), weighted_score(m, f, bias))),
            None => debug!("{id}: incomplete gender votes {v:?}, excluded"),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Ttid {
        s.parse().unwrap()
    }

    fn gv(m: Option<u64>, f: Option<u64>) -> GenderVotes {
        GenderVotes { male: m, female: f }
    }

    #[test]
    fn bias_three_to_one() {
        let ids = vec![id("tt1"), id("tt2"), id("tt3")];
        let votes: HashMap<_, _> = [
            (id("tt1"), gv(Some(10), Some(10))),
            (id("tt2"), gv(Some(740), Some(240))),
        ]
        .into_iter()
        .collect();

        let t = totals(&ids, &votes);
        assert_eq!(t, VoteTotals { male: 750, female: 250, not_found: 1 });
        assert_eq!(bias_factor(t, Category::Movie).unwrap(), 3.0);

        let w = weigh(&ids, &votes, Category::Movie).unwrap();
        assert_eq!(w[0], (id("tt1"), 40.0));
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn partial_records_count_in_totals_but_are_not_weighted() {
        let ids = vec![id("tt1"), id("tt2")];
        let votes: HashMap<_, _> = [
            (id("tt1"), gv(Some(30), None)),
            (id("tt2"), gv(Some(10), Some(20))),
        ]
        .into_iter()
        .collect();

        let w = weigh(&ids, &votes, Category::Show).unwrap();
        // bias = 40 / 20
        assert_eq!(w, vec![(id("tt2"), 10.0 + 2.0 * 20.0)]);
    }

    #[test]
    fn zero_female_total_is_an_error() {
        let ids = vec![id("tt1")];
        let votes: HashMap<_, _> = [(id("tt1"), gv(Some(5), Some(0)))].into_iter().collect();
        assert!(matches!(
            weigh(&ids, &votes, Category::Movie),
            Err(Error::ZeroFemaleVotes { category: Category::Movie })
        ));
        assert!(matches!(
            weigh(&[], &HashMap::new(), Category::Show),
            Err(Error::ZeroFemaleVotes { .. })
        ));
    }

    #[test]
    fn rows_use_empty_cells_for_absent_sides() {
        assert_eq!(gv(Some(3), None).to_row(&id("tt9")), row!["tt9", "3", ""]);
    }

    #[test]
    fn gender_table_reads_back_absent_sides() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("g.tsv");
        std::fs::write(&p, "tconst\tmale_votes\tfemale_votes\ntt1\t5\t\ntt2\t\t7\n").unwrap();
        let m = read_gender_votes(&p).unwrap();
        assert_eq!(m[&id("tt1")], gv(Some(5), None));
        assert_eq!(m[&id("tt2")], gv(None, Some(7)));
    }
}
