// src/config/consts.rs

// Net config
pub const RATINGS_URL_TMPL: &str = "https://www.imdb.com/title/{ttid}/ratings";
pub const MALE_ANCHOR: &str = "demo=males";
pub const FEMALE_ANCHOR: &str = "demo=females";
pub const USER_AGENT: &str = concat!("gender_rank/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const RETRY_DELAY_SECS: u64 = 10;

// Input dumps
pub const DEFAULT_DATA_DIR: &str = "data";
pub const BASICS_FILE: &str = "title.basics.tsv";
pub const RATINGS_FILE: &str = "title.ratings.tsv";

// Output tables
pub const DEFAULT_OUT_DIR: &str = "out";
pub const GENDER_VOTES_STEM: &str = "gender_votes";
pub const WEIGHTED_VOTES_STEM: &str = "weighted_votes";
pub const PROGRESS_SUFFIX: &str = ".progress.tsv";
pub const PROGRESS_HEADER: &str = "completed";
pub const TSV_SEP: u8 = b'\t';

// Selection
pub const MIN_VOTES: u64 = 1000;
pub const DEFAULT_GENRE: &str = "Musical";
