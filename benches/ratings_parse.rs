// benches/ratings_parse.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use gender_rank::specs::ratings::parse_page;
use gender_rank::tsv;

/// Ratings-page-sized document: lots of unrelated links before the two we want.
fn sample_page() -> String {
    let mut doc = String::from("<html><body><table>");
    for i in 0..2_000 {
        doc.push_str(&format!(
            r#"<tr><td><abbr>x</abbr><a href="/title/tt{i:07}/ratings?demo=aged_{i}">{i},{i:03}</a></td></tr>"#
        ));
    }
    doc.push_str(r#"<tr><td><a href="/title/tt0111161/ratings?demo=males">1,234,567</a></td></tr>"#);
    doc.push_str(r#"<tr><td><a href="/title/tt0111161/ratings?demo=females">345,678</a></td></tr>"#);
    doc.push_str("</table></body></html>");
    doc
}

fn bench_ratings(c: &mut Criterion) {
    let doc = sample_page();
    c.bench_function("ratings_parse_page", |b| {
        b.iter(|| {
            let v = parse_page(black_box(&doc)).unwrap();
            black_box(v.male)
        })
    });
}

fn bench_tsv(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("title.basics.tsv");
    let mut text = String::from("tconst\ttitleType\tprimaryTitle\toriginalTitle\tisAdult\tstartYear\tendYear\truntimeMinutes\tgenres\n");
    for i in 0..50_000 {
        text.push_str(&format!("tt{i:07}\tmovie\tTitle {i}\tTitle {i}\t0\t{}\t\\N\t90\tDrama,Musical\n", 1950 + i % 70));
    }
    std::fs::write(&path, text).unwrap();

    c.bench_function("tsv_read_columns_50k", |b| {
        b.iter(|| {
            let rows = tsv::read_columns(&path, &["tconst", "startYear", "genres"]).unwrap();
            black_box(rows.map_or(0, |r| r.len()))
        })
    });
}

criterion_group!(benches, bench_ratings, bench_tsv);
criterion_main!(benches);
