// tests/batch_resume.rs
//
// Resumable batch processor against real files in a scratch dir.
//
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;

use gender_rank::batch::BatchJob;
use gender_rank::tsv;

const HEADER: [&str; 3] = ["key", "a", "b"];

fn rows_for(k: &String) -> Vec<Vec<String>> {
    vec![vec![k.clone(), format!("{k}-a"), format!("{k}-b")]]
}

fn items(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("item{i:03}")).collect()
}

#[test]
fn second_run_is_idempotent_and_never_retransforms() {
    let dir = tempfile::tempdir().unwrap();
    let job = BatchJob::new(dir.path().join("out.tsv"), &HEADER);

    let first = job.run(items(25), |k: &String| k.clone(), rows_for, None).unwrap();
    assert_eq!(first.processed, 25);
    assert_eq!(first.rows_written, 25);
    let after_first = fs::read_to_string(job.table_path()).unwrap();

    let calls = RefCell::new(Vec::new());
    let second = job
        .run(items(25), |k: &String| k.clone(), |k: &String| { calls.borrow_mut().push(k.clone()); rows_for(k) }, None)
        .unwrap();
    assert!(calls.borrow().is_empty(), "transform re-invoked for {:?}", calls.borrow());
    assert_eq!(second.skipped, 25);
    assert_eq!(second.processed, 0);
    assert_eq!(fs::read_to_string(job.table_path()).unwrap(), after_first);
}

#[test]
fn resume_only_processes_the_tail() {
    let dir = tempfile::tempdir().unwrap();
    let job = BatchJob::new(dir.path().join("out.tsv"), &HEADER);

    job.run(items(10), |k: &String| k.clone(), rows_for, None).unwrap();

    let seen = RefCell::new(Vec::new());
    let s = job
        .run(items(15), |k: &String| k.clone(), |k: &String| { seen.borrow_mut().push(k.clone()); rows_for(k) }, None)
        .unwrap();
    assert_eq!(*seen.borrow(), items(15)[10..].to_vec());
    assert_eq!(s.skipped, 10);

    let keys: Vec<String> = tsv::read_columns(job.table_path(), &["key"]).unwrap().unwrap()
        .into_iter().map(|r| r[0].clone()).collect();
    assert_eq!(keys, items(15));
}

#[test]
fn rows_without_a_completion_mark_are_dropped_before_resuming() {
    let dir = tempfile::tempdir().unwrap();
    let job = BatchJob::new(dir.path().join("out.tsv"), &HEADER);
    job.run(items(3), |k: &String| k.clone(), rows_for, None).unwrap();

    // crash after the rows of item003 hit the table but before its log entry
    let mut text = fs::read_to_string(job.table_path()).unwrap();
    text.push_str("item003\titem003-a\titem003-b\n");
    fs::write(job.table_path(), text).unwrap();

    let s = job.run(items(4), |k: &String| k.clone(), rows_for, None).unwrap();
    assert_eq!(s.orphans_dropped, 1);
    assert_eq!(s.processed, 1);

    let keys: Vec<String> = tsv::read_columns(job.table_path(), &["key"]).unwrap().unwrap()
        .into_iter().map(|r| r[0].clone()).collect();
    assert_eq!(keys, items(4), "no duplicate row for the interrupted item");
}

#[test]
fn written_rows_read_back_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let job = BatchJob::new(dir.path().join("rt.tsv"), &HEADER);
    let input = items(7);
    job.run(input.clone(), |k: &String| k.clone(), rows_for, None).unwrap();

    let back = tsv::read_columns(job.table_path(), &HEADER).unwrap().unwrap();
    let expected: Vec<Vec<String>> = input.iter().flat_map(rows_for).collect();
    assert_eq!(back, expected);
}

#[test]
fn progress_log_lists_every_completed_key() {
    let dir = tempfile::tempdir().unwrap();
    let job = BatchJob::new(dir.path().join("p.tsv"), &HEADER);
    job.run(items(5), |k: &String| k.clone(), |_: &String| Vec::new(), None).unwrap();

    let log = fs::read_to_string(job.log_path()).unwrap();
    assert!(log.starts_with("completed\n"));
    let logged: BTreeSet<String> = job.completed::<String>().unwrap().into_iter().collect();
    assert_eq!(logged, items(5).into_iter().collect());
    // header only: nothing was produced
    assert_eq!(fs::read_to_string(job.table_path()).unwrap(), "key\ta\tb\n");
}

#[test]
fn key_cut_off_before_its_newline_stays_complete() {
    let dir = tempfile::tempdir().unwrap();
    let job = BatchJob::new(dir.path().join("out.tsv"), &HEADER);
    job.run(items(3), |k: &String| k.clone(), rows_for, None).unwrap();

    // crash after the last key was written but before its line break
    let log = fs::read_to_string(job.log_path()).unwrap();
    fs::write(job.log_path(), log.trim_end_matches('\n')).unwrap();

    let resumed = job.run(items(4), |k: &String| k.clone(), rows_for, None).unwrap();
    assert_eq!(resumed.skipped, 3);
    assert_eq!(resumed.processed, 1);

    let seen = RefCell::new(Vec::new());
    let third = job
        .run(items(4), |k: &String| k.clone(), |k: &String| { seen.borrow_mut().push(k.clone()); rows_for(k) }, None)
        .unwrap();
    assert!(seen.borrow().is_empty());
    assert_eq!(third.orphans_dropped, 0);
    assert_eq!(
        fs::read_to_string(job.log_path()).unwrap(),
        "completed\nitem000\nitem001\nitem002\nitem003\n"
    );
}
