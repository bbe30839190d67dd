// src/tsv.rs
// Tab-separated tables: header line, one record per line, no quoting.
// The IMDb dumps contain bare `"` inside titles, so quoting is off both ways.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};

use crate::config::consts::TSV_SEP;
use crate::error::{Error, Result};

/* ---------------- Reading ---------------- */

fn reader(path: &Path) -> Result<Option<csv::Reader<File>>> {
    if !path.exists() {
        return Ok(None);
    }
    let rdr = ReaderBuilder::new()
        .delimiter(TSV_SEP)
        .quoting(false)
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .map_err(Error::tsv(path))?;
    Ok(Some(rdr))
}

fn header_is_empty(h: &StringRecord) -> bool {
    h.is_empty() || (h.len() == 1 && h[0].is_empty())
}

/// Read `columns` (by header name, any order in the file) from every data row.
///
/// `Ok(None)` when the file is missing or has no data rows. A row shorter than
/// the right-most requested column is an upstream contract violation and
/// comes back as [`Error::MalformedRow`]; callers are expected to stop.
pub fn read_columns(path: &Path, columns: &[&str]) -> Result<Option<Vec<Vec<String>>>> {
    let Some(mut rdr) = reader(path)? else { return Ok(None) };

    let headers = rdr.headers().map_err(Error::tsv(path))?.clone();
    if header_is_empty(&headers) {
        return Ok(None);
    }

    let mut positions = Vec::with_capacity(columns.len());
    for col in columns {
        let pos = headers
            .iter()
            .position(|h| h == *col)
            .ok_or_else(|| Error::MissingColumn { path: path.to_path_buf(), column: s!(*col) })?;
        positions.push(pos);
    }
    let needed = positions.iter().copied().max().map_or(0, |m| m + 1);

    let mut rows = Vec::new();
    let mut rec = StringRecord::new();
    while rdr.read_record(&mut rec).map_err(Error::tsv(path))? {
        if rec.len() < needed {
            return Err(Error::MalformedRow {
                path: path.to_path_buf(),
                line: rec.position().map_or(0, |p| p.line()),
                needed,
                found: rec.len(),
                row: rec.iter().map(str::to_string).collect(),
            });
        }
        rows.push(positions.iter().map(|&i| s!(&rec[i])).collect());
    }

    Ok(if rows.is_empty() { None } else { Some(rows) })
}

/// Whole table, header included, with no column selection.
pub fn read_all(path: &Path) -> Result<Option<(Vec<String>, Vec<Vec<String>>)>> {
    let Some(mut rdr) = reader(path)? else { return Ok(None) };
    let headers = rdr.headers().map_err(Error::tsv(path))?.clone();
    if header_is_empty(&headers) {
        return Ok(None);
    }
    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(Error::tsv(path))?;
        rows.push(rec.iter().map(str::to_string).collect());
    }
    Ok(Some((headers.iter().map(str::to_string).collect(), rows)))
}

/* ---------------- Writing ---------------- */

/// Tabs and line breaks would split a cell; flatten them to spaces.
fn clean_cell(cell: &str) -> std::borrow::Cow<'_, str> {
    if cell.contains(['\t', '\n', '\r']) {
        cell.replace(['\t', '\n', '\r'], " ").into()
    } else {
        cell.into()
    }
}

fn writer(file: File) -> csv::Writer<File> {
    WriterBuilder::new()
        .delimiter(TSV_SEP)
        .quote_style(QuoteStyle::Never)
        .flexible(true)
        .has_headers(false)
        .from_writer(file)
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(Error::io(parent))?;
        }
    }
    Ok(())
}

/// Append-only table handle. Rows are buffered until [`TsvAppender::commit`],
/// which flushes and fsyncs.
pub struct TsvAppender {
    path: PathBuf,
    w: csv::Writer<File>,
}

impl TsvAppender {
    /// Open for append, creating the file (and its header) if missing or empty.
    /// A last line cut short by a crash is terminated first, so the next row
    /// starts on a line of its own.
    pub fn open<S: AsRef<str>>(path: &Path, header: &[S]) -> Result<Self> {
        ensure_parent(path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(Error::io(path))?;
        let len = file.metadata().map_err(Error::io(path))?.len();
        let fresh = len == 0;

        if !fresh && !ends_with_newline(&mut file, len).map_err(Error::io(path))? {
            file.write_all(b"\n").map_err(Error::io(path))?;
            file.sync_data().map_err(Error::io(path))?;
        }

        let mut out = Self { path: path.to_path_buf(), w: writer(file) };
        if fresh {
            out.write_row(header)?;
            out.commit()?;
        }
        Ok(out)
    }

    pub fn write_row<S: AsRef<str>>(&mut self, row: &[S]) -> Result<()> {
        self.w
            .write_record(row.iter().map(|c| clean_cell(c.as_ref()).into_owned()))
            .map_err(Error::tsv(&self.path))
    }

    /// Flush buffered rows and push them to durable storage.
    pub fn commit(&mut self) -> Result<()> {
        self.w.flush().map_err(Error::io(&self.path))?;
        self.w.get_ref().sync_data().map_err(Error::io(&self.path))
    }
}

fn ends_with_newline(file: &mut File, len: u64) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Replace `path` with `header` + `rows` in one step (temp file + rename).
pub fn rewrite_table<S: AsRef<str>>(path: &Path, header: &[S], rows: &[Vec<String>]) -> Result<()> {
    ensure_parent(path)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let file = File::create(&tmp).map_err(Error::io(&tmp))?;
    let mut w = writer(file);
    let write_err = Error::tsv(&tmp);
    let res: std::result::Result<(), csv::Error> = (|| {
        w.write_record(header.iter().map(|c| clean_cell(c.as_ref()).into_owned()))?;
        for r in rows {
            w.write_record(r.iter().map(|c| clean_cell(c).into_owned()))?;
        }
        Ok(())
    })();
    res.map_err(write_err)?;
    w.flush().map_err(Error::io(&tmp))?;
    w.get_ref().sync_all().map_err(Error::io(&tmp))?;
    drop(w);

    fs::rename(&tmp, path).map_err(Error::io(path))
}
