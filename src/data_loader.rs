//! Reader for the line-oriented matrix description:
//!
//! ```text
//! rows=<positive integer>
//! cols=<positive integer>
//! (<row>, <col>, <value>)
//! ...
//! ```
//!
//! Malformed input is fatal. Entries whose coordinates fall outside the
//! declared shape are dropped and counted in the [`LoadReport`].

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use tracing::{debug, trace};

use crate::{
    error::{FormatReason, Result, SparseError},
    SparseMatrix, Value,
};

/// Entry-line counts from a successful load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// In-bounds entries, including explicit zeros
    pub processed: usize,
    /// Entries dropped for lying outside the declared shape
    pub skipped: usize,
}

/// Strict integer parser: optional `+`/`-`, then one or more ASCII digits.
///
/// Surrounding whitespace is ignored; anything else (inner spaces, decimal
/// points, exponents, underscores) is rejected.
pub fn parse_int(s: &str) -> std::result::Result<Value, FormatReason> {
    let s = s.trim();
    if s.contains('.') {
        return Err(FormatReason::FloatingPoint);
    }

    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() {
        return Err(FormatReason::NotAnInteger);
    }

    // accumulate towards the sign so that Value::MIN parses
    let mut result: Value = 0;
    for c in digits.bytes() {
        if !c.is_ascii_digit() {
            return Err(FormatReason::NotAnInteger);
        }
        let d = Value::from(c - b'0');
        result = result
            .checked_mul(10)
            .and_then(|r| if negative { r.checked_sub(d) } else { r.checked_add(d) })
            .ok_or(FormatReason::OutOfRange)?;
    }
    Ok(result)
}

/// Reads the next line into `buf`, without its `\n` or `\r\n` terminator.
fn next_line<'b, R: BufRead>(
    reader: &mut R,
    buf: &'b mut Vec<u8>,
    line_no: usize,
) -> Result<Option<&'b str>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    std::str::from_utf8(buf)
        .map(Some)
        .map_err(|_| SparseError::format(line_no, FormatReason::InvalidUtf8))
}

fn parse_header(line: Option<&str>, key: &'static str, line_no: usize) -> Result<usize> {
    let line =
        line.ok_or_else(|| SparseError::format(line_no, FormatReason::MissingHeader(key)))?;
    let rest = line
        .strip_prefix(key)
        .and_then(|rest| rest.strip_prefix('='))
        .ok_or_else(|| SparseError::format(line_no, FormatReason::BadHeader(key)))?;

    let n = parse_int(rest).map_err(|reason| SparseError::format(line_no, reason))?;
    if n <= 0 {
        return Err(SparseError::format(
            line_no,
            FormatReason::NonPositiveDimension(key),
        ));
    }
    usize::try_from(n).map_err(|_| SparseError::format(line_no, FormatReason::OutOfRange))
}

/// Parses an already trimmed, non-blank `(row, col, value)` line.
fn parse_entry(line: &str, line_no: usize) -> Result<(Value, Value, Value)> {
    let content = line
        .strip_prefix('(')
        .and_then(|l| l.strip_suffix(')'))
        .ok_or_else(|| SparseError::format(line_no, FormatReason::NotParenthesized))?;

    let mut toks = content.split(',');
    let (Some(row), Some(col), Some(value), None) =
        (toks.next(), toks.next(), toks.next(), toks.next())
    else {
        let n_fields = content.split(',').count();
        return Err(SparseError::format(
            line_no,
            FormatReason::FieldCount(n_fields),
        ));
    };

    let parse =
        |tok: &str| parse_int(tok).map_err(|reason| SparseError::format(line_no, reason));
    Ok((parse(row)?, parse(col)?, parse(value)?))
}

fn in_bounds(idx: Value, len: usize) -> Option<usize> {
    usize::try_from(idx).ok().filter(|&i| i < len)
}

/// Builds a matrix from a reader over the text format.
pub fn read_matrix<R: BufRead>(mut reader: R) -> Result<(SparseMatrix, LoadReport)> {
    let mut buf = Vec::new();
    let n_rows = parse_header(next_line(&mut reader, &mut buf, 1)?, "rows", 1)?;
    let n_cols = parse_header(next_line(&mut reader, &mut buf, 2)?, "cols", 2)?;

    let mut m = SparseMatrix::new(n_rows, n_cols)?;
    let mut report = LoadReport::default();

    let mut line_no = 2;
    loop {
        line_no += 1;
        let Some(line) = next_line(&mut reader, &mut buf, line_no)? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (row, col, value) = parse_entry(line, line_no)?;
        match (in_bounds(row, n_rows), in_bounds(col, n_cols)) {
            (Some(i), Some(j)) => {
                m.store(i, j, value);
                report.processed += 1;
            }
            _ => {
                trace!(line_no, row, col, "dropping out-of-range entry");
                report.skipped += 1;
            }
        }
    }

    debug!(
        n_rows,
        n_cols,
        nnz = m.nnz(),
        processed = report.processed,
        skipped = report.skipped,
        "matrix parsed"
    );
    Ok((m, report))
}

pub fn load_matrix_with_report(path: impl AsRef<Path>) -> Result<(SparseMatrix, LoadReport)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SparseError::io(path, e))?;
    read_matrix(BufReader::new(file)).map_err(|e| match e {
        SparseError::Stream(source) => SparseError::io(path, source),
        e => e,
    })
}

pub fn load_matrix(path: impl AsRef<Path>) -> Result<SparseMatrix> {
    load_matrix_with_report(path).map(|(m, _)| m)
}
