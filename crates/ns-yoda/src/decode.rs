//! Decode scanned `Histo1D_V2` / `Histo2D_V2` blocks back into histograms.
//!
//! Values are recovered from the `%.6e` text, so they match the originals to
//! seven significant digits. Only `sumw` is read back from each row; the
//! remaining moments are derived quantities.

use crate::error::{Result, YodaError};
use crate::histogram::{Axis, Histo1D, Histo2D, Histogram, HistogramCollection};
use crate::reader::{YodaBlock, scan_blocks};
use crate::writer::{HISTO1D_CLASS, HISTO2D_CLASS};

/// Columns in a 1D bin row: `xlow xhigh sumw sumw2 sumwx sumwx2 numEntries`.
const HISTO1D_COLUMNS: usize = 7;
/// Columns in a 2D bin row: `xlow xhigh ylow yhigh` + 8 moments.
const HISTO2D_COLUMNS: usize = 12;

/// Scan every block of `text` and decode it.
pub fn read_yoda(text: &str) -> Result<HistogramCollection> {
    let mut out = HistogramCollection::new();
    for block in scan_blocks(text)? {
        let (path, h) = decode_block(&block)?;
        if out.insert(path.clone(), h).is_some() {
            log::warn!("duplicate YODA path '{path}': keeping the last block");
        }
    }
    Ok(out)
}

/// Decode a block according to its class name.
pub fn decode_block(block: &YodaBlock) -> Result<(String, Histogram)> {
    let h = match block.class_name.as_str() {
        HISTO1D_CLASS => Histogram::Histo1D(decode_histo1d(block)?),
        HISTO2D_CLASS => Histogram::Histo2D(decode_histo2d(block)?),
        other => return Err(YodaError::UnsupportedClass(other.to_string())),
    };
    Ok((block.path.clone(), h))
}

struct Row<'a> {
    line: usize,
    fields: Vec<&'a str>,
}

struct Body<'a> {
    title: String,
    rows: Vec<Row<'a>>,
}

/// Split a block into its `Title:` and the tab-separated data rows after `---`.
fn split_body(block: &YodaBlock) -> Body<'_> {
    let mut title = String::new();
    let mut in_data = false;
    let mut rows = Vec::new();

    for (i, line) in block.body.lines().enumerate() {
        let trimmed = line.trim();
        let first = trimmed.split_whitespace().next();
        if matches!(first, Some("BEGIN") | Some("END")) || trimmed.is_empty() {
            continue;
        }
        if !in_data {
            if trimmed == "---" {
                in_data = true;
            } else if let Some(t) = line.strip_prefix("Title:") {
                title = t.strip_prefix(' ').unwrap_or(t).to_string();
            }
            continue;
        }
        if trimmed.starts_with('#') {
            continue;
        }
        rows.push(Row { line: i + 1, fields: line.split('\t').map(str::trim).collect() });
    }

    Body { title, rows }
}

fn field(row: &Row<'_>, idx: usize) -> Result<f64> {
    let raw = row.fields.get(idx).ok_or_else(|| YodaError::MalformedRow {
        line: row.line,
        reason: format!("missing column {}", idx + 1),
    })?;
    raw.parse::<f64>()
        .map_err(|_| YodaError::MalformedRow {
            line: row.line,
            reason: format!("bad number {raw:?}"),
        })
}

fn check_width(row: &Row<'_>, expected: usize) -> Result<()> {
    if row.fields.len() != expected {
        return Err(YodaError::MalformedRow {
            line: row.line,
            reason: format!("expected {expected} columns, got {}", row.fields.len()),
        });
    }
    Ok(())
}

fn edge_mismatch(row: &Row<'_>, what: &str) -> YodaError {
    YodaError::MalformedRow {
        line: row.line,
        reason: format!("{what} does not continue the binning"),
    }
}

/// Rebuild a [`Histo1D`] from a `YODA_HISTO1D` block.
pub fn decode_histo1d(block: &YodaBlock) -> Result<Histo1D> {
    let body = split_body(block);
    let mut underflow = 0.0;
    let mut overflow = 0.0;
    let mut edges: Vec<f64> = Vec::new();
    let mut contents = Vec::new();

    for row in &body.rows {
        match row.fields.first().copied() {
            Some("Total") => continue,
            Some("Underflow") => underflow = field(row, 2)?,
            Some("Overflow") => overflow = field(row, 2)?,
            _ => {
                check_width(row, HISTO1D_COLUMNS)?;
                let (xlow, xhigh) = (field(row, 0)?, field(row, 1)?);
                match edges.last() {
                    None => edges.push(xlow),
                    Some(&prev) if prev != xlow => return Err(edge_mismatch(row, "xlow")),
                    Some(_) => {}
                }
                edges.push(xhigh);
                contents.push(field(row, 2)?);
            }
        }
    }

    if contents.is_empty() {
        return Err(YodaError::InvalidHistogram(format!("'{}': no bin rows", block.path)));
    }
    Histo1D::new(body.title, Axis::new(edges)?, contents, underflow, overflow)
}

/// Rebuild a [`Histo2D`] from a `YODA_HISTO2D` block (rows must be x-major).
pub fn decode_histo2d(block: &YodaBlock) -> Result<Histo2D> {
    let body = split_body(block);

    struct Cell {
        x: (f64, f64),
        y: (f64, f64),
        sumw: f64,
    }

    let mut cells = Vec::new();
    let mut cell_rows = Vec::new();
    for row in &body.rows {
        if row.fields.first() == Some(&"Total") {
            continue;
        }
        check_width(row, HISTO2D_COLUMNS)?;
        cells.push(Cell {
            x: (field(row, 0)?, field(row, 1)?),
            y: (field(row, 2)?, field(row, 3)?),
            sumw: field(row, 4)?,
        });
        cell_rows.push(row);
    }

    let Some(first) = cells.first() else {
        return Err(YodaError::InvalidHistogram(format!("'{}': no bin rows", block.path)));
    };
    let ny = cells.iter().take_while(|c| c.x == first.x).count();
    if cells.len() % ny != 0 {
        return Err(YodaError::InvalidHistogram(format!(
            "'{}': {} cells do not form a grid with {ny} y-bins",
            block.path,
            cells.len()
        )));
    }
    let nx = cells.len() / ny;

    let mut y_edges = vec![first.y.0];
    y_edges.extend(cells[..ny].iter().map(|c| c.y.1));
    let mut x_edges = vec![first.x.0];
    x_edges.extend((0..nx).map(|i| cells[i * ny].x.1));

    let mut contents = vec![vec![0.0; ny]; nx];
    for (k, cell) in cells.iter().enumerate() {
        let (i, j) = (k / ny, k % ny);
        if cell.x != (x_edges[i], x_edges[i + 1]) {
            return Err(edge_mismatch(cell_rows[k], "x range"));
        }
        if cell.y != (y_edges[j], y_edges[j + 1]) {
            return Err(edge_mismatch(cell_rows[k], "y range"));
        }
        contents[i][j] = cell.sumw;
    }

    Histo2D::new(body.title, Axis::new(x_edges)?, Axis::new(y_edges)?, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::scan_block;

    fn block(text: &str) -> YodaBlock {
        scan_block(text).unwrap().into_block().unwrap()
    }

    #[test]
    fn decode_1d_rows() {
        let b = block(
            "BEGIN YODA_HISTO1D_V2 /h\nPath: /h\nTitle: My hist\n---\n# Mean: 1\n\
             Total\tTotal\t9\t9\t0\t0\t9\n\
             Underflow \tUnderflow \t1.000000e+00\t1\t0\t0\t1\n\
             Overflow\tOverflow\t2.000000e+00\t2\t0\t0\t2\n\
             # xlow\txhigh\tsumw\tsumw2\tsumwx\tsumwx2\tnumEntries\n\
             0.000000e+00\t1.000000e+00\t2.500000e+00\t0\t0\t0\t0\n\
             1.000000e+00\t3.000000e+00\t3.500000e+00\t0\t0\t0\t0\n\
             END YODA_HISTO1D_V2\n",
        );
        let h = decode_histo1d(&b).unwrap();
        assert_eq!(h.name, "My hist");
        assert_eq!(h.axis.edges(), &[0.0, 1.0, 3.0]);
        assert_eq!(h.contents, vec![2.5, 3.5]);
        assert_eq!((h.underflow, h.overflow), (1.0, 2.0));
    }

    #[test]
    fn title_whitespace_round_trips() {
        for name in ["  pT ", "", "a\tb"] {
            let mut c = HistogramCollection::new();
            c.insert(
                "/h",
                Histo1D::new(name, Axis::regular(1, 0.0, 1.0).unwrap(), vec![1.0], 0.0, 0.0)
                    .unwrap(),
            );
            let text = crate::to_yoda(&c, &crate::WriteOptions::default()).unwrap();
            let back = read_yoda(&text).unwrap();
            assert_eq!(back.get("/h").map(Histogram::name), Some(name));
        }
    }

    #[test]
    fn decode_1d_rejects_gap() {
        let b = block(
            "BEGIN YODA_HISTO1D_V2 /h\n---\n\
             0\t1\t1\t1\t0\t0\t1\n\
             2\t3\t1\t1\t0\t0\t1\n\
             END YODA_HISTO1D_V2\n",
        );
        let err = decode_histo1d(&b).unwrap_err();
        assert!(matches!(err, YodaError::MalformedRow { line: 4, .. }), "{err}");
    }

    #[test]
    fn decode_1d_rejects_short_row_and_bad_number() {
        let short = block("BEGIN YODA_HISTO1D_V2 /h\n---\n0\t1\t1\nEND YODA_HISTO1D_V2\n");
        assert!(decode_histo1d(&short).unwrap_err().to_string().contains("expected 7 columns"));

        let bad =
            block("BEGIN YODA_HISTO1D_V2 /h\n---\n0\t1\tx\t1\t0\t0\t1\nEND YODA_HISTO1D_V2\n");
        assert!(decode_histo1d(&bad).unwrap_err().to_string().contains("bad number"));
    }

    #[test]
    fn decode_empty_table() {
        let b = block("BEGIN YODA_HISTO1D_V2 /h\n---\nEND YODA_HISTO1D_V2\n");
        assert!(matches!(decode_histo1d(&b), Err(YodaError::InvalidHistogram(_))));
    }

    #[test]
    fn decode_2d_grid() {
        let mut text = String::from("BEGIN YODA_HISTO2D_V2 /g\nTitle: G\n---\n");
        text.push_str("Total\tTotal\t0\t0\t0\t0\t0\t0\t0\t0\n");
        for (i, x) in [(0.0, 1.0), (1.0, 2.0)].iter().enumerate() {
            for (j, y) in [(5.0, 6.0), (6.0, 8.0), (8.0, 9.0)].iter().enumerate() {
                let w = (10 * i + j) as f64;
                let (xl, xh, yl, yh) = (x.0, x.1, y.0, y.1);
                text.push_str(&format!("{xl}\t{xh}\t{yl}\t{yh}\t{w}\t0\t0\t0\t0\t0\t0\t0\n"));
            }
        }
        text.push_str("END YODA_HISTO2D_V2\n");

        let h = decode_histo2d(&block(&text)).unwrap();
        assert_eq!(h.x_axis.edges(), &[0.0, 1.0, 2.0]);
        assert_eq!(h.y_axis.edges(), &[5.0, 6.0, 8.0, 9.0]);
        assert_eq!(h.contents, vec![vec![0.0, 1.0, 2.0], vec![10.0, 11.0, 12.0]]);
    }

    #[test]
    fn decode_2d_rejects_ragged_grid() {
        let text = "BEGIN YODA_HISTO2D_V2 /g\n---\n\
                    0\t1\t0\t1\t1\t0\t0\t0\t0\t0\t0\t0\n\
                    0\t1\t1\t2\t1\t0\t0\t0\t0\t0\t0\t0\n\
                    1\t2\t0\t1\t1\t0\t0\t0\t0\t0\t0\t0\n\
                    END YODA_HISTO2D_V2\n";
        assert!(matches!(decode_histo2d(&block(text)), Err(YodaError::InvalidHistogram(_))));

        let text = "BEGIN YODA_HISTO2D_V2 /g\n---\n\
                    0\t1\t0\t1\t1\t0\t0\t0\t0\t0\t0\t0\n\
                    1\t2\t5\t6\t1\t0\t0\t0\t0\t0\t0\t0\n\
                    END YODA_HISTO2D_V2\n";
        assert!(matches!(decode_histo2d(&block(text)), Err(YodaError::MalformedRow { .. })));
    }

    #[test]
    fn unsupported_class() {
        let b = block("BEGIN YODA_SCATTER2D_V2 /s\nEND YODA_SCATTER2D_V2\n");
        let err = decode_block(&b).unwrap_err();
        assert!(matches!(err, YodaError::UnsupportedClass(ref c) if c == "YODA_SCATTER2D"));
    }
}
