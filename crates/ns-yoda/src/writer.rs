//! YODA v2 block serialization for `Histo1D` / `Histo2D`.

use crate::config::WriteOptions;
use crate::error::{Result, YodaError};
use crate::format::{label, sci};
use crate::histogram::{Histo1D, Histo2D, Histogram, HistogramCollection};
use crate::moments::{summarize_1d, summarize_2d};

/// 1D class name as reported by the scanner.
pub const HISTO1D_CLASS: &str = "YODA_HISTO1D";
/// 2D class name as reported by the scanner.
pub const HISTO2D_CLASS: &str = "YODA_HISTO2D";
/// Version discriminator appended to the class name on BEGIN/END lines.
pub const VERSION_SUFFIX: &str = "_V2";

pub(crate) const HISTO1D_STATS_HEADER: &str =
    "# ID\tID\tsumw\tsumw2\tsumwx\tsumwx2\tnumEntries";
pub(crate) const HISTO1D_BINS_HEADER: &str =
    "# xlow\txhigh\tsumw\tsumw2\tsumwx\tsumwx2\tnumEntries";
pub(crate) const HISTO2D_STATS_HEADER: &str =
    "# ID\tID\tsumw\tsumw2\tsumwx\tsumwx2\tsumwy\tsumwy2\tsumwxy\tnumEntries";
pub(crate) const HISTO2D_BINS_HEADER: &str =
    "# xlow\txhigh\tylow\tyhigh\tsumw\tsumw2\tsumwx\tsumwx2\tsumwy\tsumwy2\tsumwxy\tnumEntries";

// ---------------------------------------------------------------------------
// Collection drivers
// ---------------------------------------------------------------------------

/// Serialize the 1D histograms of `input`; 2D entries are skipped.
pub fn to_yoda_1d(input: &HistogramCollection, opts: &WriteOptions) -> Result<String> {
    let mut blocks = Vec::new();
    for (path, h) in input.iter() {
        match h {
            Histogram::Histo1D(h) => blocks.push(write_histo1d(path, h, opts)?),
            Histogram::Histo2D(_) => log::debug!("to_yoda_1d: skipping 2D histogram '{path}'"),
        }
    }
    Ok(join_blocks(&blocks))
}

/// Serialize the 2D histograms of `input`; 1D entries are skipped.
pub fn to_yoda_2d(input: &HistogramCollection, opts: &WriteOptions) -> Result<String> {
    let mut blocks = Vec::new();
    for (path, h) in input.iter() {
        match h {
            Histogram::Histo2D(h) => blocks.push(write_histo2d(path, h, opts)?),
            Histogram::Histo1D(_) => log::debug!("to_yoda_2d: skipping 1D histogram '{path}'"),
        }
    }
    Ok(join_blocks(&blocks))
}

/// Serialize every histogram of `input` in insertion order.
pub fn to_yoda(input: &HistogramCollection, opts: &WriteOptions) -> Result<String> {
    let blocks = input
        .iter()
        .map(|(path, h)| write_histogram(path, h, opts))
        .collect::<Result<Vec<_>>>()?;
    Ok(join_blocks(&blocks))
}

/// Serialize one histogram of either dimensionality.
pub fn write_histogram(path: &str, h: &Histogram, opts: &WriteOptions) -> Result<String> {
    match h {
        Histogram::Histo1D(h) => write_histo1d(path, h, opts),
        Histogram::Histo2D(h) => write_histo2d(path, h, opts),
    }
}

/// Blocks already end in `\n`; one extra newline leaves a single blank line between them.
fn join_blocks(blocks: &[String]) -> String {
    blocks.join("\n")
}

// ---------------------------------------------------------------------------
// Single blocks
// ---------------------------------------------------------------------------

/// Render one `YODA_HISTO1D_V2` block.
pub fn write_histo1d(path: &str, h: &Histo1D, opts: &WriteOptions) -> Result<String> {
    check_header(path, &h.name)?;
    let s = summarize_1d(path, h, opts)?;
    let mut out = String::new();

    write_header(&mut out, HISTO1D_CLASS, "Histo1D", path, &h.name);
    push_line(&mut out, &format!("# Mean: {}", sci(s.mean)));
    push_line(&mut out, &format!("# Area: {}", sci(s.area)));

    push_line(&mut out, HISTO1D_STATS_HEADER);
    for (name, m) in [("Total", &s.total), ("Underflow", &s.underflow), ("Overflow", &s.overflow)] {
        push_row(&mut out, &id_fields(name, opts.label_width), &m.columns());
    }

    push_line(&mut out, HISTO1D_BINS_HEADER);
    for b in &s.bins {
        let edges = [sci(b.xlow), sci(b.xhigh)];
        push_row(&mut out, &edges, &b.moments.columns());
    }

    write_footer(&mut out, HISTO1D_CLASS);
    Ok(out)
}

/// Render one `YODA_HISTO2D_V2` block. Bin rows are x-major.
pub fn write_histo2d(path: &str, h: &Histo2D, opts: &WriteOptions) -> Result<String> {
    check_header(path, &h.name)?;
    let s = summarize_2d(path, h, opts)?;
    let mut out = String::new();

    write_header(&mut out, HISTO2D_CLASS, "Histo2D", path, &h.name);
    push_line(&mut out, &format!("# Mean: ({}, {})", sci(s.mean.0), sci(s.mean.1)));
    push_line(&mut out, &format!("# Volume: {}", sci(s.volume)));

    push_line(&mut out, HISTO2D_STATS_HEADER);
    push_row(&mut out, &id_fields("Total", opts.label_width), &s.total.columns());

    push_line(&mut out, HISTO2D_BINS_HEADER);
    for b in &s.bins {
        let edges = [sci(b.xlow), sci(b.xhigh), sci(b.ylow), sci(b.yhigh)];
        push_row(&mut out, &edges, &b.moments.columns());
    }

    write_footer(&mut out, HISTO2D_CLASS);
    Ok(out)
}

/// The path must be one BEGIN-line token and the title a single line.
fn check_header(path: &str, title: &str) -> Result<()> {
    if path.is_empty() {
        return Err(YodaError::InvalidPath { path: path.to_string(), reason: "empty path" });
    }
    if path.chars().any(char::is_whitespace) {
        return Err(YodaError::InvalidPath {
            path: path.to_string(),
            reason: "path contains whitespace",
        });
    }
    if title.contains(['\n', '\r']) {
        return Err(YodaError::InvalidHistogram(format!(
            "'{path}': title {title:?} spans more than one line"
        )));
    }
    Ok(())
}

fn write_header(out: &mut String, class: &str, type_name: &str, path: &str, title: &str) {
    push_line(out, &format!("BEGIN {class}{VERSION_SUFFIX} {path}"));
    push_line(out, &format!("Path: {path}"));
    push_line(out, &format!("Title: {title}"));
    push_line(out, &format!("Type: {type_name}"));
    push_line(out, "some: stuff");
    push_line(out, "---");
}

fn write_footer(out: &mut String, class: &str) {
    push_line(out, &format!("END {class}{VERSION_SUFFIX}"));
}

fn id_fields(name: &str, width: usize) -> [String; 2] {
    let l = label(name, width);
    [l.clone(), l]
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// Tab-join leading text fields and `%.6e` values into one row.
fn push_row(out: &mut String, lead: &[String], values: &[f64]) {
    let fields: Vec<String> = lead.iter().cloned().chain(values.iter().map(|&v| sci(v))).collect();
    push_line(out, &fields.join("\t"));
}
