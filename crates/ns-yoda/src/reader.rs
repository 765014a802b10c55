//! Line scanner isolating `BEGIN ... END` blocks in YODA text.
//!
//! The scanner only frames blocks: it reports the declared class name
//! (`YODA_HISTO1D_V2` → `YODA_HISTO1D`), the path, and the verbatim body. Body
//! decoding lives in [`crate::decode`].

use crate::error::{Result, YodaError};

/// Length of the version discriminator (`_V2`) stripped from class names.
const VERSION_SUFFIX_LEN: usize = 3;

/// One delimited block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YodaBlock {
    /// Declared type without its version suffix, e.g. `YODA_HISTO1D`.
    pub class_name: String,
    /// Path token of the BEGIN line.
    pub path: String,
    /// Raw text from the BEGIN line through the END line, each line `\n`-terminated.
    pub body: String,
}

/// Result of [`scan_block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The first block in the input.
    Found(YodaBlock),
    /// The input contains no BEGIN line.
    NotFound,
}

impl ScanOutcome {
    /// The block, if one was found.
    pub fn into_block(self) -> Option<YodaBlock> {
        match self {
            ScanOutcome::Found(b) => Some(b),
            ScanOutcome::NotFound => None,
        }
    }
}

/// Return the first block of `text`, or `NotFound`.
pub fn scan_block(text: &str) -> Result<ScanOutcome> {
    let mut scanner = Scanner::new(text);
    Ok(match scanner.next_block()? {
        Some(b) => ScanOutcome::Found(b),
        None => ScanOutcome::NotFound,
    })
}

/// Return every block of `text` in document order.
pub fn scan_blocks(text: &str) -> Result<Vec<YodaBlock>> {
    let mut scanner = Scanner::new(text);
    let mut blocks = Vec::new();
    while let Some(b) = scanner.next_block()? {
        blocks.push(b);
    }
    log::debug!("scanned {} YODA block(s)", blocks.len());
    Ok(blocks)
}

struct Scanner<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { lines: text.lines().enumerate() }
    }

    /// Seek the next BEGIN line, then capture through its END line.
    fn next_block(&mut self) -> Result<Option<YodaBlock>> {
        let (begin_no, begin) = loop {
            match self.lines.next() {
                Some((i, line)) if first_token(line) == Some("BEGIN") => break (i + 1, line),
                Some(_) => continue,
                None => return Ok(None),
            }
        };

        let (type_token, path) = parse_begin(begin_no, begin)?;
        let class_name = strip_version(type_token)
            .ok_or_else(|| YodaError::MalformedHeader { line: begin_no, text: begin.to_string() })?;

        let mut body = String::new();
        body.push_str(begin);
        body.push('\n');

        for (_, line) in self.lines.by_ref() {
            body.push_str(line);
            body.push('\n');

            let mut tokens = line.split_whitespace();
            if tokens.next() == Some("END") {
                let end_type = tokens.next();
                if end_type != Some(type_token) {
                    log::warn!(
                        "block '{path}' (line {begin_no}) opened as {type_token} but closed as {}",
                        end_type.unwrap_or("<none>")
                    );
                }
                return Ok(Some(YodaBlock {
                    class_name: class_name.to_string(),
                    path: path.to_string(),
                    body,
                }));
            }
        }

        Err(YodaError::UnterminatedBlock { path: path.to_string(), line: begin_no })
    }
}

fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// `BEGIN <TYPE> <path>` → `(TYPE, path)`.
fn parse_begin(line_no: usize, line: &str) -> Result<(&str, &str)> {
    let mut tokens = line.split_whitespace().skip(1);
    match (tokens.next(), tokens.next()) {
        (Some(type_token), Some(path)) => Ok((type_token, path)),
        _ => Err(YodaError::MalformedHeader { line: line_no, text: line.to_string() }),
    }
}

fn strip_version(type_token: &str) -> Option<&str> {
    let cut = type_token.char_indices().rev().nth(VERSION_SUFFIX_LEN - 1)?.0;
    if cut == 0 {
        return None;
    }
    Some(&type_token[..cut])
}
