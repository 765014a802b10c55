//! # ns-yoda
//!
//! YODA v2 text codec for NextStat histograms.
//!
//! Writes `Histo1D_V2` / `Histo2D_V2` blocks with per-bin moments and flow
//! totals, and scans YODA text back into delimited blocks.
//!
//! ## Example
//!
//! ```
//! use ns_yoda::{Axis, Histo1D, HistogramCollection, ScanOutcome, WriteOptions};
//!
//! let axis = Axis::new(vec![0.0, 1.0, 2.0, 3.0]).unwrap();
//! let h = Histo1D::new("H", axis, vec![2.0, 5.0, 3.0], 0.0, 0.0).unwrap();
//!
//! let mut hists = HistogramCollection::new();
//! hists.insert("/h1", h);
//!
//! let text = ns_yoda::to_yoda_1d(&hists, &WriteOptions::default()).unwrap();
//! assert!(text.contains("# Mean: 1.500000e+00"));
//!
//! match ns_yoda::scan_block(&text).unwrap() {
//!     ScanOutcome::Found(b) => assert_eq!(b.path, "/h1"),
//!     ScanOutcome::NotFound => unreachable!(),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod decode;
pub mod error;
pub mod format;
pub mod histogram;
pub mod io;
pub mod moments;
pub mod reader;
pub mod writer;


pub use config::{AxisPolicy, MeanPolicy, WriteOptions};
pub use decode::{decode_block, decode_histo1d, decode_histo2d, read_yoda};
pub use error::{Result, YodaError};
pub use histogram::{Axis, CollectionEntry, Histo1D, Histo2D, Histogram, HistogramCollection};
pub use io::{read_yoda_file, save_collection, write_yoda_file};
pub use moments::{Summary1D, Summary2D, summarize_1d, summarize_2d};
pub use reader::{ScanOutcome, YodaBlock, scan_block, scan_blocks};
pub use writer::{to_yoda, to_yoda_1d, to_yoda_2d, write_histo1d, write_histo2d, write_histogram};
