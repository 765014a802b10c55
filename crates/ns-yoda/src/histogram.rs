//! In-memory histogram model consumed by the YODA writer.
//!
//! Histograms are built and filled elsewhere; this crate only reads their
//! finalized state.

use serde::{Deserialize, Serialize};

use crate::error::{Result, YodaError};

/// Ordered bin edges of one axis (length = n_bins + 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Axis {
    edges: Vec<f64>,
}

impl Axis {
    /// Build an axis from strictly increasing, finite edges.
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(YodaError::InvalidHistogram(format!(
                "axis needs >= 2 edges, got {}",
                edges.len()
            )));
        }
        if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
            return Err(YodaError::InvalidHistogram(format!("non-finite bin edge: {bad}")));
        }
        if let Some(w) = edges.windows(2).find(|w| w[1] <= w[0]) {
            return Err(YodaError::InvalidHistogram(format!(
                "bin edges must be strictly increasing ({} followed by {})",
                w[0], w[1]
            )));
        }
        Ok(Self { edges })
    }

    /// `n_bins` equal-width bins over `[low, high)`.
    pub fn regular(n_bins: usize, low: f64, high: f64) -> Result<Self> {
        if n_bins == 0 {
            return Err(YodaError::InvalidHistogram("axis needs at least one bin".into()));
        }
        let step = (high - low) / n_bins as f64;
        let edges = (0..=n_bins).map(|i| low + step * i as f64).collect();
        Self::new(edges)
    }

    /// Bin edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins (excluding flow bins).
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Bin centres.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Bin widths.
    pub fn widths(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Whether every bin width matches the first within relative `tol`.
    pub fn is_uniform(&self, tol: f64) -> bool {
        let widths = self.widths();
        let first = widths[0];
        widths.iter().all(|w| (w - first).abs() <= tol * first.abs())
    }
}

impl TryFrom<Vec<f64>> for Axis {
    type Error = YodaError;

    fn try_from(edges: Vec<f64>) -> Result<Self> {
        Self::new(edges)
    }
}

impl From<Axis> for Vec<f64> {
    fn from(axis: Axis) -> Self {
        axis.edges
    }
}

/// A 1D histogram with explicit underflow/overflow content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histo1D {
    /// Display name (written as `Title:`).
    pub name: String,
    /// Binning.
    pub axis: Axis,
    /// Bin contents (length = n_bins, excluding under/overflow).
    pub contents: Vec<f64>,
    /// Underflow bin content.
    #[serde(default)]
    pub underflow: f64,
    /// Overflow bin content.
    #[serde(default)]
    pub overflow: f64,
}

impl Histo1D {
    /// Build a histogram, checking that `contents` matches the axis.
    pub fn new(
        name: impl Into<String>,
        axis: Axis,
        contents: Vec<f64>,
        underflow: f64,
        overflow: f64,
    ) -> Result<Self> {
        let h = Self { name: name.into(), axis, contents, underflow, overflow };
        h.validate()?;
        Ok(h)
    }

    /// Check `len(contents) == n_bins`.
    pub fn validate(&self) -> Result<()> {
        if self.contents.len() != self.axis.n_bins() {
            return Err(YodaError::InvalidHistogram(format!(
                "'{}': {} contents for {} bins",
                self.name,
                self.contents.len(),
                self.axis.n_bins()
            )));
        }
        Ok(())
    }

    /// Number of in-range bins.
    pub fn n_bins(&self) -> usize {
        self.axis.n_bins()
    }
}

/// A 2D histogram; `contents[i][j]` is x-bin `i`, y-bin `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histo2D {
    /// Display name (written as `Title:`).
    pub name: String,
    /// X binning.
    pub x_axis: Axis,
    /// Y binning.
    pub y_axis: Axis,
    /// Cell contents, shape `(n_bins_x, n_bins_y)`.
    pub contents: Vec<Vec<f64>>,
}

impl Histo2D {
    /// Build a histogram, checking the grid shape against both axes.
    pub fn new(
        name: impl Into<String>,
        x_axis: Axis,
        y_axis: Axis,
        contents: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let h = Self { name: name.into(), x_axis, y_axis, contents };
        h.validate()?;
        Ok(h)
    }

    /// Check grid dimensions equal `(n_bins_x, n_bins_y)`.
    pub fn validate(&self) -> Result<()> {
        let (nx, ny) = self.shape();
        if self.contents.len() != nx {
            return Err(YodaError::InvalidHistogram(format!(
                "'{}': {} rows for {nx} x-bins",
                self.name,
                self.contents.len()
            )));
        }
        if let Some((i, row)) = self.contents.iter().enumerate().find(|(_, r)| r.len() != ny) {
            return Err(YodaError::InvalidHistogram(format!(
                "'{}': row {i} has {} cells for {ny} y-bins",
                self.name,
                row.len()
            )));
        }
        Ok(())
    }

    /// `(n_bins_x, n_bins_y)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.x_axis.n_bins(), self.y_axis.n_bins())
    }
}

/// A histogram of either dimensionality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Histogram {
    /// One-dimensional.
    #[serde(rename = "histo1d")]
    Histo1D(Histo1D),
    /// Two-dimensional.
    #[serde(rename = "histo2d")]
    Histo2D(Histo2D),
}

impl Histogram {
    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Histogram::Histo1D(h) => &h.name,
            Histogram::Histo2D(h) => &h.name,
        }
    }

    /// YODA class name without the `_V2` discriminator.
    pub fn class_name(&self) -> &'static str {
        match self {
            Histogram::Histo1D(_) => crate::writer::HISTO1D_CLASS,
            Histogram::Histo2D(_) => crate::writer::HISTO2D_CLASS,
        }
    }
}

impl From<Histo1D> for Histogram {
    fn from(h: Histo1D) -> Self {
        Histogram::Histo1D(h)
    }
}

impl From<Histo2D> for Histogram {
    fn from(h: Histo2D) -> Self {
        Histogram::Histo2D(h)
    }
}

/// One `(path, histogram)` pair of a [`HistogramCollection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    /// Unique YODA path, e.g. `/ANALYSIS/h_pt`.
    pub path: String,
    /// The histogram.
    #[serde(flatten)]
    pub histogram: Histogram,
}

/// Histograms keyed by path, iterated in insertion order.
///
/// Deserialized entries go through [`HistogramCollection::insert`], so a
/// repeated path keeps the last histogram at the first position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CollectionEntry>", into = "Vec<CollectionEntry>")]
pub struct HistogramCollection {
    entries: Vec<CollectionEntry>,
}

impl HistogramCollection {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under `path`. An existing entry is replaced in place and returned.
    pub fn insert(
        &mut self,
        path: impl Into<String>,
        histogram: impl Into<Histogram>,
    ) -> Option<Histogram> {
        let path = path.into();
        let histogram = histogram.into();
        match self.entries.iter_mut().find(|e| e.path == path) {
            Some(existing) => Some(std::mem::replace(&mut existing.histogram, histogram)),
            None => {
                self.entries.push(CollectionEntry { path, histogram });
                None
            }
        }
    }

    /// Look up by path.
    pub fn get(&self, path: &str) -> Option<&Histogram> {
        self.entries.iter().find(|e| e.path == path).map(|e| &e.histogram)
    }

    /// Number of histograms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    /// `(path, histogram)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Histogram)> {
        self.entries.iter().map(|e| (e.path.as_str(), &e.histogram))
    }
}

impl From<Vec<CollectionEntry>> for HistogramCollection {
    fn from(entries: Vec<CollectionEntry>) -> Self {
        let mut c = Self::new();
        for e in entries {
            let path = e.path.clone();
            if c.insert(e.path, e.histogram).is_some() {
                log::warn!("duplicate histogram path '{path}': keeping the last entry");
            }
        }
        c
    }
}

impl From<HistogramCollection> for Vec<CollectionEntry> {
    fn from(c: HistogramCollection) -> Self {
        c.entries
    }
}

impl<P: Into<String>, H: Into<Histogram>> FromIterator<(P, H)> for HistogramCollection {
    fn from_iter<I: IntoIterator<Item = (P, H)>>(iter: I) -> Self {
        let mut c = Self::new();
        for (p, h) in iter {
            c.insert(p, h);
        }
        c
    }
}
