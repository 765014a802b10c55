//! Bin statistics written into YODA blocks.
//!
//! Contents are treated as unit-weight fill counts: `numEntries` equals the bin
//! content. The 1D and 2D `sumw2` definitions differ on purpose:
//!
//! - 1D: `sumw2 = sumw`
//! - 2D: `sumw2 = sumw^2`
//!
//! The 2D volume multiplies the total content by the *first* bin width of each
//! axis, which is only exact for uniform binning (see [`AxisPolicy`]).

use crate::config::{AxisPolicy, MeanPolicy, WriteOptions};
use crate::error::{Result, YodaError};
use crate::histogram::{Histo1D, Histo2D};

/// Moments of one 1D bin (or an aggregate of bins).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments1D {
    /// Sum of weights.
    pub sumw: f64,
    /// Sum of squared weights.
    pub sumw2: f64,
    /// Sum of `w * x`.
    pub sumwx: f64,
    /// Sum of `w * x^2`.
    pub sumwx2: f64,
    /// Fill count.
    pub num_entries: f64,
}

impl Moments1D {
    /// In-range bin with centre `x` and content `w`.
    pub fn bin(x: f64, w: f64) -> Self {
        Self { sumw: w, sumw2: w, sumwx: x * w, sumwx2: x * x * w, num_entries: w }
    }

    /// Flow bin with content `w`; it has no centre, so the x moments are zero.
    pub fn flow(w: f64) -> Self {
        Self { sumw: w, sumw2: w, sumwx: 0.0, sumwx2: 0.0, num_entries: w }
    }

    fn accumulate(&mut self, o: &Self) {
        self.sumw += o.sumw;
        self.sumw2 += o.sumw2;
        self.sumwx += o.sumwx;
        self.sumwx2 += o.sumwx2;
        self.num_entries += o.num_entries;
    }

    /// Values in column order (`sumw sumw2 sumwx sumwx2 numEntries`).
    pub fn columns(&self) -> [f64; 5] {
        [self.sumw, self.sumw2, self.sumwx, self.sumwx2, self.num_entries]
    }
}

/// Moments of one 2D cell (or an aggregate of cells).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments2D {
    /// Sum of weights.
    pub sumw: f64,
    /// Sum of squared weights.
    pub sumw2: f64,
    /// Sum of `w * x`.
    pub sumwx: f64,
    /// Sum of `w * x^2`.
    pub sumwx2: f64,
    /// Sum of `w * y`.
    pub sumwy: f64,
    /// Sum of `w * y^2`.
    pub sumwy2: f64,
    /// Sum of `w * x * y`.
    pub sumwxy: f64,
    /// Fill count.
    pub num_entries: f64,
}

impl Moments2D {
    /// Cell with centre `(x, y)` and content `w`.
    pub fn cell(x: f64, y: f64, w: f64) -> Self {
        Self {
            sumw: w,
            sumw2: w * w,
            sumwx: w * x,
            sumwx2: w * x * x,
            sumwy: w * y,
            sumwy2: w * y * y,
            sumwxy: w * x * y,
            num_entries: w,
        }
    }

    fn accumulate(&mut self, o: &Self) {
        self.sumw += o.sumw;
        self.sumw2 += o.sumw2;
        self.sumwx += o.sumwx;
        self.sumwx2 += o.sumwx2;
        self.sumwy += o.sumwy;
        self.sumwy2 += o.sumwy2;
        self.sumwxy += o.sumwxy;
        self.num_entries += o.num_entries;
    }

    /// Values in column order
    /// (`sumw sumw2 sumwx sumwx2 sumwy sumwy2 sumwxy numEntries`).
    pub fn columns(&self) -> [f64; 8] {
        [
            self.sumw,
            self.sumw2,
            self.sumwx,
            self.sumwx2,
            self.sumwy,
            self.sumwy2,
            self.sumwxy,
            self.num_entries,
        ]
    }
}

/// One row of the 1D bin table.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin1D {
    /// Lower edge.
    pub xlow: f64,
    /// Upper edge.
    pub xhigh: f64,
    /// Bin moments.
    pub moments: Moments1D,
}

/// One row of the 2D bin table.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin2D {
    /// Lower x edge.
    pub xlow: f64,
    /// Upper x edge.
    pub xhigh: f64,
    /// Lower y edge.
    pub ylow: f64,
    /// Upper y edge.
    pub yhigh: f64,
    /// Cell moments.
    pub moments: Moments2D,
}

/// Everything the writer needs for a 1D block.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary1D {
    /// Content-weighted mean of bin centres (in-range bins only).
    pub mean: f64,
    /// Total weight including flow bins.
    pub area: f64,
    /// Sum of every bin row plus both flow rows.
    pub total: Moments1D,
    /// Underflow row.
    pub underflow: Moments1D,
    /// Overflow row.
    pub overflow: Moments1D,
    /// In-range bins in axis order.
    pub bins: Vec<Bin1D>,
}

/// Everything the writer needs for a 2D block.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary2D {
    /// `(mean_x, mean_y)`.
    pub mean: (f64, f64),
    /// `sum(contents) * widthX[0] * widthY[0]`.
    pub volume: f64,
    /// Sum of every cell row.
    pub total: Moments2D,
    /// Cells in x-major order.
    pub bins: Vec<Bin2D>,
}

/// `sum(contents) + underflow + overflow`.
pub fn area(h: &Histo1D) -> f64 {
    h.contents.iter().sum::<f64>() + h.underflow + h.overflow
}

/// Content-weighted mean of the bin centres, ignoring flow bins.
pub fn mean_1d(path: &str, h: &Histo1D, policy: MeanPolicy) -> Result<f64> {
    let sumw: f64 = h.contents.iter().sum();
    let sumwx: f64 = h.axis.centers().iter().zip(&h.contents).map(|(x, w)| x * w).sum();
    weighted_mean(path, sumwx, sumw, policy)
}

/// `(mean_x, mean_y)` over all cells.
pub fn mean_2d(path: &str, h: &Histo2D, policy: MeanPolicy) -> Result<(f64, f64)> {
    let cx = h.x_axis.centers();
    let cy = h.y_axis.centers();
    let mut sumw = 0.0;
    let mut sumwx = 0.0;
    let mut sumwy = 0.0;
    for (i, row) in h.contents.iter().enumerate() {
        for (j, &w) in row.iter().enumerate() {
            sumw += w;
            sumwx += cx[i] * w;
            sumwy += cy[j] * w;
        }
    }
    Ok((weighted_mean(path, sumwx, sumw, policy)?, weighted_mean(path, sumwy, sumw, policy)?))
}

/// `sum(contents) * widthX[0] * widthY[0]`, subject to `axis_policy`.
pub fn volume(path: &str, h: &Histo2D, opts: &WriteOptions) -> Result<f64> {
    if opts.axis_policy == AxisPolicy::RequireUniform {
        if !h.x_axis.is_uniform(opts.uniform_tolerance) {
            return Err(YodaError::NonUniformAxis { path: path.to_string(), axis: "x" });
        }
        if !h.y_axis.is_uniform(opts.uniform_tolerance) {
            return Err(YodaError::NonUniformAxis { path: path.to_string(), axis: "y" });
        }
    }
    let total: f64 = h.contents.iter().flatten().sum();
    Ok(total * h.x_axis.widths()[0] * h.y_axis.widths()[0])
}

fn weighted_mean(path: &str, sumwx: f64, sumw: f64, policy: MeanPolicy) -> Result<f64> {
    if sumw != 0.0 {
        return Ok(sumwx / sumw);
    }
    match policy {
        MeanPolicy::Nan => {
            log::warn!("'{path}': zero in-range content, writing NaN mean");
            Ok(f64::NAN)
        }
        MeanPolicy::Error => Err(YodaError::DegenerateMean { path: path.to_string() }),
    }
}

/// Compute the 1D block statistics.
pub fn summarize_1d(path: &str, h: &Histo1D, opts: &WriteOptions) -> Result<Summary1D> {
    h.validate()?;

    let edges = h.axis.edges();
    let bins: Vec<Bin1D> = h
        .axis
        .centers()
        .iter()
        .zip(&h.contents)
        .enumerate()
        .map(|(i, (&x, &w))| Bin1D {
            xlow: edges[i],
            xhigh: edges[i + 1],
            moments: Moments1D::bin(x, w),
        })
        .collect();

    let underflow = Moments1D::flow(h.underflow);
    let overflow = Moments1D::flow(h.overflow);
    let mut total = Moments1D::default();
    for b in &bins {
        total.accumulate(&b.moments);
    }
    total.accumulate(&underflow);
    total.accumulate(&overflow);

    Ok(Summary1D {
        mean: mean_1d(path, h, opts.mean_policy)?,
        area: area(h),
        total,
        underflow,
        overflow,
        bins,
    })
}

/// Compute the 2D block statistics.
pub fn summarize_2d(path: &str, h: &Histo2D, opts: &WriteOptions) -> Result<Summary2D> {
    h.validate()?;

    let volume = volume(path, h, opts)?;
    let mean = mean_2d(path, h, opts.mean_policy)?;

    let xe = h.x_axis.edges();
    let ye = h.y_axis.edges();
    let cx = h.x_axis.centers();
    let cy = h.y_axis.centers();

    let (nx, ny) = h.shape();
    let mut bins = Vec::with_capacity(nx * ny);
    let mut total = Moments2D::default();
    for (i, row) in h.contents.iter().enumerate() {
        for (j, &w) in row.iter().enumerate() {
            let moments = Moments2D::cell(cx[i], cy[j], w);
            total.accumulate(&moments);
            bins.push(Bin2D {
                xlow: xe[i],
                xhigh: xe[i + 1],
                ylow: ye[j],
                yhigh: ye[j + 1],
                moments,
            });
        }
    }

    Ok(Summary2D { mean, volume, total, bins })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Axis;
    use approx::assert_relative_eq;

    fn h1(edges: Vec<f64>, contents: Vec<f64>, uf: f64, of: f64) -> Histo1D {
        Histo1D::new("H", Axis::new(edges).unwrap(), contents, uf, of).unwrap()
    }

    #[test]
    fn mean_and_area_1d() {
        let h = h1(vec![0.0, 1.0, 2.0, 3.0], vec![2.0, 5.0, 3.0], 0.0, 0.0);
        let s = summarize_1d("/h1", &h, &WriteOptions::default()).unwrap();
        assert_relative_eq!(s.mean, 1.5);
        assert_relative_eq!(s.area, 10.0);
    }

    #[test]
    fn flows_count_in_area_not_mean() {
        let h = h1(vec![0.0, 1.0, 2.0], vec![1.0, 1.0], 3.0, 4.0);
        let s = summarize_1d("/h", &h, &WriteOptions::default()).unwrap();
        assert_relative_eq!(s.area, 9.0);
        assert_relative_eq!(s.mean, 1.0);
        assert_eq!(s.underflow, Moments1D::flow(3.0));
        assert_eq!(s.overflow.sumwx, 0.0);
        assert_relative_eq!(s.total.sumw, s.area);
        assert_relative_eq!(s.total.num_entries, 9.0);
    }

    #[test]
    fn per_bin_1d_uses_unit_weight_sumw2() {
        let h = h1(vec![0.0, 2.0, 4.0], vec![3.0, 0.5], 0.0, 0.0);
        let s = summarize_1d("/h", &h, &WriteOptions::default()).unwrap();
        let b = &s.bins[1];
        assert_eq!((b.xlow, b.xhigh), (2.0, 4.0));
        assert_eq!(b.moments.sumw, 0.5);
        assert_eq!(b.moments.sumw2, 0.5);
        assert_relative_eq!(b.moments.sumwx, 1.5);
        assert_relative_eq!(b.moments.sumwx2, 4.5);
        assert_eq!(b.moments.num_entries, 0.5);
        assert_relative_eq!(s.total.sumwx, 3.0 + 1.5);
    }

    #[test]
    fn unit_fills_area_equals_count() {
        let mut contents = vec![0.0; 9];
        for i in 0..100 {
            contents[i % 9] += 1.0;
        }
        let h = Histo1D::new("H", Axis::regular(9, 1.0, 10.0).unwrap(), contents, 0.0, 0.0)
            .unwrap();
        assert_relative_eq!(area(&h), 100.0);
    }

    #[test]
    fn empty_histogram_mean_policy() {
        let h = h1(vec![1.0, 2.0, 3.0], vec![0.0, 0.0], 0.0, 0.0);
        let s = summarize_1d("/zeros", &h, &WriteOptions::default()).unwrap();
        assert!(s.mean.is_nan());
        assert_eq!(s.area, 0.0);

        let err = summarize_1d("/zeros", &h, &WriteOptions::strict()).unwrap_err();
        assert!(matches!(err, YodaError::DegenerateMean { ref path } if path == "/zeros"));
    }

    #[test]
    fn flow_only_histogram_is_degenerate() {
        let h = h1(vec![0.0, 1.0], vec![0.0], 2.0, 0.0);
        assert!(mean_1d("/f", &h, MeanPolicy::Nan).unwrap().is_nan());
        assert!(mean_1d("/f", &h, MeanPolicy::Error).is_err());
    }

    #[test]
    fn constant_grid_2d() {
        let w = 2.5;
        let axis = Axis::regular(4, 0.0, 4.0).unwrap();
        let h = Histo2D::new("G", axis.clone(), axis, vec![vec![w; 4]; 4]).unwrap();
        let s = summarize_2d("/g", &h, &WriteOptions::default()).unwrap();

        assert_relative_eq!(s.volume, 16.0 * w);
        assert_relative_eq!(s.mean.0, 2.0);
        assert_relative_eq!(s.mean.1, 2.0);
        assert_eq!(s.bins.len(), 16);
        for b in &s.bins {
            assert_relative_eq!(b.moments.sumw2, w * w);
            assert_eq!(b.moments.num_entries, w);
        }
        assert_relative_eq!(s.total.sumw, 16.0 * w);
        assert_relative_eq!(s.total.sumw2, 16.0 * w * w);
    }

    #[test]
    fn cell_moments_2d() {
        let m = Moments2D::cell(1.5, 2.5, 2.0);
        assert_eq!(m.sumw2, 4.0);
        assert_eq!(m.sumwx, 3.0);
        assert_eq!(m.sumwx2, 4.5);
        assert_eq!(m.sumwy, 5.0);
        assert_eq!(m.sumwy2, 12.5);
        assert_eq!(m.sumwxy, 7.5);
    }

    #[test]
    fn cells_are_x_major() {
        let h = Histo2D::new(
            "G",
            Axis::new(vec![0.0, 1.0, 2.0]).unwrap(),
            Axis::new(vec![10.0, 20.0, 30.0, 40.0]).unwrap(),
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        )
        .unwrap();
        let s = summarize_2d("/g", &h, &WriteOptions::default()).unwrap();
        let sumw: Vec<f64> = s.bins.iter().map(|b| b.moments.sumw).collect();
        assert_eq!(sumw, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!((s.bins[3].xlow, s.bins[3].ylow), (1.0, 10.0));
    }

    #[test]
    fn mean_2d_weights_centres() {
        let h = Histo2D::new(
            "G",
            Axis::new(vec![0.0, 1.0, 2.0]).unwrap(),
            Axis::new(vec![0.0, 2.0]).unwrap(),
            vec![vec![3.0], vec![1.0]],
        )
        .unwrap();
        let (mx, my) = mean_2d("/g", &h, MeanPolicy::Error).unwrap();
        assert_relative_eq!(mx, (0.5 * 3.0 + 1.5 * 1.0) / 4.0);
        assert_relative_eq!(my, 1.0);
    }

    #[test]
    fn non_uniform_volume_uses_first_width_unless_strict() {
        let h = Histo2D::new(
            "G",
            Axis::new(vec![0.0, 1.0, 3.0]).unwrap(),
            Axis::new(vec![0.0, 0.5]).unwrap(),
            vec![vec![1.0], vec![1.0]],
        )
        .unwrap();
        assert_relative_eq!(volume("/g", &h, &WriteOptions::default()).unwrap(), 2.0 * 1.0 * 0.5);

        let err = volume("/g", &h, &WriteOptions::strict()).unwrap_err();
        assert!(matches!(err, YodaError::NonUniformAxis { axis: "x", .. }));
    }

    #[test]
    fn empty_2d_mean_policy() {
        let axis = Axis::regular(2, 0.0, 2.0).unwrap();
        let h = Histo2D::new("G", axis.clone(), axis, vec![vec![0.0; 2]; 2]).unwrap();
        let s = summarize_2d("/g", &h, &WriteOptions::default()).unwrap();
        assert!(s.mean.0.is_nan() && s.mean.1.is_nan());
        assert_eq!(s.volume, 0.0);
        assert!(summarize_2d("/g", &h, &WriteOptions::strict()).is_err());
    }
}
