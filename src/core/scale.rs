use crate::error::{ChartError, ChartResult};

/// Continuous mapping from a data domain onto a pixel range.
///
/// The range may be inverted (`range_start > range_end`), which is how
/// value axes map larger values upwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(
        domain_start: f64,
        domain_end: f64,
        range_start: f64,
        range_end: f64,
    ) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    /// Builds a scale over `values`, widening degenerate domains so a single
    /// value still maps to the middle of the range.
    pub fn fit(
        values: impl IntoIterator<Item = f64>,
        range_start: f64,
        range_end: f64,
    ) -> ChartResult<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values.into_iter().filter(|value| value.is_finite()) {
            min = min.min(value);
            max = max.max(value);
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(ChartError::InvalidData(
                "cannot fit a scale without finite values".to_owned(),
            ));
        }
        if min == max {
            let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.5 };
            min -= pad;
            max += pad;
        }
        Self::new(min, max, range_start, range_end)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    pub fn domain_to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }

    pub fn pixel_to_domain(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return Err(ChartError::InvalidData(
                "cannot invert a zero-width range".to_owned(),
            ));
        }

        let normalized = (pixel - self.range_start) / span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}

/// Discrete mapping of `count` categories onto equal-width bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    range_start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// `padding` is the fraction of each step left empty between bands.
    pub fn new(count: usize, range_start: f64, range_end: f64, padding: f64) -> ChartResult<Self> {
        if count == 0 {
            return Err(ChartError::InvalidData(
                "band scale needs at least one category".to_owned(),
            ));
        }
        if !(0.0..1.0).contains(&padding) {
            return Err(ChartError::InvalidData(
                "band padding must be in [0, 1)".to_owned(),
            ));
        }
        let step = (range_end - range_start) / count as f64;
        if !step.is_finite() || step <= 0.0 {
            return Err(ChartError::InvalidData(
                "band scale range must be increasing".to_owned(),
            ));
        }

        Ok(Self {
            count,
            range_start,
            step,
            bandwidth: step * (1.0 - padding),
        })
    }

    #[must_use]
    pub fn bandwidth(self) -> f64 {
        self.bandwidth
    }

    /// Left edge of band `index`.
    pub fn band_start(self, index: usize) -> ChartResult<f64> {
        if index >= self.count {
            return Err(ChartError::InvalidData(format!(
                "band index {index} out of range for {} categories",
                self.count
            )));
        }
        Ok(self.range_start + index as f64 * self.step + (self.step - self.bandwidth) / 2.0)
    }
}

/// Discrete mapping of `count` categories onto evenly spaced points,
/// first and last points on the range edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointScale {
    count: usize,
    range_start: f64,
    range_end: f64,
}

impl PointScale {
    pub fn new(count: usize, range_start: f64, range_end: f64) -> ChartResult<Self> {
        if count == 0 {
            return Err(ChartError::InvalidData(
                "point scale needs at least one category".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "point scale range must be finite".to_owned(),
            ));
        }
        Ok(Self {
            count,
            range_start,
            range_end,
        })
    }

    pub fn position(self, index: usize) -> ChartResult<f64> {
        if index >= self.count {
            return Err(ChartError::InvalidData(format!(
                "point index {index} out of range for {} categories",
                self.count
            )));
        }
        if self.count == 1 {
            return Ok((self.range_start + self.range_end) / 2.0);
        }
        let step = (self.range_end - self.range_start) / (self.count - 1) as f64;
        Ok(self.range_start + index as f64 * step)
    }
}

#[cfg(test)]
mod tests {
    use super::{BandScale, LinearScale, PointScale};

    #[test]
    fn fit_widens_single_value_domain() {
        let scale = LinearScale::fit([5.0], 0.0, 100.0).expect("fit");
        let px = scale.domain_to_pixel(5.0).expect("pixel");
        assert!((px - 50.0).abs() <= 1e-9);
    }

    #[test]
    fn band_scale_centers_padding() {
        let scale = BandScale::new(4, 0.0, 400.0, 0.2).expect("band");
        assert!((scale.bandwidth() - 80.0).abs() <= 1e-9);
        assert!((scale.band_start(0).expect("start") - 10.0).abs() <= 1e-9);
        assert!(scale.band_start(4).is_err());
    }

    #[test]
    fn single_point_scale_is_centered() {
        let scale = PointScale::new(1, 40.0, 560.0).expect("point");
        assert_eq!(scale.position(0).expect("pos"), 300.0);
    }
}
