use image::Rgb;

/// Logarithmic normalization of bin counts onto `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNorm {
    vmin: f64,
    vmax: f64,
}

impl LogNorm {
    /// Norm over `[vmin, vmax]`; both are clamped to at least 1
    pub fn new(vmin: f64, vmax: f64) -> Self {
        let vmin = vmin.max(1.0);
        Self {
            vmin,
            vmax: vmax.max(vmin),
        }
    }

    /// Norm spanning the given bin counts, or 1..10 when there are none
    pub fn from_counts(range: Option<(u32, u32)>) -> Self {
        match range {
            Some((min, max)) => Self::new(min as f64, max as f64),
            None => Self::new(1.0, 10.0),
        }
    }

    /// Lower bound
    pub fn vmin(&self) -> f64 {
        self.vmin
    }

    /// Upper bound
    pub fn vmax(&self) -> f64 {
        self.vmax
    }

    /// Position of `value` on the scale, clamped to `[0, 1]`
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.vmax.ln() - self.vmin.ln();
        if span <= 0.0 {
            return 0.0;
        }
        ((value.max(self.vmin).ln() - self.vmin.ln()) / span).clamp(0.0, 1.0)
    }

    /// Powers of ten inside the range, each with its position on the scale.
    ///
    /// Falls back to the range ends when no decade boundary lies inside.
    pub fn ticks(&self) -> Vec<(f64, f64)> {
        let lo = self.vmin.log10().ceil() as i32;
        let hi = self.vmax.log10().floor() as i32;

        let mut ticks: Vec<(f64, f64)> = (lo..=hi)
            .map(|k| {
                let v = 10f64.powi(k);
                (v, self.normalize(v))
            })
            .collect();

        if ticks.is_empty() {
            ticks.push((self.vmin, self.normalize(self.vmin)));
            if self.vmax > self.vmin {
                ticks.push((self.vmax, self.normalize(self.vmax)));
            }
        }
        ticks
    }
}

/// Label for a count tick: plain integers up to 1000, `1e4` style above
pub fn tick_label(value: f64) -> String {
    let exponent = value.log10();
    if value >= 10_000.0 && (exponent - exponent.round()).abs() < 1e-9 {
        format!("1e{}", exponent.round() as i32)
    } else {
        format!("{}", value.round() as u64)
    }
}

/// The classic "jet" colormap (blue → cyan → yellow → red)
pub fn jet(t: f64) -> Rgb<u8> {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let channel = |offset: f64| {
        let v = (1.5 - (4.0 * t - offset).abs()).clamp(0.0, 1.0);
        (v * 255.0).round() as u8
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}
