//! Coordinate scales between normalized depth / row index and pixels

/// Linear map from a numeric domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    /// Depth scale: `[0, 1]` onto `[left, right]`
    pub fn unit(left: f32, right: f32) -> Self {
        Self::new((0.0, 1.0), (left, right))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    /// Domain value to pixel (not clamped)
    pub fn map(&self, value: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        let t = (value - d0) / (d1 - d0);
        (r0 as f64 + t * (r1 - r0) as f64) as f32
    }

    /// Pixel to domain value (not clamped)
    pub fn invert(&self, pixel: f32) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        let t = (pixel - r0) as f64 / (r1 - r0) as f64;
        d0 + t * (d1 - d0)
    }

    /// Pixel length of a domain span
    pub fn span(&self, length: f64) -> f32 {
        self.map(length) - self.map(0.0)
    }
}

/// Discrete band scale: `count` equal bands over a pixel range
///
/// `padding` is used for both inner and outer padding, as a fraction of the
/// step; bands are centred in the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    start: f32,
    step: f32,
    bandwidth: f32,
}

impl BandScale {
    pub fn new(count: usize, range: (f32, f32), padding: f32) -> Self {
        let (r0, r1) = if range.1 < range.0 {
            (range.1, range.0)
        } else {
            range
        };
        let inner = padding.clamp(0.0, 1.0);
        let outer = padding.max(0.0);
        let n = count as f32;

        let step = (r1 - r0) / (n - inner + outer * 2.0).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - inner)) * 0.5;
        Self {
            count,
            start,
            step,
            bandwidth: step * (1.0 - inner),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Distance between the starts of consecutive bands
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Height of each band
    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }

    /// Start of band `index`, or `None` outside the domain
    pub fn position(&self, index: usize) -> Option<f32> {
        (index < self.count).then(|| self.start + self.step * index as f32)
    }

    /// Midpoint of the gap above band `index`
    pub fn gap_above(&self, index: usize) -> Option<f32> {
        self.position(index)
            .map(|y| y - (self.step - self.bandwidth) / 2.0)
    }

}
