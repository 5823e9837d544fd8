use std::fmt;

/// Largest value a 16-bit channel can hold.
pub const CHANNEL_MAX: i64 = 65535;

/// Handle into the centroid arena owned by a single clustering run.
///
/// Samples never own a centroid, they only remember where their current one
/// lives so it can be looked up and diffed during reassignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CentroidId(pub(crate) usize);

impl CentroidId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One input pixel: a raw 16-bit RGB vector plus its colorfulness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    rgb: [u16; 3],
    spread: i64,
    pub(crate) centroid: Option<CentroidId>,
}

impl Sample {
    /// Build a sample from 16-bit channels.
    ///
    /// `spread` is the largest channel minus the average of the other two,
    /// or 0 when no channel is strictly larger than both others.
    pub fn from_rgb16(rgb: [u16; 3]) -> Self {
        let [r, g, b] = rgb.map(i64::from);
        let spread = if r > g && r > b {
            r - (g + b) / 2
        } else if g > r && g > b {
            g - (r + b) / 2
        } else if b > r && b > g {
            b - (r + g) / 2
        } else {
            0
        };

        Self {
            rgb,
            spread,
            centroid: None,
        }
    }

    pub fn rgb(&self) -> [u16; 3] {
        self.rgb
    }

    /// Channels widened for centroid arithmetic.
    #[inline(always)]
    pub fn channels(&self) -> [i64; 3] {
        self.rgb.map(i64::from)
    }

    pub fn spread(&self) -> i64 {
        self.spread
    }

    /// The centroid this sample currently belongs to, if any.
    pub fn centroid(&self) -> Option<CentroidId> {
        self.centroid
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb;
        write!(f, "Color: {{{r}, {g}, {b}}} Center: ")?;
        match self.centroid {
            Some(id) => write!(f, "#{}", id.index()),
            None => f.write_str("nil"),
        }
    }
}

/// Running mean of a cluster, updated one sample at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Centroid {
    pub(crate) id: CentroidId,
    pub(crate) mean: [i64; 3],
    pub(crate) members: usize,
    /// Max channel minus min channel; only filled in while brightening.
    pub(crate) color_spread: i64,
}

impl Centroid {
    /// A centroid seeded from one sample, counting it as its first member.
    pub(crate) fn seeded(id: CentroidId, sample: &Sample) -> Self {
        Self {
            id,
            mean: sample.channels(),
            members: 1,
            color_spread: 0,
        }
    }

    pub fn id(&self) -> CentroidId {
        self.id
    }

    pub fn mean(&self) -> [i64; 3] {
        self.mean
    }

    pub fn members(&self) -> usize {
        self.members
    }

    pub fn color_spread(&self) -> i64 {
        self.color_spread
    }

    /// Mean rescaled from 16-bit to 8-bit channels.
    pub fn rgb8(&self) -> [u8; 3] {
        self.mean
            .map(|c| (c.clamp(0, CHANNEL_MAX) * 255 / CHANNEL_MAX) as u8)
    }
}

impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb8();
        write!(f, "{{({r}, {g}, {b}) Members: {}}}", self.members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_uses_strict_maximum() {
        assert_eq!(Sample::from_rgb16([1000, 200, 400]).spread(), 700);
        assert_eq!(Sample::from_rgb16([200, 1000, 401]).spread(), 1000 - 300);
        assert_eq!(Sample::from_rgb16([0, 0, 65535]).spread(), 65535);
    }

    #[test]
    fn spread_is_zero_without_strict_maximum() {
        assert_eq!(Sample::from_rgb16([500, 500, 10]).spread(), 0);
        assert_eq!(Sample::from_rgb16([7, 7, 7]).spread(), 0);
    }

    #[test]
    fn fresh_sample_has_no_centroid() {
        let sample = Sample::from_rgb16([1, 2, 3]);
        assert_eq!(sample.centroid(), None);
        assert_eq!(sample.to_string(), "Color: {1, 2, 3} Center: nil");
    }

    #[test]
    fn centroid_display_uses_eight_bit_channels() {
        let sample = Sample::from_rgb16([65535, 0, 32768]);
        let centroid = Centroid::seeded(CentroidId(0), &sample);
        assert_eq!(centroid.rgb8(), [255, 0, 127]);
        assert_eq!(centroid.to_string(), "{(255, 0, 127) Members: 1}");
    }
}
