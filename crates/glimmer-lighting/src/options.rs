use serde::Deserialize;

/// Lighting configuration. Missing fields in a deserialized table fall back
/// to [`LightingOptions::default`].
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightingOptions {
    /// Emission rounds; the first emits from registered lights, later ones
    /// from reflecting cells. 0 computes nothing.
    pub passes: u32,
    /// A reflecting cell emits in the next pass only when its channel sum is
    /// strictly greater than this.
    pub emission_threshold: f64,
    /// FOV radius and linear attenuation distance.
    pub range: i32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            passes: 1,
            emission_threshold: 100.0,
            range: 10,
        }
    }
}

impl LightingOptions {
    pub fn with_passes(mut self, passes: u32) -> Self {
        self.passes = passes;
        self
    }

    pub fn with_emission_threshold(mut self, threshold: f64) -> Self {
        self.emission_threshold = threshold;
        self
    }

    pub fn with_range(mut self, range: i32) -> Self {
        self.range = range;
        self
    }
}
