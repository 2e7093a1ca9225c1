/// Color map names accepted by [`ColorMap::from_name`]. Any of them may
/// carry an `_r` suffix for the reversed map.
pub const COLOR_MAP_NAMES: &[&str] = &[
    "gray", "bone", "hot", "jet", "viridis", "coolwarm", "blues", "reds",
];

/// A color map for mapping scalar values to colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    name: String,
    stops: Vec<(f32, [f32; 3])>,
    darken: f32,
}

impl ColorMap {
    /// Creates a color map from stops sorted by position.
    pub fn new(name: impl Into<String>, stops: Vec<(f32, [f32; 3])>) -> Self {
        Self {
            name: name.into(),
            stops,
            darken: 0.0,
        }
    }

    /// Creates a color map from colors evenly spaced over [0, 1].
    pub fn uniform(name: impl Into<String>, colors: &[[f32; 3]]) -> Self {
        let n = colors.len().saturating_sub(1).max(1) as f32;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as f32 / n, c))
            .collect();
        Self::new(name, stops)
    }

    /// Look a map up by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if let Some(base) = lower.strip_suffix("_r") {
            return Self::builtin(base).map(|map| map.reversed());
        }
        Self::builtin(&lower)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same map with every channel lowered by `amount` and clamped to [0, 1].
    pub fn darkened(&self, amount: f32) -> Self {
        Self {
            name: format!("{}_dark", self.name),
            stops: self.stops.clone(),
            darken: self.darken + amount,
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            name: format!("{}_r", self.name),
            stops: self
                .stops
                .iter()
                .rev()
                .map(|&(t, c)| (1.0 - t, c))
                .collect(),
            darken: self.darken,
        }
    }

    /// Samples the color map at a given value (0 to 1).
    pub fn sample(&self, t: f32) -> [f32; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let color = match self.stops.as_slice() {
            [] => [0.0; 3],
            [(_, only)] => *only,
            stops => {
                let upper = stops
                    .iter()
                    .position(|&(pos, _)| pos >= t)
                    .unwrap_or(stops.len() - 1)
                    .max(1);
                let (t0, c0) = stops[upper - 1];
                let (t1, c1) = stops[upper];
                let frac = if t1 > t0 {
                    ((t - t0) / (t1 - t0)).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                std::array::from_fn(|i| c0[i] + (c1[i] - c0[i]) * frac)
            }
        };

        color.map(|c| (c - self.darken).clamp(0.0, 1.0))
    }

    fn builtin(name: &str) -> Option<Self> {
        let map = match name {
            "gray" | "grey" => Self::uniform("gray", &[[0.0; 3], [1.0; 3]]),
            "bone" => Self::new(
                "bone",
                vec![
                    (0.0, [0.0, 0.0, 0.0]),
                    (0.365_079, [0.319_444, 0.319_444, 0.444_444]),
                    (0.746_032, [0.652_778, 0.777_778, 0.777_778]),
                    (1.0, [1.0, 1.0, 1.0]),
                ],
            ),
            "hot" => Self::new(
                "hot",
                vec![
                    (0.0, [0.041_6, 0.0, 0.0]),
                    (0.365_079, [1.0, 0.0, 0.0]),
                    (0.746_032, [1.0, 1.0, 0.0]),
                    (1.0, [1.0, 1.0, 1.0]),
                ],
            ),
            "jet" => Self::new(
                "jet",
                vec![
                    (0.0, [0.0, 0.0, 0.5]),
                    (0.11, [0.0, 0.0, 1.0]),
                    (0.125, [0.0, 0.0, 1.0]),
                    (0.34, [0.0, 0.86, 1.0]),
                    (0.35, [0.0, 0.9, 0.967_742]),
                    (0.375, [0.080_645, 1.0, 0.887_097]),
                    (0.64, [0.935_484, 1.0, 0.032_258]),
                    (0.65, [0.967_742, 0.962_963, 0.0]),
                    (0.66, [1.0, 0.925_926, 0.0]),
                    (0.89, [1.0, 0.074_074, 0.0]),
                    (0.91, [0.909_091, 0.0, 0.0]),
                    (1.0, [0.5, 0.0, 0.0]),
                ],
            ),
            "viridis" => Self::uniform(
                "viridis",
                &[
                    [0.267, 0.004, 0.329],
                    [0.282, 0.140, 0.457],
                    [0.253, 0.265, 0.529],
                    [0.206, 0.371, 0.553],
                    [0.163, 0.471, 0.558],
                    [0.127, 0.566, 0.550],
                    [0.134, 0.658, 0.517],
                    [0.266, 0.749, 0.440],
                    [0.477, 0.821, 0.318],
                    [0.741, 0.873, 0.150],
                    [0.993, 0.906, 0.144],
                ],
            ),
            "coolwarm" => Self::uniform(
                "coolwarm",
                &[
                    [0.230, 0.299, 0.754],
                    [0.552, 0.690, 0.996],
                    [0.866, 0.866, 0.866],
                    [0.956, 0.604, 0.486],
                    [0.706, 0.016, 0.150],
                ],
            ),
            "blues" => Self::uniform(
                "blues",
                &[
                    [0.969, 0.984, 1.000],
                    [0.871, 0.922, 0.969],
                    [0.776, 0.859, 0.937],
                    [0.620, 0.792, 0.882],
                    [0.419, 0.682, 0.839],
                    [0.259, 0.573, 0.776],
                    [0.129, 0.443, 0.710],
                    [0.031, 0.318, 0.612],
                    [0.031, 0.188, 0.420],
                ],
            ),
            "reds" => Self::uniform(
                "reds",
                &[
                    [1.000, 0.961, 0.941],
                    [0.996, 0.878, 0.824],
                    [0.988, 0.733, 0.631],
                    [0.988, 0.573, 0.447],
                    [0.984, 0.416, 0.290],
                    [0.937, 0.231, 0.173],
                    [0.796, 0.094, 0.114],
                    [0.647, 0.059, 0.082],
                    [0.404, 0.000, 0.051],
                ],
            ),
            _ => return None,
        };
        Some(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn every_listed_name_resolves() {
        for name in COLOR_MAP_NAMES {
            assert!(ColorMap::from_name(name).is_some(), "{name}");
            assert!(ColorMap::from_name(&format!("{name}_r")).is_some(), "{name}_r");
        }
        assert!(ColorMap::from_name("Bone").is_some());
        assert!(ColorMap::from_name("plasma-ish").is_none());
    }

    #[test]
    fn gray_is_linear() {
        let gray = ColorMap::from_name("gray").unwrap();
        assert!(close(gray.sample(0.25), [0.25; 3]));
        assert!(close(gray.sample(-1.0), [0.0; 3]));
        assert!(close(gray.sample(2.0), [1.0; 3]));
        assert!(close(gray.sample(f32::NAN), [0.0; 3]));
    }

    #[test]
    fn bone_hits_its_breakpoints() {
        let bone = ColorMap::from_name("bone").unwrap();
        assert!(close(bone.sample(0.0), [0.0; 3]));
        assert!(close(bone.sample(0.746_032), [0.652_778, 0.777_778, 0.777_778]));
        assert!(close(bone.sample(1.0), [1.0; 3]));
    }

    #[test]
    fn jet_runs_blue_to_red() {
        let jet = ColorMap::from_name("jet").unwrap();
        assert!(close(jet.sample(0.0), [0.0, 0.0, 0.5]));
        assert!(close(jet.sample(0.5), [0.483_871, 1.0, 0.483_871]));
        assert!(close(jet.sample(1.0), [0.5, 0.0, 0.0]));
    }

    #[test]
    fn darkened_subtracts_and_clamps() {
        let jet = ColorMap::from_name("jet").unwrap();
        let dark = jet.darkened(0.4);
        assert!(close(dark.sample(0.0), [0.0, 0.0, 0.1]));
        assert!(close(dark.sample(1.0), [0.1, 0.0, 0.0]));
    }

    #[test]
    fn reversed_flips_the_domain() {
        let gray = ColorMap::from_name("gray_r").unwrap();
        assert_eq!(gray.name(), "gray_r");
        assert!(close(gray.sample(0.0), [1.0; 3]));
        assert!(close(gray.sample(0.75), [0.25; 3]));
    }
}
