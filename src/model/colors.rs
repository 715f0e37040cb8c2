use std::collections::BTreeMap;

use serde::Serialize;

/// Gene color used until (unless) a gene turns out to be population-specific.
pub const DEFAULT_GENE_COLOR: &str = "grey";

// Cubehelix basis (Green 2011).
const CH_A: f64 = -0.14861;
const CH_B: f64 = 1.78277;
const CH_C: f64 = -0.29227;
const CH_D: f64 = -0.90649;
const CH_E: f64 = 1.97294;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Cubehelix color (hue in degrees) to 8-bit RGB.
pub fn cubehelix_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = (hue + 120.0).to_radians();
    let l = lightness;
    let a = saturation * l * (1.0 - l);
    let (sinh, cosh) = h.sin_cos();
    let channel = |v: f64| (255.0 * v).round().clamp(0.0, 255.0) as u8;
    Rgb {
        r: channel(l + a * (CH_A * cosh + CH_B * sinh)),
        g: channel(l + a * (CH_C * cosh + CH_D * sinh)),
        b: channel(l + a * (CH_E * cosh)),
    }
}

/// Cyclical rainbow over `t` in [0, 1): a full hue turn with saturation and
/// lightness peaking at `t = 0.5`.
pub fn rainbow(t: f64) -> Rgb {
    let t = if (0.0..=1.0).contains(&t) {
        t
    } else {
        t - t.floor()
    };
    let ts = (t - 0.5).abs();
    cubehelix_to_rgb(360.0 * t - 100.0, 1.5 - 1.5 * ts, 0.8 - 0.9 * ts)
}

/// `count` evenly spaced hues; entry `i` sits at `t = i / count`.
pub fn palette(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| rainbow(i as f64 / count as f64).css())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColorMaps {
    #[serde(rename = "populationColor")]
    pub population: BTreeMap<String, String>,
    #[serde(rename = "geneColor")]
    pub gene: BTreeMap<String, String>,
    /// Population each gene is specific to; `None` for genes left at the default color.
    #[serde(skip)]
    pub owner: BTreeMap<String, Option<String>>,
}

impl ColorMaps {
    pub fn population_color(&self, name: &str) -> Option<&str> {
        self.population.get(name).map(String::as_str)
    }

    pub fn gene_color(&self, gene: &str) -> Option<&str> {
        self.gene.get(gene).map(String::as_str)
    }

    pub fn gene_owner(&self, gene: &str) -> Option<&str> {
        self.owner.get(gene).and_then(Option::as_deref)
    }

    pub fn colored_gene_count(&self) -> usize {
        self.gene
            .values()
            .filter(|c| c.as_str() != DEFAULT_GENE_COLOR)
            .count()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/colors.rs"]
mod tests;
