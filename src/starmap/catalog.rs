//! Star catalog
//!
//! Loaded once at startup and shared read-only by the views that need it.
//! File format:
//!
//! ```json
//! { "version": 1, "source": "...", "count": 2,
//!   "stars": [ { "id": 0, "name": "Sol", "x": 0.0, "y": 0.0, "z": 0.0,
//!                "dist_ly": 0.0, "vmag": -26.74, "spectral": "G2V" } ] }
//! ```

use std::cmp::Ordering;
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::projection::to_galactocentric;
use crate::assets::sprite_ids;
use crate::render::color::Color;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read star catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed star catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Catalog versions appear both as numbers and strings in the wild
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogVersion {
    Number(u64),
    Text(String),
}

impl Default for CatalogVersion {
    fn default() -> Self {
        CatalogVersion::Number(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub id: u32,
    pub name: String,
    /// Cartesian position in light-years
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub dist_ly: f64,
    /// Apparent visual magnitude
    pub vmag: f64,
    /// Spectral type, e.g. "G2V"
    pub spectral: String,
}

impl Star {
    #[inline]
    pub fn position(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Leading spectral class letter (O, B, A, F, G, K, M); unknown maps to 'G'
    pub fn spectral_class(&self) -> char {
        self.spectral
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .filter(|c| "OBAFGKM".contains(*c))
            .unwrap_or('G')
    }

    pub fn sprite_id(&self) -> u32 {
        match self.spectral_class() {
            'O' => sprite_ids::STAR_O,
            'B' => sprite_ids::STAR_B,
            'A' => sprite_ids::STAR_A,
            'F' => sprite_ids::STAR_F,
            'K' => sprite_ids::STAR_K,
            'M' => sprite_ids::STAR_M,
            _ => sprite_ids::STAR_G,
        }
    }

    /// Sprite scale: brighter (lower magnitude) stars draw larger
    pub fn display_scale(&self) -> f32 {
        (1.6 - 0.15 * self.vmag as f32).clamp(0.4, 2.5)
    }

    pub fn color(&self) -> Color {
        match self.spectral_class() {
            'O' => Color::rgb(0.6, 0.7, 1.0),
            'B' => Color::rgb(0.7, 0.8, 1.0),
            'A' => Color::rgb(0.9, 0.9, 1.0),
            'F' => Color::rgb(1.0, 1.0, 0.9),
            'K' => Color::rgb(1.0, 0.8, 0.5),
            'M' => Color::rgb(1.0, 0.55, 0.4),
            _ => Color::rgb(1.0, 0.95, 0.7),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StarCatalog {
    #[serde(default)]
    pub version: CatalogVersion,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub count: usize,
    pub stars: Vec<Star>,
}

impl StarCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: StarCatalog = serde_json::from_str(json)?;
        if catalog.count != catalog.stars.len() {
            log::warn!(
                "Star catalog declares {} stars but contains {}",
                catalog.count,
                catalog.stars.len()
            );
        }
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} stars from {} ({})",
            catalog.stars.len(),
            path.display(),
            catalog.source
        );
        Ok(catalog)
    }

    /// The solar neighbourhood, built from catalog astrometry
    pub fn builtin() -> Self {
        // name, ra (deg), dec (deg), parallax (mas), vmag, spectral
        const NEIGHBOURS: [(&str, f64, f64, f64, f64, &str); 15] = [
            ("Alpha Centauri A", 219.90, -60.83, 747.10, -0.01, "G2V"),
            ("Proxima Centauri", 217.43, -62.68, 768.07, 11.13, "M5.5Ve"),
            ("Barnard's Star", 269.45, 4.69, 547.45, 9.51, "M4V"),
            ("Wolf 359", 164.12, 7.01, 415.20, 13.51, "M6V"),
            ("Lalande 21185", 165.83, 35.97, 392.64, 7.52, "M2V"),
            ("Sirius", 101.29, -16.72, 379.21, -1.46, "A1V"),
            ("Ross 154", 282.46, -23.84, 336.20, 10.44, "M3.5V"),
            ("Epsilon Eridani", 53.23, -9.46, 310.94, 3.73, "K2V"),
            ("Procyon", 114.83, 5.22, 284.56, 0.34, "F5IV"),
            ("61 Cygni A", 316.72, 38.75, 285.99, 5.21, "K5V"),
            ("Tau Ceti", 26.02, -15.94, 273.80, 3.50, "G8V"),
            ("Altair", 297.70, 8.87, 194.95, 0.76, "A7V"),
            ("Vega", 279.23, 38.78, 130.23, 0.03, "A0V"),
            ("Betelgeuse", 88.79, 7.41, 5.95, 0.42, "M1Ia"),
            ("Rigel", 78.63, -8.20, 3.78, 0.13, "B8Ia"),
        ];

        let mut stars = vec![Star {
            id: 0,
            name: "Sol".to_string(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            dist_ly: 0.0,
            vmag: -26.74,
            spectral: "G2V".to_string(),
        }];
        for (i, (name, ra, dec, parallax, vmag, spectral)) in NEIGHBOURS.iter().enumerate() {
            let p = to_galactocentric(*ra, *dec, *parallax);
            stars.push(Star {
                id: i as u32 + 1,
                name: name.to_string(),
                x: p.x,
                y: p.y,
                z: p.z,
                dist_ly: p.length(),
                vmag: *vmag,
                spectral: spectral.to_string(),
            });
        }

        Self {
            version: CatalogVersion::Number(1),
            source: "builtin".to_string(),
            count: stars.len(),
            stars,
        }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Star> {
        self.stars.iter().find(|s| s.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Star> {
        self.stars.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// The `n` stars closest to `from`, nearest first (ties broken by id)
    pub fn nearest(&self, from: DVec3, n: usize) -> Vec<&Star> {
        let mut stars = self.by_distance(from);
        stars.truncate(n);
        stars.into_iter().map(|(s, _)| s).collect()
    }

    /// Stars within `radius_ly` of `from`, nearest first
    pub fn within_radius(&self, from: DVec3, radius_ly: f64) -> Vec<&Star> {
        self.by_distance(from)
            .into_iter()
            .take_while(|(_, d)| *d <= radius_ly)
            .map(|(s, _)| s)
            .collect()
    }

    fn by_distance(&self, from: DVec3) -> Vec<(&Star, f64)> {
        let mut stars: Vec<(&Star, f64)> = self
            .stars
            .iter()
            .map(|s| (s, s.position().distance(from)))
            .collect();
        stars.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.id.cmp(&b.0.id))
        });
        stars
    }
}
