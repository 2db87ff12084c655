//! Place-name geocoding and the geographic pivot of mean values.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::analyzers::types::{GridCell, LocatedRecord};
use crate::analyzers::utility::MeanAccumulator;
use crate::error::Result;
use crate::record::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Maps place names to coordinates.
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "Southeast Queens": { "lat": 40.676, "lon": -73.756 },
///   "Rockaways": { "lat": 40.586, "lon": -73.811 }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoordinateMap {
    entries: HashMap<String, Coordinates>,
}

impl CoordinateMap {
    /// Loads the map from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let entries: HashMap<String, Coordinates> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    pub fn insert(&mut self, place_name: &str, lat: f64, lon: f64) {
        self.entries
            .insert(place_name.to_string(), Coordinates { lat, lon });
    }

    pub fn get(&self, place_name: &str) -> Option<Coordinates> {
        self.entries.get(place_name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Joins each record with the coordinates of its place.
///
/// Records whose place is not in `coordinates` are left out.
pub fn attach_coordinates(data: &Dataset, coordinates: &CoordinateMap) -> Vec<LocatedRecord> {
    data.records
        .iter()
        .filter_map(|r| {
            let c = coordinates.get(&r.place_name)?;
            Some(LocatedRecord {
                category: r.category.clone(),
                start_date: r.start_date,
                value: r.value,
                place_name: r.place_name.clone(),
                place_id: r.place_id.clone(),
                latitude: c.lat,
                longitude: c.lon,
            })
        })
        .collect()
}

/// Mean value per distinct (latitude, longitude), sorted by latitude then longitude.
pub fn coordinate_grid(located: &[LocatedRecord]) -> Vec<GridCell> {
    // f64 is not Hash; key on the bit patterns instead
    let mut cells: HashMap<(u64, u64), MeanAccumulator> = HashMap::new();
    for r in located {
        cells
            .entry((r.latitude.to_bits(), r.longitude.to_bits()))
            .or_default()
            .add(r.value);
    }

    let mut grid: Vec<GridCell> = cells
        .into_iter()
        .filter_map(|((lat, lon), acc)| {
            Some(GridCell {
                latitude: f64::from_bits(lat),
                longitude: f64::from_bits(lon),
                mean: acc.mean()?,
                count: acc.count(),
            })
        })
        .collect();

    grid.sort_by(|a, b| {
        a.latitude
            .total_cmp(&b.latitude)
            .then(a.longitude.total_cmp(&b.longitude))
    });
    grid
}
