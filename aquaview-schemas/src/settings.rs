use serde::{Deserialize, Serialize};

/// Lower bound for the simulation tick period.
pub const MIN_REFRESH_INTERVAL_MS: u64 = 500;

/// Temperature display unit preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempUnit {
    C,
    F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Units {
    pub temp: TempUnit,
}

/// A parameter alerting when the reading leaves a [min, max] band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThreshold {
    pub min: f64,
    pub max: f64,
}

/// A parameter alerting when the reading exceeds a ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CeilingThreshold {
    pub max: f64,
}

/// A parameter alerting when the reading falls below a floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorThreshold {
    pub min: f64,
}

/// Per-parameter alert bounds. Values are trusted as entered: a band with
/// min > max is accepted and simply alerts on everything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub temp: BandThreshold,
    pub ph: BandThreshold,
    pub turbidity: CeilingThreshold,
    #[serde(rename = "do")]
    pub dissolved_oxygen: FloorThreshold,
    pub lead: CeilingThreshold,
    pub copper: CeilingThreshold,
}

/// User-tunable monitor configuration, persisted as a single JSON blob.
///
/// The serialized field names (`refreshInterval`, the `do` threshold key)
/// match the blob layout the dashboard has always written, so an existing
/// settings file keeps loading across versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub units: Units,
    pub alerts: AlertThresholds,
    #[serde(rename = "refreshInterval")]
    pub refresh_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            units: Units { temp: TempUnit::C },
            alerts: AlertThresholds {
                temp: BandThreshold { min: 10.0, max: 35.0 },
                ph: BandThreshold { min: 6.5, max: 8.5 },
                turbidity: CeilingThreshold { max: 50.0 },
                dissolved_oxygen: FloorThreshold { min: 4.0 },
                lead: CeilingThreshold { max: 0.015 },
                copper: CeilingThreshold { max: 1.3 },
            },
            refresh_interval_ms: 3000,
        }
    }
}

/// Partial update for a band threshold; `None` fields keep their value.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BandPatch {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CeilingPatch {
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FloorPatch {
    pub min: Option<f64>,
}

/// Partial update for the alert table, merged parameter by parameter so that
/// editing one threshold never erases its neighbours.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AlertThresholdsPatch {
    pub temp: Option<BandPatch>,
    pub ph: Option<BandPatch>,
    pub turbidity: Option<CeilingPatch>,
    #[serde(rename = "do")]
    pub dissolved_oxygen: Option<FloorPatch>,
    pub lead: Option<CeilingPatch>,
    pub copper: Option<CeilingPatch>,
}

/// Partial settings update as produced by the settings editor.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SettingsPatch {
    pub units: Option<Units>,
    pub alerts: Option<AlertThresholdsPatch>,
    #[serde(rename = "refreshInterval")]
    pub refresh_interval_ms: Option<u64>,
}

impl BandThreshold {
    pub fn apply(&mut self, patch: BandPatch) {
        if let Some(min) = patch.min {
            self.min = min;
        }
        if let Some(max) = patch.max {
            self.max = max;
        }
    }
}

impl CeilingThreshold {
    pub fn apply(&mut self, patch: CeilingPatch) {
        if let Some(max) = patch.max {
            self.max = max;
        }
    }
}

impl FloorThreshold {
    pub fn apply(&mut self, patch: FloorPatch) {
        if let Some(min) = patch.min {
            self.min = min;
        }
    }
}

impl AlertThresholds {
    /// Merge a patch key by key. Untouched parameters keep their bounds.
    pub fn apply(&mut self, patch: AlertThresholdsPatch) {
        if let Some(p) = patch.temp {
            self.temp.apply(p);
        }
        if let Some(p) = patch.ph {
            self.ph.apply(p);
        }
        if let Some(p) = patch.turbidity {
            self.turbidity.apply(p);
        }
        if let Some(p) = patch.dissolved_oxygen {
            self.dissolved_oxygen.apply(p);
        }
        if let Some(p) = patch.lead {
            self.lead.apply(p);
        }
        if let Some(p) = patch.copper {
            self.copper.apply(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_seed_profile() {
        let s = Settings::default();
        assert_eq!(s.refresh_interval_ms, 3000);
        assert_eq!(s.alerts.dissolved_oxygen.min, 4.0);
        assert_eq!(s.alerts.lead.max, 0.015);
        assert_eq!(s.units.temp, TempUnit::C);
    }

    #[test]
    fn blob_layout_is_stable() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["refreshInterval"], 3000);
        assert_eq!(json["alerts"]["do"]["min"], 4.0);
        assert_eq!(json["units"]["temp"], "C");
    }

    #[test]
    fn band_patch_leaves_other_bound_alone() {
        let mut band = BandThreshold { min: 10.0, max: 35.0 };
        band.apply(BandPatch { min: Some(5.0), max: None });
        assert_eq!(band.min, 5.0);
        assert_eq!(band.max, 35.0);
    }
}
