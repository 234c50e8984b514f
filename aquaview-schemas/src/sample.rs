use serde::{Deserialize, Serialize};
use std::fmt;

/// One synthetic water-quality observation.
///
/// Immutable once created: the generator builds a fresh `Sample` per tick and
/// nothing mutates it afterwards. Field units follow aquaculture convention
/// (°C, unitless pH, NTU, mg/L). The serialized shape keeps the historical
/// `do` key for dissolved oxygen so persisted data stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Observation instant, milliseconds since the Unix epoch.
    pub time: i64,
    pub temp: f64,
    pub ph: f64,
    pub turbidity: f64,
    #[serde(rename = "do")]
    pub dissolved_oxygen: f64,
    pub lead: f64,
    pub copper: f64,
}

impl Sample {
    /// Value of a single parameter, for generic rendering loops.
    pub fn value(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Temp => self.temp,
            Parameter::Ph => self.ph,
            Parameter::Turbidity => self.turbidity,
            Parameter::DissolvedOxygen => self.dissolved_oxygen,
            Parameter::Lead => self.lead,
            Parameter::Copper => self.copper,
        }
    }
}

/// The six monitored physical parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Temp,
    Ph,
    Turbidity,
    DissolvedOxygen,
    Lead,
    Copper,
}

impl Parameter {
    pub const ALL: [Parameter; 6] = [
        Parameter::Temp,
        Parameter::Ph,
        Parameter::Turbidity,
        Parameter::DissolvedOxygen,
        Parameter::Lead,
        Parameter::Copper,
    ];

    /// Display unit, empty for unitless parameters.
    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Temp => "°C",
            Parameter::Ph => "",
            Parameter::Turbidity => "NTU",
            Parameter::DissolvedOxygen | Parameter::Lead | Parameter::Copper => "mg/L",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Parameter::Temp => "Temperature",
            Parameter::Ph => "pH",
            Parameter::Turbidity => "Turbidity",
            Parameter::DissolvedOxygen => "Dissolved Oxygen",
            Parameter::Lead => "Lead",
            Parameter::Copper => "Copper",
        };
        f.write_str(name)
    }
}
