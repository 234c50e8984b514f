use aquaview_schemas::settings::{
    AlertThresholdsPatch, BandPatch, CeilingPatch, FloorPatch, SettingsPatch, TempUnit, Units,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// AquaView: simulated aquaculture water-quality monitoring in the terminal.
#[derive(Debug, Parser)]
#[command(name = "aquaview", version, about)]
pub struct Cli {
    /// Path of the persisted settings blob.
    #[arg(long, global = true, default_value = "aquaview_settings.json")]
    pub settings: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the live dashboard until Ctrl-C (or a tick limit).
    Run {
        /// Stop after this many rendered ticks.
        #[arg(long)]
        ticks: Option<u64>,

        /// Seed the sample generator for a reproducible run.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Ask the analyst for a structured verdict on the current reading.
    Analyze(AnalystArgs),
    /// Ask the analyst for a full markdown report over recent history.
    Report(AnalystArgs),
    /// Show or edit the persisted settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Export the history window. Mocked: logs the request, writes nothing.
    Export {
        #[arg(value_enum)]
        format: ExportFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the effective settings as JSON.
    Show,
    /// Edit thresholds, units or the refresh interval; persists immediately.
    Set(SetArgs),
}

/// Threshold/unit edits. Only the flags given are applied; everything else
/// keeps its current value.
#[derive(Debug, Default, Args)]
pub struct SetArgs {
    /// Temperature display unit.
    #[arg(long, value_enum)]
    pub temp_unit: Option<TempUnitArg>,

    /// Tick period in milliseconds (minimum 500).
    #[arg(long)]
    pub refresh_interval: Option<u64>,

    #[arg(long)]
    pub temp_min: Option<f64>,
    #[arg(long)]
    pub temp_max: Option<f64>,
    #[arg(long)]
    pub ph_min: Option<f64>,
    #[arg(long)]
    pub ph_max: Option<f64>,
    #[arg(long)]
    pub turbidity_max: Option<f64>,
    /// Dissolved oxygen floor in mg/L.
    #[arg(long)]
    pub do_min: Option<f64>,
    #[arg(long)]
    pub lead_max: Option<f64>,
    #[arg(long)]
    pub copper_max: Option<f64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TempUnitArg {
    C,
    F,
}

impl From<TempUnitArg> for TempUnit {
    fn from(unit: TempUnitArg) -> Self {
        match unit {
            TempUnitArg::C => TempUnit::C,
            TempUnitArg::F => TempUnit::F,
        }
    }
}

impl SetArgs {
    /// Build the sparse patch these flags describe.
    pub fn to_patch(&self) -> SettingsPatch {
        let band = |min: Option<f64>, max: Option<f64>| {
            (min.is_some() || max.is_some()).then_some(BandPatch { min, max })
        };
        let alerts = AlertThresholdsPatch {
            temp: band(self.temp_min, self.temp_max),
            ph: band(self.ph_min, self.ph_max),
            turbidity: self.turbidity_max.map(|max| CeilingPatch { max: Some(max) }),
            dissolved_oxygen: self.do_min.map(|min| FloorPatch { min: Some(min) }),
            lead: self.lead_max.map(|max| CeilingPatch { max: Some(max) }),
            copper: self.copper_max.map(|max| CeilingPatch { max: Some(max) }),
        };
        let any_alert = alerts.temp.is_some()
            || alerts.ph.is_some()
            || alerts.turbidity.is_some()
            || alerts.dissolved_oxygen.is_some()
            || alerts.lead.is_some()
            || alerts.copper.is_some();

        SettingsPatch {
            units: self.temp_unit.map(|unit| Units { temp: unit.into() }),
            alerts: any_alert.then_some(alerts),
            refresh_interval_ms: self.refresh_interval,
        }
    }
}


/// Connection settings for the hosted LLM analyst.
#[derive(Debug, Args)]
pub struct AnalystArgs {
    #[arg(long, env = "AQUAVIEW_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, default_value = "claude-3-5-haiku-20241022")]
    pub model: String,

    #[arg(long, default_value = "https://api.anthropic.com/v1/messages")]
    pub endpoint: String,

    #[arg(long, default_value_t = 1024)]
    pub max_tokens: u32,

    /// Request timeout in seconds. Analyst calls must never hang the
    /// dashboard, so a timeout is always enforced.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}
