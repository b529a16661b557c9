//! Benchmark plan: which dates to roll back and how to measure them.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;

/// 1. change year, 2. same month, 3. change month,
/// 4. change month to February, 5. leap year.
pub const DEFAULT_DATES: [&str; 5] = ["1/1/2022", "15/1/2022", "4/2/2022", "5/3/2022", "14/3/2024"];

/// Upper bound for `forks` and `warmup_forks`.
pub const MAX_FORKS: u32 = 1_000;

fn default_name() -> String {
    "default".to_string()
}

fn default_dates() -> Vec<String> {
    DEFAULT_DATES.iter().map(|date| date.to_string()).collect()
}

fn default_days_before() -> i32 {
    14
}

fn default_seed() -> u64 {
    7
}

fn default_forks() -> u32 {
    2
}

fn default_warmup_forks() -> u32 {
    1
}

fn default_warmup_iterations() -> u32 {
    2
}

fn default_warmup_time_ms() -> u64 {
    3_000
}

fn default_measurement_iterations() -> u32 {
    3
}

fn default_measurement_time_ms() -> u64 {
    1_000
}

fn default_batch_size() -> u32 {
    1_024
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchPlan {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_dates")]
    pub dates: Vec<String>,
    #[serde(default = "default_days_before")]
    pub days_before: i32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub measurement: MeasurementConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementConfig {
    #[serde(default = "default_forks")]
    pub forks: u32,
    #[serde(default = "default_warmup_forks")]
    pub warmup_forks: u32,
    #[serde(default = "default_warmup_iterations")]
    pub warmup_iterations: u32,
    #[serde(default = "default_warmup_time_ms")]
    pub warmup_time_ms: u64,
    #[serde(default = "default_measurement_iterations")]
    pub measurement_iterations: u32,
    #[serde(default = "default_measurement_time_ms")]
    pub measurement_time_ms: u64,
    /// Calls between two clock reads.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for BenchPlan {
    fn default() -> Self {
        Self {
            name: default_name(),
            dates: default_dates(),
            days_before: default_days_before(),
            seed: default_seed(),
            measurement: MeasurementConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            forks: default_forks(),
            warmup_forks: default_warmup_forks(),
            warmup_iterations: default_warmup_iterations(),
            warmup_time_ms: default_warmup_time_ms(),
            measurement_iterations: default_measurement_iterations(),
            measurement_time_ms: default_measurement_time_ms(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl MeasurementConfig {
    pub fn warmup_time(&self) -> Duration {
        Duration::from_millis(self.warmup_time_ms)
    }

    pub fn measurement_time(&self) -> Duration {
        Duration::from_millis(self.measurement_time_ms)
    }
}

impl BenchPlan {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let plan: BenchPlan = serde_yaml::from_str(text).context("Failed to parse benchmark plan")?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml).with_context(|| format!("Failed to write plan {}", path.display()))?;
        Ok(())
    }

    /// Parses every configured date, failing on the first bad one.
    pub fn parsed_dates(&self) -> Result<Vec<CalendarDate>> {
        self.dates
            .iter()
            .map(|text| {
                text.parse::<CalendarDate>()
                    .with_context(|| format!("Invalid date `{text}` in plan `{}`", self.name))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.dates.is_empty() {
            bail!("plan `{}` must list at least one date", self.name);
        }
        if self.days_before < 0 {
            bail!("days_before must not be negative, got {}", self.days_before);
        }
        let measurement = &self.measurement;
        if measurement.forks == 0 || measurement.measurement_iterations == 0 {
            bail!("plan `{}` must measure at least one fork and one iteration", self.name);
        }
        if measurement.forks > MAX_FORKS || measurement.warmup_forks > MAX_FORKS {
            bail!(
                "plan `{}` asks for {} forks and {} warm-up forks; at most {MAX_FORKS} each",
                self.name,
                measurement.forks,
                measurement.warmup_forks
            );
        }
        if measurement.batch_size == 0 {
            bail!("batch_size must be greater than zero");
        }
        self.parsed_dates()?;
        Ok(())
    }
}

pub struct PlanLoader {
    base_dir: PathBuf,
}

impl PlanLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<BenchPlan> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read plan file {}", path.display()))?;
        BenchPlan::from_yaml_str(&data).with_context(|| format!("Failed to load {}", path.display()))
    }
}
