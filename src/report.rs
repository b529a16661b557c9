//! Benchmark results: console table and JSON artifacts.

use std::fmt;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Average-time result for one (variant, date) pair, in nanoseconds per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchRecord {
    pub variant: String,
    pub date: String,
    pub forks: u32,
    pub iterations: u32,
    pub operations: u64,
    pub avg_ns: f64,
    pub stddev_ns: f64,
    pub min_ns: f64,
    pub max_ns: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchReport {
    pub plan: String,
    pub days_before: i32,
    pub generated_at: String,
    pub records: Vec<BenchRecord>,
}

impl BenchReport {
    pub fn new(plan: &str, days_before: i32) -> Self {
        Self {
            plan: plan.to_string(),
            days_before,
            generated_at: chrono::Local::now().to_rfc3339(),
            records: Vec::new(),
        }
    }

    /// Records for one variant, in plan date order.
    pub fn by_variant<'a>(&'a self, variant: &'a str) -> impl Iterator<Item = &'a BenchRecord> + 'a {
        self.records.iter().filter(move |record| record.variant == variant)
    }

    pub fn fastest_for(&self, date: &str) -> Option<&BenchRecord> {
        self.records
            .iter()
            .filter(|record| record.date == date)
            .min_by(|a, b| a.avg_ns.total_cmp(&b.avg_ns))
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<14} {:>10} {:>5} {:>12} {:>10} {:>10}",
            "Benchmark", "date", "Cnt", "Score", "StdDev", "Units"
        )?;
        for record in &self.records {
            writeln!(
                f,
                "{:<14} {:>10} {:>5} {:>12.3} {:>10.3} {:>10}",
                record.variant, record.date, record.iterations, record.avg_ns, record.stddev_ns, "ns/op"
            )?;
        }
        Ok(())
    }
}

/// Writes reports as pretty JSON into a directory.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create report dir {}", output_dir.display()))?;
        Ok(Self { output_dir })
    }

    /// Writes `datebench_<plan>_<timestamp>.json`, never replacing an existing file.
    pub fn write(&self, report: &BenchReport) -> Result<PathBuf> {
        let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S%.3f");
        let stem = format!("datebench_{}_{stamp}", file_safe(&report.plan));
        let json = serde_json::to_string_pretty(report)?;
        let (path, mut file) = self.create_unique(&stem)?;
        file.write_all(json.as_bytes())?;
        info!(path = %path.display(), records = report.records.len(), "report written");
        Ok(path)
    }

    fn create_unique(&self, stem: &str) -> Result<(PathBuf, File)> {
        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("{stem}.json")
            } else {
                format!("{stem}-{attempt}.json")
            };
            let path = self.output_dir.join(name);
            match File::options().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => {
                    return Err(err).with_context(|| format!("Failed to create {}", path.display()))
                }
            }
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<BenchReport> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read report {}", path.display()))?;
        let report = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse report {}", path.display()))?;
        Ok(report)
    }

    /// Report files in this directory, oldest first.
    pub fn list_reports(&self) -> Result<Vec<PathBuf>> {
        let mut reports = Vec::new();
        for entry in fs::read_dir(&self.output_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                reports.push(path);
            }
        }
        reports.sort();
        Ok(reports)
    }
}

/// Keeps ASCII letters, digits, `-` and `_`; everything else becomes `_`.
fn file_safe(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "plan".to_string()
    } else {
        cleaned
    }
}
