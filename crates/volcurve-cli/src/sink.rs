//! Chart output.
//!
//! Rendering is left to external tools. A [`ChartSink`] receives finished
//! surfaces and scenario curves; [`CsvChartSink`] writes them as CSV files
//! that any plotting tool can read.

use std::fs::File;
use std::path::PathBuf;

use volcurve_rates::portfolio::ScenarioAnalysis;
use volcurve_surface::surface::SurfaceGrid;

use crate::error::{CliError, CliResult};

/// Receiver for chart data.
pub trait ChartSink {
    /// Writes a surface in long format, one row per grid cell.
    fn write_surface(&mut self, grid: &SurfaceGrid) -> CliResult<()>;

    /// Writes the base curve and every scenario curve against tenor.
    fn write_curves(&mut self, analysis: &ScenarioAnalysis) -> CliResult<()>;
}

/// Writes chart data to a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvChartSink {
    path: PathBuf,
}

impl CsvChartSink {
    /// Creates a sink targeting `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn writer(&self) -> CliResult<csv::Writer<File>> {
        let file = File::create(&self.path).map_err(|e| CliError::io(&self.path, e))?;
        Ok(csv::Writer::from_writer(file))
    }

    fn finish(&self, mut writer: csv::Writer<File>, rows: usize) -> CliResult<()> {
        writer.flush().map_err(|e| CliError::io(&self.path, e))?;
        tracing::info!(path = %self.path.display(), rows, "wrote chart data");
        Ok(())
    }
}

impl ChartSink for CsvChartSink {
    fn write_surface(&mut self, grid: &SurfaceGrid) -> CliResult<()> {
        let mut writer = self.writer()?;
        let mut rows = 0;
        for cell in grid.cells() {
            writer.serialize(cell)?;
            rows += 1;
        }
        self.finish(writer, rows)
    }

    fn write_curves(&mut self, analysis: &ScenarioAnalysis) -> CliResult<()> {
        let mut writer = self.writer()?;

        let mut header = vec!["tenor".to_string(), "Base".to_string()];
        header.extend(analysis.impacts.iter().map(|i| i.name.clone()));
        writer.write_record(&header)?;

        for (k, tenor) in analysis.tenors.iter().enumerate() {
            let mut record = vec![tenor.to_string(), analysis.base_yields[k].to_string()];
            record.extend(analysis.impacts.iter().map(|i| i.yields[k].to_string()));
            writer.write_record(&record)?;
        }
        self.finish(writer, analysis.tenors.len())
    }
}
