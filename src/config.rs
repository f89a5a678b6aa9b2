use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::data::filter::TimeRange;
use crate::data::loader::TIME_FORMAT;

pub const DEFAULT_CTD_PATH: &str = "CTD_Data.dat";
pub const DEFAULT_METOCEAN_PATH: &str = "SAA2_WC_2017_metocean_10min_avg.csv";

/// Departure from Cape Town and arrival back, as logged by the ship.
pub const DEPARTURE: &str = "2017/06/28 17:10";
pub const ARRIVAL: &str = "2017/07/04 23:50";

pub const PLOT_DPI: u32 = 300;
pub const TABLE_DPI: u32 = 600;

// ---------------------------------------------------------------------------
// Output file names
// ---------------------------------------------------------------------------

pub const PROFILE_PNG: &str = "CTD_Profiles.png";
pub const TIMESERIES_PNG: &str = "timeseries_plot.png";
pub const HISTOGRAM_PNG: &str = "salinity_histogram.png";
pub const TABLE_PNG: &str = "summary_statistics_high_quality.png";
pub const SCATTER_PNG: &str = "wind_temp_scatter.png";

/// Everything one report run needs to know.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub ctd_path: PathBuf,
    pub metocean_path: PathBuf,
    pub output_dir: PathBuf,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub plot_dpi: u32,
    pub table_dpi: u32,
}

impl ReportConfig {
    /// Cruise window and resolutions are fixed; only the paths vary.
    pub fn new(
        ctd_path: impl Into<PathBuf>,
        metocean_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            ctd_path: ctd_path.into(),
            metocean_path: metocean_path.into(),
            output_dir: output_dir.into(),
            departure: NaiveDateTime::parse_from_str(DEPARTURE, TIME_FORMAT)?,
            arrival: NaiveDateTime::parse_from_str(ARRIVAL, TIME_FORMAT)?,
            plot_dpi: PLOT_DPI,
            table_dpi: TABLE_DPI,
        })
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.departure, self.arrival)
    }

    pub fn output_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.output_dir.join(file_name)
    }
}
