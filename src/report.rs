//! Wires loading, cleaning, statistics and rendering into one run.
//!
//! The two pipelines share nothing: the CTD profile comes from one file
//! and produces one figure; the metocean series comes from the other and
//! produces the remaining four figures plus the summary table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::config::{
    ReportConfig, HISTOGRAM_PNG, PROFILE_PNG, SCATTER_PNG, TABLE_PNG, TIMESERIES_PNG,
};
use crate::data::filter::order_by_depth;
use crate::data::loader::{load_ctd, load_metocean};
use crate::data::model::{MetoceanField, MetoceanSeries};
use crate::render::canvas::Canvas;
use crate::render::png::Rasterizer;
use crate::render::{histogram, profile, scatter, table, timeseries};
use crate::stats::SummaryTable;

/// What a finished run produced.
#[derive(Debug)]
pub struct Report {
    pub summary: SummaryTable,
    pub outputs: Vec<PathBuf>,
}

struct Writer<'a> {
    config: &'a ReportConfig,
    rasterizer: Rasterizer,
    outputs: Vec<PathBuf>,
}

impl Writer<'_> {
    fn write(&mut self, canvas: &Canvas, file_name: &str, dpi: u32) -> Result<()> {
        let path = self.config.output_path(file_name);
        self.rasterizer
            .save(canvas, &path, dpi)
            .with_context(|| format!("writing {}", path.display()))?;
        self.outputs.push(path);
        Ok(())
    }
}

pub fn run(config: &ReportConfig) -> Result<Report> {
    let mut writer = Writer {
        config,
        rasterizer: Rasterizer::new(),
        outputs: Vec::new(),
    };

    render_profile(config, &mut writer)?;
    let summary = render_metocean(config, &mut writer)?;

    info!("report complete: {} images", writer.outputs.len());
    Ok(Report {
        summary,
        outputs: writer.outputs,
    })
}

// ---------------------------------------------------------------------------
// CTD profile
// ---------------------------------------------------------------------------

fn render_profile(config: &ReportConfig, writer: &mut Writer) -> Result<()> {
    let profile = load_ctd(&config.ctd_path)
        .context("loading CTD profile")?
        .drop_incomplete();
    if profile.is_empty() {
        warn!("CTD profile has no complete rows; plotting empty axes");
    }
    let profile = order_by_depth(profile);
    debug!(
        "CTD profile: {} rows down to {:.1} m",
        profile.len(),
        profile.max_depth().unwrap_or(0.0)
    );
    writer.write(&profile::render(&profile), PROFILE_PNG, config.plot_dpi)
}

// ---------------------------------------------------------------------------
// Metocean series
// ---------------------------------------------------------------------------

fn render_metocean(config: &ReportConfig, writer: &mut Writer) -> Result<SummaryTable> {
    let range = config.time_range();
    let series = load_metocean(&config.metocean_path)
        .context("loading metocean series")?
        .select_range(&range)
        .drop_incomplete();
    debug!("metocean series: {} rows", series.len());
    if series.is_empty() {
        warn!(
            "no complete metocean rows between {} and {}",
            range.start, range.end
        );
    }

    writer.write(&timeseries::render(&series), TIMESERIES_PNG, config.plot_dpi)?;

    let salinity = series.column(MetoceanField::TsgSalinity);
    let histogram = histogram::salinity_histogram(&salinity);
    writer.write(&histogram::render(&histogram), HISTOGRAM_PNG, config.plot_dpi)?;

    let summary = summarize(&series);
    writer.write(&table::render(&summary), TABLE_PNG, config.table_dpi)?;

    writer.write(&scatter::render(&series), SCATTER_PNG, config.plot_dpi)?;
    Ok(summary)
}

/// Mean, standard deviation and IQR of sea surface temperature and salinity.
pub fn summarize(series: &MetoceanSeries) -> SummaryTable {
    let mut summary = SummaryTable::default();
    summary.push(
        "Sea Surface Temperature (°C)",
        &series.column(MetoceanField::TsgTemp),
    );
    summary.push("Salinity (PSU)", &series.column(MetoceanField::TsgSalinity));
    for row in &summary.rows {
        debug!("{}: {}", row.parameter, row.stats);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CTD: &str = "\
Date Time Depth(m) Temp(C) Sal(psu)
2017/06/30 10:00:00 500.0 4.10 34.40
2017/06/30 10:00:10 2.0 17.20 35.30
2017/06/30 10:00:20 bad 12.00 35.00
2017/06/30 10:00:30 250.0 9.80 34.80
";

    const METOCEAN: &str = "\
TIME_SERVER,LATITUDE,LONGITUDE,TSG_TEMP,TSG_SALINITY,WIND_SPEED_TRUE,AIR_TEMPERATURE
2017/06/28 17:00,-33.90,18.40,17.0,35.2,5.0,15.0
2017/06/28 17:10,-33.95,18.35,10.0,34.5,6.0,14.0
2017/06/29 00:00,-34.50,18.00,20.0,35.0,9.5,12.5
2017/06/30 00:00,-35.00,17.50,,35.1,11.0,11.0
2017/07/04 23:50,-34.00,18.30,30.0,35.5,7.0,13.0
2017/07/05 00:00,-33.90,18.40,99.0,36.0,4.0,16.0
";

    #[test]
    fn summarize_uses_cleaned_in_range_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metocean.csv");
        fs::write(&path, METOCEAN).unwrap();

        let config = ReportConfig::new("unused.dat", &path, dir.path()).unwrap();
        let series = load_metocean(&path)
            .unwrap()
            .select_range(&config.time_range())
            .drop_incomplete();
        assert_eq!(series.len(), 3);

        let summary = summarize(&series);
        let temp = summary.rows[0].stats;
        assert!((temp.mean - 20.0).abs() < 1e-12);
        assert!((temp.std_dev - 10.0).abs() < 1e-12);
        assert!((temp.iqr - 10.0).abs() < 1e-12);
        assert_eq!(summary.rows[1].parameter, "Salinity (PSU)");
    }

    #[test]
    fn run_writes_all_five_images() {
        let dir = tempfile::tempdir().unwrap();
        let ctd = dir.path().join("ctd.dat");
        let metocean = dir.path().join("metocean.csv");
        fs::write(&ctd, CTD).unwrap();
        fs::write(&metocean, METOCEAN).unwrap();

        let mut config = ReportConfig::new(&ctd, &metocean, dir.path()).unwrap();
        config.plot_dpi = 30;
        config.table_dpi = 60;

        let report = run(&config).unwrap();
        assert_eq!(report.outputs.len(), 5);
        for name in [PROFILE_PNG, TIMESERIES_PNG, HISTOGRAM_PNG, TABLE_PNG, SCATTER_PNG] {
            let bytes = fs::read(dir.path().join(name)).unwrap();
            assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n", "{name}");
        }
        assert_eq!(report.summary.rows.len(), 2);
    }

    #[test]
    fn run_fails_on_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            ReportConfig::new(dir.path().join("none.dat"), dir.path().join("none.csv"), dir.path())
                .unwrap();
        let err = run(&config).unwrap_err();
        assert!(format!("{err:#}").contains("loading CTD profile"));
    }
}
