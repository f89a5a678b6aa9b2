use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::StringRecord;
use log::{debug, info};
use thiserror::Error;

use super::model::{
    MetoceanField, RawCtdTable, RawMetoceanRecord, RawMetoceanTable, RawProfileSample,
};

/// Column names of the CTD record file, in file order.
pub const CTD_COLUMNS: [&str; 5] = [
    "Date",
    "Time",
    "Depth (m)",
    "Temperature (C)",
    "Salinity (psu)",
];

pub const TIME_COLUMN: &str = "TIME_SERVER";
pub const LONGITUDE_COLUMN: &str = "LONGITUDE";

/// Format of `TIME_SERVER` cells, e.g. `2017/06/28 17:10`.
pub const TIME_FORMAT: &str = "%Y/%m/%d %H:%M";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Structural problems with an input file. All of them are fatal; bad
/// individual cells never end up here.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: CSV error: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: missing column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{} line {line}: cannot parse TIME_SERVER '{value}' as %Y/%m/%d %H:%M", .path.display())]
    Timestamp {
        path: PathBuf,
        line: u64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Parse a numeric cell, turning anything unparseable (or NaN) into a
/// missing value instead of an error.
pub fn coerce_f64(cell: Option<&str>) -> Option<f64> {
    cell.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| !v.is_nan())
}

// ---------------------------------------------------------------------------
// CTD loader
// ---------------------------------------------------------------------------

/// Load the whitespace-delimited CTD file.
///
/// The first line is a header and is skipped; the columns are always
/// [`CTD_COLUMNS`] regardless of what it says.
pub fn load_ctd(path: &Path) -> Result<RawCtdTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_ctd(&text);
    info!("loaded {} CTD rows from {}", table.samples.len(), path.display());
    Ok(table)
}

/// Split CTD text into rows on runs of whitespace. Short lines leave the
/// trailing columns missing; extra tokens are ignored.
pub fn parse_ctd(text: &str) -> RawCtdTable {
    let samples = text
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut cells = line.split_whitespace();
            let date = cells.next().unwrap_or_default().to_string();
            let time = cells.next().unwrap_or_default().to_string();
            RawProfileSample {
                date,
                time,
                depth: coerce_f64(cells.next()),
                temperature: coerce_f64(cells.next()),
                salinity: coerce_f64(cells.next()),
            }
        })
        .collect();
    RawCtdTable { samples }
}

// ---------------------------------------------------------------------------
// Metocean loader
// ---------------------------------------------------------------------------

/// Header positions of the columns the metocean pipeline reads.
struct MetoceanColumns {
    time: usize,
    tsg_temp: usize,
    tsg_salinity: usize,
    wind_speed_true: usize,
    air_temperature: usize,
    latitude: usize,
    longitude: Option<usize>,
}

impl MetoceanColumns {
    fn locate(headers: &StringRecord, path: &Path) -> Result<Self, LoadError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
        };
        Ok(Self {
            time: find(TIME_COLUMN)?,
            tsg_temp: find(MetoceanField::TsgTemp.column_name())?,
            tsg_salinity: find(MetoceanField::TsgSalinity.column_name())?,
            wind_speed_true: find(MetoceanField::WindSpeedTrue.column_name())?,
            air_temperature: find(MetoceanField::AirTemperature.column_name())?,
            latitude: find(MetoceanField::Latitude.column_name())?,
            longitude: headers.iter().position(|h| h == LONGITUDE_COLUMN),
        })
    }
}

/// Load the comma-delimited metocean file.
///
/// Layout: one header row, then one row per 10-minute average. Only
/// `TIME_SERVER`, the five [`MetoceanField::CRITICAL`] columns and
/// (optionally) `LONGITUDE` are read; other columns are ignored.
pub fn load_metocean(path: &Path) -> Result<RawMetoceanTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(csv_err)?.clone();
    let columns = MetoceanColumns::locate(&headers, path)?;
    debug!("{}: columns {:?}", path.display(), headers);

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let line = record
            .position()
            .map_or(row_no as u64 + 2, |p| p.line());

        let raw_time = record.get(columns.time).unwrap_or_default();
        let time = NaiveDateTime::parse_from_str(raw_time, TIME_FORMAT).map_err(|source| {
            LoadError::Timestamp {
                path: path.to_path_buf(),
                line,
                value: raw_time.to_string(),
                source,
            }
        })?;

        records.push(RawMetoceanRecord {
            time,
            tsg_temp: coerce_f64(record.get(columns.tsg_temp)),
            tsg_salinity: coerce_f64(record.get(columns.tsg_salinity)),
            wind_speed_true: coerce_f64(record.get(columns.wind_speed_true)),
            air_temperature: coerce_f64(record.get(columns.air_temperature)),
            latitude: coerce_f64(record.get(columns.latitude)),
            longitude: columns.longitude.and_then(|i| coerce_f64(record.get(i))),
        });
    }

    info!("loaded {} metocean rows from {}", records.len(), path.display());
    Ok(RawMetoceanTable { records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn coerce_turns_garbage_into_missing() {
        assert_eq!(coerce_f64(Some(" 12.5 ")), Some(12.5));
        assert_eq!(coerce_f64(Some("")), None);
        assert_eq!(coerce_f64(Some("n/a")), None);
        assert_eq!(coerce_f64(Some("NaN")), None);
        assert_eq!(coerce_f64(None), None);
    }

    #[test]
    fn parse_ctd_skips_header_and_coerces() {
        let text = "Date Time Depth Temp Sal\n\
                    11/29/2008   06:52:00   1.0   18.2   35.1\n\
                    \n\
                    11/29/2008\t06:52:01 2.0 bad 35.0\n\
                    11/29/2008 06:52:02 3.0\n";
        let table = parse_ctd(text);
        assert_eq!(table.samples.len(), 3);
        assert_eq!(table.samples[0].date, "11/29/2008");
        assert_eq!(table.samples[0].time, "06:52:00");
        assert_eq!(table.samples[0].depth, Some(1.0));
        assert_eq!(table.samples[0].salinity, Some(35.1));
        assert_eq!(table.samples[1].temperature, None);
        assert_eq!(table.samples[2].salinity, None);

        let profile = table.drop_incomplete();
        assert_eq!(profile.len(), 1);
    }

    #[test]
    fn missing_ctd_file_is_an_io_error() {
        let err = load_ctd(Path::new("/definitely/not/here/CTD_Data.dat")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn load_metocean_reads_columns_by_name() {
        let file = write_temp(
            "LONGITUDE,TIME_SERVER,LATITUDE,TSG_TEMP,TSG_SALINITY,AIR_TEMPERATURE,WIND_SPEED_TRUE,EXTRA\n\
             18.4,2017/06/28 17:10,-33.9,16.2,35.1,14.0,6.5,x\n\
             18.5,2017/06/28 17:20,-34.0,,35.0,13.8,7.0,y\n\
             18.6,2017/06/28 17:30,-34.1,16.0\n",
        );
        let table = load_metocean(file.path()).unwrap();
        assert_eq!(table.records.len(), 3);

        let first = &table.records[0];
        assert_eq!(first.tsg_temp, Some(16.2));
        assert_eq!(first.wind_speed_true, Some(6.5));
        assert_eq!(first.latitude, Some(-33.9));
        assert_eq!(first.longitude, Some(18.4));
        assert_eq!(table.records[1].tsg_temp, None);
        assert_eq!(table.records[2].tsg_salinity, None);

        let series = table.drop_incomplete();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn missing_critical_column_is_fatal() {
        let file = write_temp(
            "TIME_SERVER,TSG_TEMP,TSG_SALINITY,WIND_SPEED_TRUE,AIR_TEMPERATURE\n\
             2017/06/28 17:10,16.2,35.1,6.5,14.0\n",
        );
        let err = load_metocean(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "LATITUDE", .. }));
    }

    #[test]
    fn bad_timestamp_is_fatal() {
        let file = write_temp(
            "TIME_SERVER,TSG_TEMP,TSG_SALINITY,WIND_SPEED_TRUE,AIR_TEMPERATURE,LATITUDE\n\
             2017/06/28 17:10,16.2,35.1,6.5,14.0,-34.0\n\
             28-06-2017 17:20,16.2,35.1,6.5,14.0,-34.0\n",
        );
        match load_metocean(file.path()).unwrap_err() {
            LoadError::Timestamp { line, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(value, "28-06-2017 17:20");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
