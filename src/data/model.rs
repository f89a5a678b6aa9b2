use std::fmt;

use chrono::NaiveDateTime;
use log::info;

// ---------------------------------------------------------------------------
// Timestamped – rows that can be placed on the cruise timeline
// ---------------------------------------------------------------------------

/// Anything carrying a `TIME_SERVER` timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> NaiveDateTime;
}

// ---------------------------------------------------------------------------
// CTD profile rows
// ---------------------------------------------------------------------------

/// One line of the CTD record file as read, before cleaning.
///
/// Numeric cells that failed to parse are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProfileSample {
    pub date: String,
    pub time: String,
    pub depth: Option<f64>,
    pub temperature: Option<f64>,
    pub salinity: Option<f64>,
}

/// A fully populated CTD reading.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSample {
    pub date: String,
    pub time: String,
    /// Depth in metres, positive downwards.
    pub depth: f64,
    /// Temperature in °C.
    pub temperature: f64,
    /// Salinity in PSU.
    pub salinity: f64,
}

impl RawProfileSample {
    fn complete(self) -> Option<ProfileSample> {
        Some(ProfileSample {
            depth: self.depth?,
            temperature: self.temperature?,
            salinity: self.salinity?,
            date: self.date,
            time: self.time,
        })
    }
}

/// The CTD file as loaded, in file order.
#[derive(Debug, Clone, Default)]
pub struct RawCtdTable {
    pub samples: Vec<RawProfileSample>,
}

impl RawCtdTable {
    /// Drop every row missing depth, temperature or salinity.
    pub fn drop_incomplete(self) -> CtdProfile {
        let total = self.samples.len();
        let samples: Vec<ProfileSample> = self
            .samples
            .into_iter()
            .filter_map(RawProfileSample::complete)
            .collect();
        info!(
            "CTD: kept {} of {} rows ({} incomplete)",
            samples.len(),
            total,
            total - samples.len()
        );
        CtdProfile { samples }
    }
}

/// A cleaned depth profile.
#[derive(Debug, Clone, Default)]
pub struct CtdProfile {
    pub samples: Vec<ProfileSample>,
}

impl CtdProfile {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Deepest reading, `None` for an empty profile.
    pub fn max_depth(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.depth).reduce(f64::max)
    }

    pub fn depths(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.depth).collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.temperature).collect()
    }

    pub fn salinities(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.salinity).collect()
    }
}

// ---------------------------------------------------------------------------
// Metocean rows
// ---------------------------------------------------------------------------

/// The numeric metocean columns every retained row must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetoceanField {
    TsgTemp,
    TsgSalinity,
    WindSpeedTrue,
    AirTemperature,
    Latitude,
}

impl MetoceanField {
    pub const CRITICAL: [MetoceanField; 5] = [
        MetoceanField::TsgTemp,
        MetoceanField::TsgSalinity,
        MetoceanField::WindSpeedTrue,
        MetoceanField::AirTemperature,
        MetoceanField::Latitude,
    ];

    /// Column header in the metocean CSV.
    pub fn column_name(self) -> &'static str {
        match self {
            MetoceanField::TsgTemp => "TSG_TEMP",
            MetoceanField::TsgSalinity => "TSG_SALINITY",
            MetoceanField::WindSpeedTrue => "WIND_SPEED_TRUE",
            MetoceanField::AirTemperature => "AIR_TEMPERATURE",
            MetoceanField::Latitude => "LATITUDE",
        }
    }
}

impl fmt::Display for MetoceanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A metocean row as loaded. The timestamp is always present (a bad one
/// aborts loading); sensor cells may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetoceanRecord {
    pub time: NaiveDateTime,
    pub tsg_temp: Option<f64>,
    pub tsg_salinity: Option<f64>,
    pub wind_speed_true: Option<f64>,
    pub air_temperature: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A metocean row with every critical field present.
#[derive(Debug, Clone, PartialEq)]
pub struct MetoceanRecord {
    pub time: NaiveDateTime,
    /// Sea surface temperature from the thermosalinograph, °C.
    pub tsg_temp: f64,
    /// Sea surface salinity from the thermosalinograph, PSU.
    pub tsg_salinity: f64,
    /// True wind speed, m/s.
    pub wind_speed_true: f64,
    /// Air temperature, °C.
    pub air_temperature: f64,
    pub latitude: f64,
    /// Carried through when the file has it; never required.
    pub longitude: Option<f64>,
}

impl RawMetoceanRecord {
    fn complete(self) -> Option<MetoceanRecord> {
        Some(MetoceanRecord {
            time: self.time,
            tsg_temp: self.tsg_temp?,
            tsg_salinity: self.tsg_salinity?,
            wind_speed_true: self.wind_speed_true?,
            air_temperature: self.air_temperature?,
            latitude: self.latitude?,
            longitude: self.longitude,
        })
    }
}

impl Timestamped for RawMetoceanRecord {
    fn timestamp(&self) -> NaiveDateTime {
        self.time
    }
}

impl Timestamped for MetoceanRecord {
    fn timestamp(&self) -> NaiveDateTime {
        self.time
    }
}

impl MetoceanRecord {
    pub fn value(&self, field: MetoceanField) -> f64 {
        match field {
            MetoceanField::TsgTemp => self.tsg_temp,
            MetoceanField::TsgSalinity => self.tsg_salinity,
            MetoceanField::WindSpeedTrue => self.wind_speed_true,
            MetoceanField::AirTemperature => self.air_temperature,
            MetoceanField::Latitude => self.latitude,
        }
    }
}

/// The metocean CSV as loaded, in file order.
#[derive(Debug, Clone, Default)]
pub struct RawMetoceanTable {
    pub records: Vec<RawMetoceanRecord>,
}

impl RawMetoceanTable {
    /// Drop every row missing one of [`MetoceanField::CRITICAL`].
    pub fn drop_incomplete(self) -> MetoceanSeries {
        let total = self.records.len();
        let records: Vec<MetoceanRecord> = self
            .records
            .into_iter()
            .filter_map(RawMetoceanRecord::complete)
            .collect();
        info!(
            "metocean: kept {} of {} rows ({} incomplete)",
            records.len(),
            total,
            total - records.len()
        );
        MetoceanSeries { records }
    }
}

/// Cleaned, time-ordered metocean observations.
#[derive(Debug, Clone, Default)]
pub struct MetoceanSeries {
    pub records: Vec<MetoceanRecord>,
}

impl MetoceanSeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All values of one column, in row order.
    pub fn column(&self, field: MetoceanField) -> Vec<f64> {
        self.records.iter().map(|r| r.value(field)).collect()
    }

    pub fn times(&self) -> Vec<NaiveDateTime> {
        self.records.iter().map(|r| r.time).collect()
    }
}
