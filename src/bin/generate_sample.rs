use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Parser;

const TIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Write a synthetic CTD cast and metocean record for trying out the report.
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Directory the two files are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = (self.next_u64() % (i as u64 + 1)) as usize;
            items.swap(i, j);
        }
    }
}

// ---------------------------------------------------------------------------
// CTD cast
// ---------------------------------------------------------------------------

/// Warm mixed layer over a thermocline, fresher at the surface.
fn ctd_reading(depth: f64, rng: &mut SimpleRng) -> (f64, f64) {
    let temperature = 3.8 + 14.0 * (-depth / 180.0).exp() + rng.gauss(0.0, 0.05);
    let salinity = 34.35 + 0.95 * (-depth / 220.0).exp() + rng.gauss(0.0, 0.01);
    (temperature, salinity)
}

/// Upcast from 1000 m to the surface, written deepest first. Roughly 1 in
/// 50 cells is garbled.
fn write_ctd(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "Date Time Depth(m) Temperature(C) Salinity(psu)")?;

    let start = NaiveDate::from_ymd_opt(2017, 6, 30)
        .and_then(|d| d.and_hms_opt(8, 15, 0))
        .context("building cast start time")?;

    let mut rows = 0;
    for (i, step) in (0..=500).rev().enumerate() {
        let depth = step as f64 * 2.0;
        let (temperature, salinity) = ctd_reading(depth, rng);
        let time = start + Duration::seconds(i as i64 * 2);
        let cell = |v: f64, rng: &mut SimpleRng| {
            if rng.chance(0.02) {
                "-9.99e-29x".to_string()
            } else {
                format!("{v:.4}")
            }
        };
        writeln!(
            out,
            "{} {} {} {} {}",
            time.format("%m/%d/%Y"),
            time.format("%H:%M:%S"),
            cell(depth, rng),
            cell(temperature, rng),
            cell(salinity, rng),
        )?;
        rows += 1;
    }
    out.flush()?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Metocean record
// ---------------------------------------------------------------------------

const METOCEAN_HEADER: [&str; 9] = [
    "TIME_SERVER",
    "LATITUDE",
    "LONGITUDE",
    "TSG_TEMP",
    "TSG_SALINITY",
    "WIND_SPEED_TRUE",
    "WIND_DIR_TRUE",
    "AIR_TEMPERATURE",
    "BAROMETRIC_PRESSURE",
];

/// A round trip south of Cape Town with a day of padding either side of
/// the cruise window. Rows are shuffled and about 3% of cells are blank.
fn write_metocean(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let start: NaiveDateTime = NaiveDate::from_ymd_opt(2017, 6, 27)
        .and_then(|d| d.and_hms_opt(17, 0, 0))
        .context("building record start time")?;
    let steps = 9 * 24 * 6;

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(steps);
    for i in 0..steps {
        let time = start + Duration::minutes(10 * i as i64);
        let phase = i as f64 / steps as f64;
        let leg = (phase * std::f64::consts::PI).sin();
        let diurnal = (phase * 9.0 * 2.0 * std::f64::consts::PI).sin();

        let latitude = -33.9 - 3.5 * leg + rng.gauss(0.0, 0.002);
        let longitude = 18.4 - 1.2 * leg + rng.gauss(0.0, 0.002);
        let sst = 17.5 - 4.5 * leg + rng.gauss(0.0, 0.15);
        let salinity = 35.3 - 0.7 * leg + rng.gauss(0.0, 0.05);
        let wind = (8.0 + 5.0 * leg + rng.gauss(0.0, 2.0)).max(0.0);
        let wind_dir = (rng.next_f64() * 360.0).floor();
        let air = sst - 2.5 - 0.15 * wind + 1.5 * diurnal + rng.gauss(0.0, 0.4);
        let pressure = 1018.0 + rng.gauss(0.0, 4.0);

        let mut row = vec![time.format(TIME_FORMAT).to_string()];
        for v in [latitude, longitude, sst, salinity, wind, wind_dir, air, pressure] {
            row.push(if rng.chance(0.03) {
                String::new()
            } else {
                format!("{v:.3}")
            });
        }
        rows.push(row);
    }
    rng.shuffle(&mut rows);

    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(METOCEAN_HEADER)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(rows.len())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    let ctd_path = args.output_dir.join("CTD_Data.dat");
    let ctd_rows = write_ctd(&ctd_path, &mut rng)?;
    println!("Wrote {ctd_rows} CTD rows to {}", ctd_path.display());

    let metocean_path = args.output_dir.join("SAA2_WC_2017_metocean_10min_avg.csv");
    let metocean_rows = write_metocean(&metocean_path, &mut rng)?;
    println!(
        "Wrote {metocean_rows} metocean rows to {}",
        metocean_path.display()
    );
    Ok(())
}
