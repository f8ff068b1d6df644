use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rusty_latband::data::sample::{write_point_shapefile, SampleAirport};

/// Minimal deterministic PRNG (splitmix64)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + unit * (hi - lo)
    }
}

/// Write a deterministic airports point shapefile for trying the workflow.
#[derive(Debug, Parser)]
#[command(name = "generate_sample", version, about)]
struct Args {
    /// Output `.shp` path; the `.shx`, `.dbf` and `.prj` land next to it.
    #[arg(default_value = "sample_data/ne_10m_airports.shp")]
    out: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let Args { out } = Args::parse();
    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    // A few real airports, then the band edges, then random fill.
    let mut airports = vec![
        SampleAirport::new("Singapore Changi", "SIN", 1.3502, 103.9940),
        SampleAirport::new("Jomo Kenyatta Int'l", "NBO", -1.3192, 36.9278),
        SampleAirport::new("Heathrow", "LHR", 51.4706, -0.4619),
        SampleAirport::new("Sydney Kingsford Smith", "SYD", -33.9461, 151.1772),
        SampleAirport::new("Kai Tak, Hong Kong", "HKG", 22.3080, 114.2150),
        SampleAirport::new("North Edge", "NED", 10.0, 0.0),
        SampleAirport::new("South Edge", "SED", -10.0, 0.0),
        SampleAirport::new("Just Outside", "OUT", 10.0001, 0.0),
    ];
    airports.push(SampleAirport {
        name: "Unnamed Strip".to_string(),
        iata_code: None,
        lat: 4.2,
        lon: -60.1,
    });

    let mut rng = SimpleRng::new(42);
    for i in 0..200 {
        airports.push(SampleAirport::new(
            &format!("Airport {i:03}"),
            &format!("X{i:02}"),
            rng.range(-60.0, 70.0),
            rng.range(-180.0, 180.0),
        ));
    }

    write_point_shapefile(&out, &airports)?;
    println!("Wrote {} airports to {}", airports.len(), out.display());
    Ok(())
}
