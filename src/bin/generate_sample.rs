use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

/// One CSV row, with the dashboard's header names.
#[derive(Serialize)]
struct Row {
    #[serde(rename = "car brand")]
    brand: &'static str,
    #[serde(rename = "car model")]
    model: &'static str,
    #[serde(rename = "manufacturing year")]
    year: i64,
    transmission: &'static str,
    drive_system: &'static str,
    engine_type: &'static str,
    rating: Option<f64>,
    horsepower: f64,
    torque: f64,
    length: f64,
    height: f64,
    #[serde(rename = "overall width with mirrors")]
    width_with_mirrors: f64,
    #[serde(rename = "overall width without mirrors")]
    width_without_mirrors: f64,
    #[serde(rename = "curb weight")]
    curb_weight: f64,
    #[serde(rename = "cargo capacity, all seats In place")]
    cargo_capacity: Option<f64>,
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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// (brand, model, engine, base horsepower, base rating, cargo litres)
const LINEUP: &[(&str, &str, &str, f64, f64, f64)] = &[
    ("Toyota", "Corolla", "Inline 4", 169.0, 7.1, 371.0),
    ("Toyota", "Supra", "Inline 6 Turbo", 382.0, 8.4, 290.0),
    ("Honda", "Civic", "Inline 4 Turbo", 180.0, 7.8, 420.0),
    ("Ford", "Mustang", "V8", 480.0, 7.9, 382.0),
    ("Ford", "Fiesta", "Inline 3 EcoBoost", 120.0, 6.8, 292.0),
    ("Subaru", "Outback", "Flat 4", 182.0, 7.5, 920.0),
    ("BMW", "M5", "V8 Twin-Turbo", 617.0, 8.7, 530.0),
    ("Audi", "RS3", "Inline 5 Turbo", 401.0, 8.2, 282.0),
    ("Lamborghini", "Huracan", "V10", 631.0, 8.9, 100.0),
    ("Ferrari", "812", "V12", 789.0, 9.1, 280.0),
    ("Tesla", "Model 3", "Electric", 283.0, 8.0, 594.0),
    ("Nissan", "Frontier", "V6", 310.0, 6.9, 0.0),
];

const TRANSMISSIONS: &[&str] = &["8-speed automatic", "6-speed manual", "CVT", "7-speed dual-clutch auto"];
const DRIVES: &[&str] = &["FWD", "RWD", "AWD", "4WD"];

fn main() -> Result<()> {
    let output: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/my_cars.csv".to_string())
        .into();
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("creating {}", output.display()))?;

    let mut rows = 0usize;
    for &(brand, model, engine, hp, rating, cargo) in LINEUP {
        for year in (1998..=2025).step_by(3) {
            let age = (2025 - year) as f64;
            let row = Row {
                brand,
                model,
                year,
                transmission: rng.pick(TRANSMISSIONS),
                drive_system: rng.pick(DRIVES),
                engine_type: engine,
                // Roughly one in twenty ratings is left blank.
                rating: (rng.next_f64() > 0.05)
                    .then(|| (rating - age * 0.03 + rng.range(-0.4, 0.4)).clamp(1.0, 10.0)),
                horsepower: (hp * (1.0 - age * 0.01)).round(),
                torque: (hp * rng.range(0.85, 1.1)).round(),
                length: rng.range(160.0, 200.0),
                height: rng.range(44.0, 72.0),
                width_with_mirrors: rng.range(78.0, 88.0),
                width_without_mirrors: rng.range(70.0, 80.0),
                curb_weight: rng.range(2600.0, 4800.0).round(),
                cargo_capacity: (cargo > 0.0).then_some(cargo),
            };
            writer.serialize(&row).context("writing row")?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} cars to {}", output.display());
    Ok(())
}
