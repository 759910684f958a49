//! Writes a synthetic unicorn CSV with the same headers as the public export,
//! for running the dashboard offline:
//!
//! ```text
//! cargo run --bin generate_sample -- data/unicorns.csv 800
//! UNICORN_DATA_SOURCE=data/unicorns.csv cargo run
//! ```

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

const DEFAULT_PATH: &str = "data/unicorns.csv";
const DEFAULT_ROWS: usize = 600;

const LOCATIONS: [(&str, &str, f64); 12] = [
    ("United States", "San Francisco", 0.22),
    ("United States", "New York", 0.12),
    ("United States", "Palo Alto", 0.05),
    ("China", "Beijing", 0.08),
    ("China", "Shanghai", 0.07),
    ("China", "Shenzhen", 0.04),
    ("India", "Bengaluru", 0.07),
    ("United Kingdom", "London", 0.08),
    ("Germany", "Berlin", 0.06),
    ("France", "Paris", 0.05),
    ("Israel", "Tel Aviv", 0.05),
    ("Brazil", "Sao Paulo", 0.11),
];

const INDUSTRIES: [&str; 10] = [
    "Fintech",
    "Internet software & services",
    "E-commerce & direct-to-consumer",
    "Artificial intelligence",
    "Health",
    "Supply chain, logistics, & delivery",
    "Cybersecurity",
    "Data management & analytics",
    "Mobile & telecommunications",
    "Edtech",
];

const INVESTORS: [&str; 14] = [
    "Sequoia Capital",
    "Accel",
    "Tiger Global Management",
    "Andreessen Horowitz",
    "SoftBank Group",
    "Insight Partners",
    "Tencent Holdings",
    "Lightspeed Venture Partners",
    "General Catalyst",
    "Index Ventures",
    "Y Combinator",
    "Coatue Management",
    "Kleiner Perkins",
    "GGV Capital",
];

const SYLLABLES: [&str; 16] = [
    "ra", "zo", "vi", "lo", "quan", "tix", "mer", "no", "ka", "pay", "ly", "sen", "dex", "ori",
    "flo", "bit",
];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

/// Header row of the export, in the field order of [`Row`].
const HEADER: [&str; 7] = [
    "Company",
    "Valuation ($B)",
    "Date Joined",
    "Industry",
    "City",
    "Country",
    "Select Investors",
];

/// One CSV row, serialized positionally under [`HEADER`].
#[derive(Serialize)]
struct Row {
    company: String,
    valuation: String,
    date_joined: String,
    industry: String,
    city: String,
    country: String,
    select_investors: String,
}

fn company_name(rng: &mut SimpleRng, index: usize) -> String {
    let parts = 2 + rng.below(2);
    let mut name: String = (0..parts).map(|_| rng.pick(&SYLLABLES)).collect();
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    format!("{name}{index}")
}

fn location(rng: &mut SimpleRng) -> (&'static str, &'static str) {
    let mut roll = rng.next_f64();
    for (country, city, weight) in LOCATIONS {
        if roll < weight {
            return (country, city);
        }
        roll -= weight;
    }
    let (country, city, _) = LOCATIONS[0];
    (country, city)
}

fn generate_row(rng: &mut SimpleRng, index: usize) -> Row {
    // Most companies sit just above $1B with a long right tail.
    let valuation = 1.0 + rng.gauss(0.0, 1.1).exp() * 1.5;
    // Skew join years towards the 2021 boom.
    let year = 2007 + (15.0 * rng.next_f64().sqrt()) as i32;
    let month = 1 + rng.below(12);
    let day = 1 + rng.below(28);
    let (country, city) = location(rng);

    let wanted = 1 + rng.below(3);
    let mut backers: Vec<&str> = Vec::new();
    while backers.len() < wanted {
        let investor = rng.pick(&INVESTORS);
        if !backers.contains(&investor) {
            backers.push(investor);
        }
    }

    Row {
        company: company_name(rng, index),
        valuation: format!("${valuation:.2}"),
        date_joined: format!("{month:02}/{day:02}/{year}"),
        industry: rng.pick(&INDUSTRIES).to_string(),
        city: city.to_string(),
        country: country.to_string(),
        select_investors: backers.join(", "),
    }
}

/// Write the header and `rows` generated rows. The header is written even
/// when `rows` is zero, so the output always loads as an empty dataset.
fn write_sample<W: Write>(out: W, rows: usize, seed: u64) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(HEADER)?;
    let mut rng = SimpleRng::new(seed);
    for i in 0..rows {
        writer.serialize(generate_row(&mut rng, i))?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_PATH.to_string()));
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count {n:?}"))?,
        None => DEFAULT_ROWS,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let file = fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    write_sample(file, rows, 42)?;

    println!("Wrote {rows} synthetic unicorns to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(rows: usize) -> String {
        let mut out = Vec::new();
        write_sample(&mut out, rows, 7).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn zero_rows_still_writes_the_header() {
        assert_eq!(
            sample(0),
            "Company,Valuation ($B),Date Joined,Industry,City,Country,Select Investors\n"
        );
    }

    #[test]
    fn rows_follow_the_header() {
        let text = sample(5);
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        assert_eq!(reader.headers().unwrap().len(), HEADER.len());
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r[1].starts_with('$') && !r[0].is_empty()));
    }
}
