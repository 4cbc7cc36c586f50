use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

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

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_f64() * items.len() as f64) as usize]
    }
}

/// Column names match the IBM HR attrition export.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Row {
    age: i64,
    attrition: &'static str,
    department: &'static str,
    distance_from_home: i64,
    education_field: &'static str,
    employee_number: usize,
    gender: &'static str,
    job_involvement: i64,
    job_level: i64,
    job_role: &'static str,
    job_satisfaction: i64,
    monthly_income: i64,
    work_life_balance: i64,
}

/// (role, department, job level range)
const ROLES: [(&str, &str, (i64, i64)); 9] = [
    ("Sales Executive", "Sales", (2, 3)),
    ("Research Scientist", "Research & Development", (1, 2)),
    ("Laboratory Technician", "Research & Development", (1, 2)),
    ("Manufacturing Director", "Research & Development", (2, 4)),
    ("Healthcare Representative", "Research & Development", (2, 4)),
    ("Manager", "Research & Development", (3, 5)),
    ("Sales Representative", "Sales", (1, 2)),
    ("Research Director", "Research & Development", (3, 5)),
    ("Human Resources", "Human Resources", (1, 3)),
];

const FIELDS: [&str; 6] = [
    "Life Sciences",
    "Medical",
    "Marketing",
    "Technical Degree",
    "Other",
    "Human Resources",
];

fn generate_row(rng: &mut SimpleRng, employee_number: usize) -> Row {
    let &(job_role, mut department, (lo, hi)) = rng.pick(&ROLES);
    if job_role == "Manager" {
        department = *rng.pick(&["Sales", "Research & Development", "Human Resources"]);
    }
    let job_level = rng.range(lo, hi);
    let age = (18 + job_level * 4 + rng.range(0, 30)).min(60);
    let monthly_income = 1000 + job_level * 3500 + rng.range(0, 2500);
    let work_life_balance = rng.range(1, 4);
    let job_satisfaction = rng.range(1, 4);

    // Young, junior, unhappy staff leave more often.
    let mut leave_odds = 0.08;
    if age < 30 {
        leave_odds += 0.10;
    }
    if job_level == 1 {
        leave_odds += 0.07;
    }
    if work_life_balance == 1 || job_satisfaction == 1 {
        leave_odds += 0.08;
    }

    Row {
        age,
        attrition: if rng.next_f64() < leave_odds { "Yes" } else { "No" },
        department,
        distance_from_home: rng.range(1, 29),
        education_field: if department == "Human Resources" && rng.next_f64() < 0.5 {
            "Human Resources"
        } else {
            *rng.pick(&FIELDS[..5])
        },
        employee_number,
        gender: if rng.next_f64() < 0.6 { "Male" } else { "Female" },
        job_involvement: rng.range(1, 4),
        job_level,
        job_role,
        job_satisfaction,
        monthly_income,
        work_life_balance,
    }
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("datasets/WA_Fn-UseC_-HR-Employee-Attrition.csv"));
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("row count '{n}' is not a number"))?,
        None => 1470,
    };

    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;

    let mut rng = SimpleRng::new(42);
    for employee_number in 1..=rows {
        writer
            .serialize(generate_row(&mut rng, employee_number))
            .context("writing row")?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} employees to {}", output_path.display());
    Ok(())
}
