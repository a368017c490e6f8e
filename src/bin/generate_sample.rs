use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Side of the square deployment area in metres.
const AREA: f64 = 400.0;

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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// One `set label` line in the layout ns-3's topology dump uses.
fn label_line(out: &mut String, id: u64, x: f64, y: f64, color: &str, point_type: u8) {
    let _ = writeln!(
        out,
        "set label \"{id}\" at {x:.2},{y:.2} left font \"Helvetica,8\" textcolor rgb \"{color}\" front  point pt {point_type} ps 0.3 lc rgb \"{color}\" offset 0,0"
    );
}

fn write(path: &str, text: &str) -> Result<()> {
    fs::write(Path::new(path), text).with_context(|| format!("writing {path}"))
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // One wired eNB in the centre, four relays on a ring around it.
    let centre = AREA / 2.0;
    let mut enbs = String::new();
    label_line(&mut enbs, 1, centre, centre, "blue", 4);
    for i in 0..4u64 {
        let angle = i as f64 * std::f64::consts::FRAC_PI_2 + std::f64::consts::FRAC_PI_4;
        let (x, y) = (centre + 120.0 * angle.cos(), centre + 120.0 * angle.sin());
        label_line(&mut enbs, i + 2, x, y, "red", 4);
    }

    let mut ues = String::new();
    let n_ues = 24u64;
    for imsi in 1..=n_ues {
        let x = rng.uniform(0.0, AREA);
        let y = rng.uniform(0.0, AREA);
        label_line(&mut ues, imsi, x, y, "black", 1);
    }

    let mut buildings = String::new();
    for index in 1..=6u64 {
        let x0 = rng.uniform(20.0, AREA - 80.0);
        let y0 = rng.uniform(20.0, AREA - 80.0);
        let (w, h) = (rng.uniform(15.0, 60.0), rng.uniform(15.0, 60.0));
        let _ = writeln!(
            buildings,
            "set building object {index} rect. from {x0:.2},{y0:.2} to {:.2},{:.2} front fs empty",
            x0 + w,
            y0 + h
        );
    }

    write("enbs.txt", &enbs)?;
    write("ues.txt", &ues)?;
    write("buildings.txt", &buildings)?;

    println!("Wrote 5 eNBs, {n_ues} UEs and 6 buildings to enbs.txt, ues.txt, buildings.txt");
    Ok(())
}
