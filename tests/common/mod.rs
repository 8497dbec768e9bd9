#![allow(dead_code)]

use shellres::AtomId;

pub mod trajectories {
    /// Five frames of three waters around a chloride ion.
    pub const CHLORIDE: &str = "tests/trajectories/chloride.arc";
}

/// Distance from the center at which generated oxygens sit inside the shell.
pub const INSIDE: f64 = 2.5;
/// Distance from the center at which generated oxygens sit outside the shell.
pub const OUTSIDE: f64 = 6.0;

/// Writes text trajectories with the center atom (id 1) at the origin.
#[derive(Debug, Default)]
pub struct TrajectoryBuilder {
    text: String,
    nframes: usize,
}

impl TrajectoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame in which exactly the oxygens in `inside` are within the shell and the
    /// oxygens in `outside` are beyond it.
    pub fn frame(mut self, inside: &[AtomId], outside: &[AtomId]) -> Self {
        self.nframes += 1;
        let natoms = 1 + inside.len() + outside.len();
        self.text.push_str(&format!("{natoms:>6}  generated\n"));
        self.text.push_str(
            "    30.000000   30.000000   30.000000   90.000000   90.000000   90.000000\n",
        );
        self.text
            .push_str("     1  Cl      0.000000    0.000000    0.000000    99\n");
        for (id, distance) in inside
            .iter()
            .map(|&id| (id, INSIDE))
            .chain(outside.iter().map(|&id| (id, OUTSIDE)))
        {
            self.text.push_str(&format!(
                "{id:>6}  O     {distance:>10.6}    0.000000    0.000000    21\n"
            ));
        }
        self.text.push_str(&format!("{:>6}\n", self.nframes));
        self
    }

    pub fn nframes(&self) -> usize {
        self.nframes
    }

    pub fn build(self) -> String {
        self.text
    }
}

/// A small deterministic generator for shell memberships.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}
