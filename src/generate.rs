use std::collections::HashSet;
use std::path::Path;

use csv::Writer;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::info;

use crate::error::{Error, Result};
use crate::matrix::{CommunityMatrix, Label, LabelledMatrix};

const NUMBERS: std::ops::Range<u32> = 1..999;

pub struct NameGenerator {
    prefixes: Vec<&'static str>,
    suffixes: Vec<&'static str>,
    used_names: HashSet<String>,
    rng: StdRng,
}

impl NameGenerator {
    pub fn new(seed: u64) -> Self {
        NameGenerator {
            prefixes: vec![
                "agri", "auto", "bio", "chem", "coal", "elec", "food", "metal", "oil",
                "paper", "pharma", "rail", "steel", "textile", "wood",
            ],
            suffixes: vec![
                "works", "trade", "supply", "services", "goods", "parts", "retail",
                "transport", "mining", "finance", "repair", "energy", "build", "craft",
            ],
            used_names: HashSet::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Number of distinct prefix/suffix names this generator can produce.
    pub fn capacity(&self) -> usize {
        self.prefixes.len() * self.suffixes.len() * NUMBERS.len()
    }

    /// `count` names, none repeated over the generator's lifetime. Once the
    /// prefix/suffix pool is used up, names continue as `R1`, `R2`, ...
    pub fn generate_unique_batch(&mut self, count: usize) -> Vec<String> {
        let mut names = Vec::with_capacity(count);
        while names.len() < count && self.used_names.len() < self.capacity() {
            let (Some(prefix), Some(suffix)) = (
                self.prefixes.choose(&mut self.rng),
                self.suffixes.choose(&mut self.rng),
            ) else {
                break;
            };
            let num = self.rng.gen_range(NUMBERS);
            let name = format!("{}_{}{}", prefix, suffix, num);
            if self.used_names.insert(name.clone()) {
                names.push(name);
            }
        }
        let mut n = 0;
        while names.len() < count {
            n += 1;
            let name = format!("R{n}");
            if self.used_names.insert(name.clone()) {
                names.push(name);
            }
        }
        names
    }
}

/// Shape and randomness of a synthetic community matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    pub rows: usize,
    pub cols: usize,
    pub communities: u64,
    /// Chance that a cell takes its row's dominant community.
    pub cohesion: f64,
    pub seed: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            rows: 20,
            cols: 12,
            communities: 5,
            cohesion: 0.6,
            seed: 0,
        }
    }
}

/// Build a random labelled matrix. Each row leans towards one community so
/// the majority ordering has structure to find.
pub fn generate_matrix(options: &GenerateOptions) -> Result<LabelledMatrix> {
    if !options.cohesion.is_finite() {
        return Err(Error::InvalidOption {
            name: "cohesion",
            value: options.cohesion.to_string(),
        });
    }
    let cohesion = options.cohesion.clamp(0.0, 1.0);
    let communities = options.communities.max(1);
    let rows: Vec<Vec<Label>> = (0..options.rows)
        .into_par_iter()
        .map(|r| {
            let mut rng = StdRng::seed_from_u64(options.seed ^ (r as u64).wrapping_mul(0x9e37_79b9));
            let dominant = rng.gen_range(0..communities);
            (0..options.cols)
                .map(|_| {
                    if rng.gen_bool(cohesion) {
                        dominant
                    } else {
                        rng.gen_range(0..communities)
                    }
                })
                .collect()
        })
        .collect();

    let mut names = NameGenerator::new(options.seed);
    let row_names = names.generate_unique_batch(options.rows);
    let col_names = (0..options.cols).map(|c| format!("C{}", c + 1)).collect();
    let matrix = if rows.is_empty() {
        CommunityMatrix::without_rows(options.cols)
    } else {
        CommunityMatrix::from_rows(rows)?
    };

    Ok(LabelledMatrix {
        matrix,
        row_names,
        col_names,
    })
}

/// Write `labelled` in the format read by [`LabelledMatrix::from_csv_path`].
pub fn write_csv<P: AsRef<Path>>(labelled: &LabelledMatrix, path: P) -> Result<()> {
    let mut writer = Writer::from_path(path.as_ref())?;
    writer.write_record(std::iter::once("").chain(labelled.col_names.iter().map(String::as_str)))?;
    for (r, name) in labelled.row_names.iter().enumerate() {
        let cells = labelled.matrix.row(r).iter().map(|label| label.to_string());
        writer.write_record(std::iter::once(name.clone()).chain(cells))?;
    }
    writer.flush()?;
    info!(
        path = %path.as_ref().display(),
        rows = labelled.matrix.rows(),
        cols = labelled.matrix.cols(),
        "wrote community matrix"
    );
    Ok(())
}
