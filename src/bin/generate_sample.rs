use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use clef_corpus::data::matrix::{write_mat_file, Matrix};

/// Write a small synthetic corpus in the CLEF layout.
#[derive(Debug, Parser)]
#[command(name = "generate_sample", about)]
struct Args {
    /// Output corpus root.
    #[arg(default_value = "sample_corpus")]
    out_dir: PathBuf,

    /// Number of category directories.
    #[arg(long, default_value_t = 3)]
    categories: usize,

    /// Images per category.
    #[arg(long, default_value_t = 8)]
    images: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const CONCEPTS: [&str; 10] = [
    "sky", "grass", "water", "tree", "person", "building", "road", "cloud", "rock", "sand",
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

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let root = &args.out_dir;
    std::fs::create_dir_all(root).with_context(|| format!("creating {}", root.display()))?;

    // Code 11 has no name; codes 12+ are unannotated.
    let mut wlist = String::new();
    for (i, name) in CONCEPTS.iter().enumerate() {
        writeln!(wlist, "{}\t{name}", i + 1)?;
    }
    writeln!(wlist, "11")?;
    write_file(&root.join("wlist100.txt"), &wlist)?;

    let mut training = Vec::new();
    let mut testing = Vec::new();
    let mut next_id = 1000u64;

    for c in 0..args.categories {
        let category = root.join(format!("{:02}", c + 1));
        let images_dir = category.join("images");
        let rels_dir = category.join("spatial_rels");
        for dir in [&images_dir, &rels_dir] {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }

        let mut features = String::new();
        for _ in 0..args.images {
            let id = next_id;
            next_id += 1;
            // 70% training, 25% test, the rest in neither list.
            match rng.next_f64() {
                p if p < 0.70 => training.push(id as f64),
                p if p < 0.95 => testing.push(id as f64),
                _ => {}
            }
            write_file(&images_dir.join(format!("{id}.jpg")), "")?;

            let segments = rng.range(2, 5) as usize;
            for s in 1..=segments {
                let vector: Vec<String> = (0..6).map(|_| format!("{:.4}", rng.next_f64())).collect();
                let code = rng.range(1, 12);
                // Double spaces exercise whitespace normalisation.
                writeln!(features, "{id}\t{s}\t {}\t{code}", vector.join("  "))?;
            }
            if rng.next_f64() < 0.1 {
                writeln!(features, "{id}\tmalformed row")?;
            }

            let topo = random_square(&mut rng, segments, 0, 2)?;
            let x_rels = random_square(&mut rng, segments, 2, 4)?;
            let y_rels = random_square(&mut rng, segments, 4, 7)?;
            write_mat_file(
                &rels_dir.join(format!("{id}.mat")),
                &[("topo", &topo), ("x_rels", &x_rels), ("y_rels", &y_rels)],
            )?;
        }
        write_file(&category.join("features.txt"), &features)?;
    }

    let training_ids = Matrix::column_vector(&training);
    let testing_ids = Matrix::column_vector(&testing);
    write_mat_file(&root.join("training.mat"), &[("training", &training_ids)])?;
    write_mat_file(&root.join("testing.mat"), &[("testing", &testing_ids)])?;

    println!(
        "Wrote {} categories, {} images ({} training, {} test) to {}",
        args.categories,
        next_id - 1000,
        training.len(),
        testing.len(),
        root.display()
    );
    Ok(())
}

/// n×n matrix of codes in `lo..=hi` with a zero diagonal.
fn random_square(rng: &mut SimpleRng, n: usize, lo: u64, hi: u64) -> Result<Matrix> {
    let mut data = Vec::with_capacity(n * n);
    for r in 0..n {
        for c in 0..n {
            data.push(if r == c { 0.0 } else { rng.range(lo, hi) as f64 });
        }
    }
    Matrix::new(n, n, data).context("relation matrix shape")
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
