//! A small deterministic toy problem used as a shared fixture across
//! scheduler, population and SSGA tests. Not part of the public API and not
//! the traveling-salesman example this crate's core stays agnostic to.

use std::cell::RefCell;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
  method::{Method, MethodResult},
  solution::Solution,
};

/// A fixed-length real vector minimized by sum of squares.
#[derive(Debug, Clone)]
pub(crate) struct ToySolution {
  genes: Vec<f64>,
  cached_objective: f64,
  valid: bool,
}

impl ToySolution {
  pub(crate) fn from_genes(genes: Vec<f64>) -> Self {
    Self { genes, cached_objective: 0.0, valid: false }
  }

  pub(crate) fn genes(&self) -> &[f64] {
    &self.genes
  }

  pub(crate) fn genes_mut(&mut self) -> &mut Vec<f64> {
    &mut self.genes
  }
}

impl Solution for ToySolution {
  const TO_MAXIMIZE: bool = false;

  fn calc_objective(&self) -> f64 {
    self.genes.iter().map(|g| g * g).sum()
  }

  fn cached_objective(&self) -> f64 {
    self.cached_objective
  }

  fn set_cached_objective(&mut self, value: f64) {
    self.cached_objective = value;
  }

  fn is_valid(&self) -> bool {
    self.valid
  }

  fn set_valid(&mut self, valid: bool) {
    self.valid = valid;
  }

  fn copy(&self) -> Self {
    self.clone()
  }

  fn copy_from(&mut self, other: &Self) {
    self.genes.clone_from(&other.genes);
    self.cached_objective = other.cached_objective;
    self.valid = other.valid;
  }

  fn initialize(&mut self, par: i32) {
    let len = self.genes.len().max(4);
    self.genes = vec![par as f64; len];
    self.valid = false;
  }

  fn is_equal(&self, other: &Self) -> bool {
    self.genes == other.genes
  }
}

/// A construction method that fills the genes with uniform random values in
/// `[-10, 10)`; `par` is unused but kept to match the `Method<S, i32>` shape
/// used for `meths_ch` elsewhere.
pub(crate) fn random_construction() -> Method<ToySolution, i32> {
  Method::new(
    "construct_random",
    |s: &mut ToySolution, _par: &i32, res: &mut MethodResult| {
      let mut rng = rand::thread_rng();
      for gene in s.genes_mut().iter_mut() {
        *gene = rng.gen_range(-10.0..10.0);
      }
      if s.genes().is_empty() {
        *s.genes_mut() = vec![rng.gen_range(-10.0..10.0); 4];
      }
      s.invalidate();
      res.changed = true;
      Ok(())
    },
    0,
  )
}

/// A mutation method that perturbs a random gene by `par` (the shake
/// intensity) scaled noise.
pub(crate) fn perturb_mutation() -> Method<ToySolution, i32> {
  Method::new(
    "mutate_perturb",
    |s: &mut ToySolution, par: &i32, res: &mut MethodResult| {
      let mut rng = rand::thread_rng();
      if let Some(gene) = s.genes_mut().first_mut() {
        *gene -= *par as f64 * rng.gen_range(0.0..1.0);
        s.invalidate();
        res.changed = true;
      }
      Ok(())
    },
    1,
  )
}

/// Like [`random_construction`], but draws from a `StdRng` seeded with
/// `seed` instead of `rand::thread_rng()`, so two separately-constructed
/// instances given the same seed produce identical draw sequences. Used to
/// exercise the engine's determinism contract end-to-end, since that
/// contract only covers the scheduler's own RNG, not arbitrary user
/// callables drawing from a process-global generator.
pub(crate) fn seeded_construction(seed: u64) -> Method<ToySolution, i32> {
  let rng = RefCell::new(StdRng::seed_from_u64(seed));
  Method::new(
    "construct_seeded",
    move |s: &mut ToySolution, _par: &i32, res: &mut MethodResult| {
      let mut rng = rng.borrow_mut();
      let len = s.genes().len().max(4);
      *s.genes_mut() = (0..len).map(|_| rng.gen_range(-10.0..10.0)).collect();
      s.invalidate();
      res.changed = true;
      Ok(())
    },
    0,
  )
}

/// Like [`perturb_mutation`], but draws from a `StdRng` seeded with `seed`
/// instead of `rand::thread_rng()`; see [`seeded_construction`].
pub(crate) fn seeded_perturb_mutation(seed: u64) -> Method<ToySolution, i32> {
  let rng = RefCell::new(StdRng::seed_from_u64(seed));
  Method::new(
    "mutate_seeded",
    move |s: &mut ToySolution, par: &i32, res: &mut MethodResult| {
      let mut rng = rng.borrow_mut();
      if let Some(gene) = s.genes_mut().first_mut() {
        *gene -= *par as f64 * rng.gen_range(0.0..1.0);
        s.invalidate();
        res.changed = true;
      }
      Ok(())
    },
    1,
  )
}

/// A crossover that averages two parents gene-wise, writing into `p1`.
pub(crate) fn average_crossover(p1: &mut ToySolution, p2: &ToySolution) {
  for (a, b) in p1.genes_mut().iter_mut().zip(p2.genes()) {
    *a = (*a + b) / 2.0;
  }
  p1.invalidate();
}
