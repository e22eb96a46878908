use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Purely random generation strategy, every ordered pick of distinct cells is equally likely.
#[derive(Clone, Debug)]
pub struct RandomSequenceGenerator {
    rng: SmallRng,
}

impl RandomSequenceGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl SequenceGenerator for RandomSequenceGenerator {
    fn generate(&mut self, length: CellCount, grid_size: GridSize) -> Result<Sequence> {
        random_sequence(&mut self.rng, length, grid_size)
    }
}

/// Draws `length` distinct cells of a `grid_size`² grid without replacement.
///
/// Each draw picks the n-th cell that is still free, so there are exactly `length` draws and no
/// rejected ones. Draw order is the returned order.
pub fn random_sequence<R: Rng + ?Sized>(
    rng: &mut R,
    length: CellCount,
    grid_size: GridSize,
) -> Result<Sequence> {
    let cells = cell_count(grid_size);
    if length > cells {
        return Err(GameError::InvalidArgument { length, cells });
    }

    let mut taken = vec![false; usize::from(cells)];
    let mut free_cells = cells;
    let mut picked = Vec::with_capacity(usize::from(length));

    while picked.len() < usize::from(length) {
        let mut place: CellCount = rng.random_range(0..free_cells);
        for (i, slot) in taken.iter_mut().enumerate() {
            if *slot {
                continue;
            }
            if place == 0 {
                *slot = true;
                picked.push(i as CellIndex);
                free_cells -= 1;
                break;
            }
            place -= 1;
        }
    }

    // double check, the loop above never revisits a taken cell
    debug_assert_eq!(picked.len(), usize::from(length));
    log::trace!("generated sequence {:?}", picked);
    Ok(Sequence(picked))
}
