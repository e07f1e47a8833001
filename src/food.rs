use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::grid::{Grid, Position};

/// Live food items the field tries to keep on the board.
pub const POOL_SIZE: usize = 5;
/// Upper bound on simultaneously live penalty items.
pub const MAX_PENALTY_ITEMS: usize = 3;
/// Variant ids are drawn uniformly from `0..VARIANT_COUNT`.
pub const VARIANT_COUNT: u8 = 10;

const PENALTY_VARIANTS: [u8; 2] = [7, 8];
const BONUS_VARIANT: u8 = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FoodCategory {
    /// Snake keeps its tail this tick.
    Growth,
    /// Snake is cut to half its length.
    Penalty,
    /// Five extra segments behind the tail.
    Bonus,
}

impl FoodCategory {
    pub fn from_variant(variant: u8) -> Self {
        if PENALTY_VARIANTS.contains(&variant) {
            FoodCategory::Penalty
        } else if variant == BONUS_VARIANT {
            FoodCategory::Bonus
        } else {
            FoodCategory::Growth
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
    /// Table id; several ids share a category and differ only in looks.
    pub variant: u8,
}

impl Food {
    pub fn new(position: Position, variant: u8) -> Self {
        Food { position, variant }
    }

    pub fn category(&self) -> FoodCategory {
        FoodCategory::from_variant(self.variant)
    }
}

pub struct FoodField {
    grid: Grid,
    items: Vec<Food>,
    rng: StdRng,
}

impl FoodField {
    pub fn new(grid: Grid, seed: u64) -> Self {
        FoodField { grid, items: Vec::with_capacity(POOL_SIZE), rng: StdRng::seed_from_u64(seed) }
    }

    pub fn items(&self) -> &[Food] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn penalty_count(&self) -> usize {
        self.items.iter().filter(|f| f.category() == FoodCategory::Penalty).count()
    }

    /// Tops the pool up to [`POOL_SIZE`], avoiding `occupied` and existing food,
    /// then rebalances penalty items. Stops early if the board has no free cell.
    /// Returns how many penalty items the rebalance re-rolled.
    pub fn ensure_populated(&mut self, occupied: &HashSet<Position>) -> usize {
        // A bonus run can wrap over live food, so count each blocked cell once
        let blocked: HashSet<Position> = occupied.iter()
            .copied()
            .filter(|&p| self.grid.in_bounds(p))
            .chain(self.items.iter().map(|f| f.position))
            .collect();
        let mut free = self.grid.cell_count().saturating_sub(blocked.len());

        while self.items.len() < POOL_SIZE && free > 0 {
            let candidate = Position::new(
                self.rng.gen_range(0..self.grid.width()),
                self.rng.gen_range(0..self.grid.height()),
            );
            let variant = self.rng.gen_range(0..VARIANT_COUNT);

            if occupied.contains(&candidate) || self.food_at(candidate).is_some() {
                continue;
            }

            self.items.push(Food::new(candidate, variant));
            free -= 1;
        }

        self.rebalance()
    }

    /// Re-rolls randomly chosen excess penalty items into other categories.
    /// Returns how many items were changed.
    pub fn rebalance(&mut self) -> usize {
        let mut penalties: Vec<usize> = self.items.iter()
            .enumerate()
            .filter(|(_, f)| f.category() == FoodCategory::Penalty)
            .map(|(i, _)| i)
            .collect();

        if penalties.len() <= MAX_PENALTY_ITEMS {
            return 0;
        }

        penalties.shuffle(&mut self.rng);
        let excess = &penalties[MAX_PENALTY_ITEMS..];

        for &i in excess {
            self.items[i].variant = self.draw_non_penalty();
        }

        excess.len()
    }

    /// Removes the food at `pos`, if any, and reports what it was.
    pub fn consume_at(&mut self, pos: Position) -> Option<FoodCategory> {
        let index = self.items.iter().position(|f| f.position == pos)?;
        Some(self.items.remove(index).category())
    }

    pub fn food_at(&self, pos: Position) -> Option<&Food> {
        self.items.iter().find(|f| f.position == pos)
    }

    /// Places a specific item. Refused when the cell is off the board or already holds food.
    pub fn insert(&mut self, food: Food) -> bool {
        if !self.grid.in_bounds(food.position) || self.food_at(food.position).is_some() {
            return false;
        }

        self.items.push(food);
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn draw_non_penalty(&mut self) -> u8 {
        loop {
            let variant = self.rng.gen_range(0..VARIANT_COUNT);
            if FoodCategory::from_variant(variant) != FoodCategory::Penalty {
                return variant;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(w: i32, h: i32) -> FoodField {
        FoodField::new(Grid::new(w, h).unwrap(), 42)
    }

    #[test]
    fn category_table() {
        for v in 0..7 {
            assert_eq!(FoodCategory::from_variant(v), FoodCategory::Growth);
        }
        assert_eq!(FoodCategory::from_variant(7), FoodCategory::Penalty);
        assert_eq!(FoodCategory::from_variant(8), FoodCategory::Penalty);
        assert_eq!(FoodCategory::from_variant(9), FoodCategory::Bonus);
    }

    #[test]
    fn populates_to_pool_size_off_the_snake() {
        let mut f = field(20, 20);
        let occupied: HashSet<Position> = (0..20).map(|x| Position::new(x, 0)).collect();

        f.ensure_populated(&occupied);

        assert_eq!(f.len(), POOL_SIZE);
        let spots: HashSet<Position> = f.items().iter().map(|i| i.position).collect();
        assert_eq!(spots.len(), POOL_SIZE);
        assert!(spots.is_disjoint(&occupied));
    }

    #[test]
    fn stops_when_board_is_full() {
        let mut f = field(2, 2);
        let occupied: HashSet<Position> = [Position::new(0, 0), Position::new(1, 0)].into_iter().collect();

        f.ensure_populated(&occupied);

        assert_eq!(f.len(), 2);
    }

    #[test]
    fn food_under_the_snake_is_not_counted_twice() {
        let mut f = field(3, 1);
        assert!(f.insert(Food::new(Position::new(0, 0), 0)));
        let occupied: HashSet<Position> = [Position::new(0, 0), Position::new(1, 0)].into_iter().collect();

        f.ensure_populated(&occupied);

        assert_eq!(f.len(), 2);
        assert!(f.food_at(Position::new(2, 0)).is_some());
    }

    #[test]
    fn rebalance_caps_penalties() {
        let mut f = field(20, 20);
        for x in 0..5 {
            assert!(f.insert(Food::new(Position::new(x, 3), 7 + (x as u8 % 2))));
        }

        assert_eq!(f.rebalance(), 2);
        assert_eq!(f.penalty_count(), MAX_PENALTY_ITEMS);
        assert_eq!(f.len(), 5);
    }

    #[test]
    fn consume_is_a_normal_miss_when_empty() {
        let mut f = field(10, 10);
        assert_eq!(f.consume_at(Position::new(1, 1)), None);

        f.insert(Food::new(Position::new(1, 1), 9));
        assert_eq!(f.consume_at(Position::new(1, 1)), Some(FoodCategory::Bonus));
        assert!(f.is_empty());
    }

    #[test]
    fn insert_rejects_stacking() {
        let mut f = field(10, 10);
        assert!(f.insert(Food::new(Position::new(2, 2), 0)));
        assert!(!f.insert(Food::new(Position::new(2, 2), 1)));
        assert!(!f.insert(Food::new(Position::new(10, 2), 1)));
    }
}
