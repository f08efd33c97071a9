//! Monster wave generation from the level tables

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::state::Monster;
use crate::tuning::level_plan;

/// Random waves start anywhere in this band left of the map
const RANDOM_X: (i32, i32) = (-500, -1);
const RANDOM_Y: (i32, i32) = (25, 290);
const FINAL_Y: (i32, i32) = (25, 275);

/// The first half of a level: a random mix drawn from the level's ratios
pub fn random_wave(level: u32, rng: &mut Pcg32) -> Vec<Monster> {
    let plan = level_plan(level);
    let (min, max) = plan.random_amount;
    let count = rng.random_range(min..=max);

    (0..count)
        .filter_map(|_| {
            let kind = plan.ratios.choose_weighted(rng, |entry| entry.1).ok()?.0;
            let pos = IVec2::new(
                rng.random_range(RANDOM_X.0..=RANDOM_X.1),
                rng.random_range(RANDOM_Y.0..=RANDOM_Y.1),
            );
            Some(Monster::spawn(kind, pos))
        })
        .collect()
}

/// The second half of a level: a fixed roster
pub fn final_wave(level: u32, rng: &mut Pcg32) -> Vec<Monster> {
    let plan = level_plan(level);
    let mut monsters = Vec::new();
    for entry in plan.final_wave {
        for _ in 0..entry.count {
            let pos = IVec2::new(
                rng.random_range(entry.min_x..=entry.max_x),
                rng.random_range(FINAL_Y.0..=FINAL_Y.1),
            );
            monsters.push(Monster::spawn(entry.kind, pos));
        }
    }
    monsters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::kingdom::MonsterKind;
    use crate::tuning::{LEVEL_COUNT, LEVELS};
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_final_wave_roster() {
        let mut rng = Pcg32::seed_from_u64(1);
        let wave = final_wave(1, &mut rng);
        assert_eq!(wave.len(), 7 + 9 + 1);
        assert_eq!(wave.iter().filter(|m| m.kind == MonsterKind::Golem).count(), 1);
        for m in wave.iter().filter(|m| m.kind == MonsterKind::Slime) {
            assert!((-60..=-30).contains(&m.rect.x));
        }
        assert!(wave.iter().all(|m| (25..=275).contains(&m.rect.y)));
    }

    #[test]
    fn test_random_wave_uses_level_mix() {
        let mut rng = Pcg32::seed_from_u64(2);
        let wave = random_wave(1, &mut rng);
        let allowed: Vec<MonsterKind> = LEVELS[0].ratios.iter().map(|r| r.0).collect();
        assert!(wave.iter().all(|m| allowed.contains(&m.kind)));
        assert!(wave.iter().all(|m| m.rect.x < 0));
    }

    proptest! {
        #[test]
        fn random_wave_size_in_range(seed in any::<u64>(), level in 1u32..=LEVEL_COUNT) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let wave = random_wave(level, &mut rng);
            let (min, max) = level_plan(level).random_amount;
            prop_assert!(wave.len() as u32 >= min && wave.len() as u32 <= max);
            for m in &wave {
                prop_assert!((-500..=-1).contains(&m.rect.x));
                prop_assert!((25..=290).contains(&m.rect.y));
                prop_assert_eq!(m.life, m.whole_life);
            }
        }
    }
}
