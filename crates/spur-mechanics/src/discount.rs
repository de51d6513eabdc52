//! How committed resources lower an investigation's difficulty.

use rand::Rng;
use rand::rngs::StdRng;

use spur_core::Cost;

/// Silver per point of discount.
pub const SILVER_PER_POINT: u64 = 2500;
/// Most discount silver can buy.
pub const SILVER_CAP: i32 = 20;
/// Most discount the three resource pools can buy together.
pub const RESOURCE_CAP: i32 = 60;
/// Action points per point of discount.
pub const AP_PER_POINT: u32 = 5;

/// Discount from committed silver, capped at [`SILVER_CAP`].
pub fn silver_discount(silver: u64) -> i32 {
    let points = silver / SILVER_PER_POINT;
    i32::try_from(points).unwrap_or(i32::MAX).min(SILVER_CAP)
}

/// Discount from the summed economic, military, and social resources.
///
/// Every full 2.5 resources is a point. The fractional remainder turns into
/// one more point with a chance proportional to it, so committing 7 is
/// sometimes worth 3 and sometimes 2.
pub fn resources_discount(total: u32, rng: &mut StdRng) -> i32 {
    let mut points = i64::from(total) * 2 / 5;
    if rng.random_range(0..=5) < total % 5 {
        points += 1;
    }
    i32::try_from(points).unwrap_or(i32::MAX).min(RESOURCE_CAP)
}

/// Discount from committed action points.
pub fn action_point_discount(action_points: u32) -> i32 {
    i32::try_from(action_points / AP_PER_POINT).unwrap_or(i32::MAX)
}

/// Total difficulty discount for a week's commitment. Never negative.
pub fn resource_mod(committed: &Cost, rng: &mut StdRng) -> i32 {
    let resources = committed
        .economic
        .saturating_add(committed.military)
        .saturating_add(committed.social);
    silver_discount(committed.silver)
        .saturating_add(resources_discount(resources, rng))
        .saturating_add(action_point_discount(committed.action_points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn silver_caps_at_twenty() {
        assert_eq!(silver_discount(0), 0);
        assert_eq!(silver_discount(2499), 0);
        assert_eq!(silver_discount(5000), 2);
        assert_eq!(silver_discount(1_000_000), 20);
    }

    #[test]
    fn resources_round_up_sometimes() {
        let mut rng = StdRng::seed_from_u64(42);
        // 10 divides evenly: no remainder, no bonus roll can succeed.
        assert_eq!(resources_discount(10, &mut rng), 4);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(resources_discount(7, &mut rng));
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn resources_cap_at_sixty() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(resources_discount(150, &mut rng), 60);
        assert_eq!(resources_discount(u32::MAX, &mut rng), 60);
    }

    #[test]
    fn combined_discount() {
        let mut rng = StdRng::seed_from_u64(42);
        let committed = Cost {
            silver: 10_000,
            action_points: 25,
            economic: 5,
            military: 5,
            social: 0,
        };
        assert_eq!(resource_mod(&committed, &mut rng), 4 + 4 + 5);
    }

    proptest! {
        #[test]
        fn discount_is_bounded(
            silver in any::<u64>(),
            ap in 0u32..10_000,
            economic in 0u32..1_000,
            military in 0u32..1_000,
            social in 0u32..1_000,
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let committed = Cost { silver, action_points: ap, economic, military, social };
            let total = resource_mod(&committed, &mut rng);
            prop_assert!(total >= 0);
            prop_assert!(silver_discount(silver) <= SILVER_CAP);
            prop_assert!(total <= SILVER_CAP + RESOURCE_CAP + (ap / AP_PER_POINT) as i32);
        }
    }
}
