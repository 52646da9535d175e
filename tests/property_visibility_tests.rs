use molbridge::visibility::{HideFlags, StructuralCategory};
use proptest::prelude::*;

proptest! {
    #[test]
    fn visibility_map_is_exact_negation_property(
        polymer in any::<bool>(),
        water in any::<bool>(),
        het in any::<bool>(),
        carbs in any::<bool>(),
        non_standard in any::<bool>(),
        coarse in any::<bool>(),
    ) {
        let flags = HideFlags { polymer, water, het, carbs, non_standard, coarse };

        let hidden = flags.hidden_categories();
        let map = flags.visibility_map();

        // Hide list holds exactly the true-flagged categories in canonical order.
        let mut last_index = None;
        for category in hidden.iter() {
            let index = StructuralCategory::CANONICAL_ORDER
                .iter()
                .position(|c| c == category)
                .expect("category in canonical order");
            prop_assert!(flags.hides(*category));
            if let Some(last) = last_index {
                prop_assert!(index > last, "hide list out of canonical order");
            }
            last_index = Some(index);
        }

        for category in StructuralCategory::CANONICAL_ORDER {
            prop_assert_eq!(map[&category], !flags.hides(category));
            prop_assert_eq!(hidden.contains(&category), flags.hides(category));
        }
    }
}
