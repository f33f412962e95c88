//! Cost differential calculation.
//!
//! Sign convention is fixed across the engine: a negative differential
//! means the substitute saves money, non-negative means neutral or more
//! expensive.

use super::types::{Impact, RealProductData};
use crate::domain::product::Product;

/// Cost per single unit with degenerate package sizes clamped to 1.
pub fn per_unit_cost(cost: f64, package_size: f64) -> f64 {
    if !cost.is_finite() {
        return 0.0;
    }
    cost / package_size.max(1.0)
}

/// Per-unit cost delta of a candidate substitution:
/// `substitute_per_unit * quantity_adjustment - original_per_unit`.
///
/// A missing oracle result yields `0.0` ("unknown, no change"); the
/// engine layers its static-estimate fallback on top of this.
pub fn compute_cost_difference(
    original: &Product,
    substitute: Option<&RealProductData>,
    quantity_adjustment: f64,
) -> f64 {
    let Some(substitute) = substitute else {
        return 0.0;
    };

    let original_per_unit = per_unit_cost(original.cost, original.package_size);
    let substitute_per_unit = per_unit_cost(substitute.typical_price, substitute.package_size);

    substitute_per_unit * quantity_adjustment.max(0.0) - original_per_unit
}

/// Classify a live cost differential into a qualitative impact.
pub fn cost_impact(cost_difference: f64) -> Impact {
    if cost_difference < 0.0 {
        Impact::Better
    } else if cost_difference > 0.0 {
        Impact::Worse
    } else {
        Impact::Similar
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::product::ProductId;

    fn product(cost: f64, package_size: f64) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Dark Chocolate".to_string(),
            cost,
            quantity: 1.0,
            package_size,
            unit: "lb".to_string(),
            is_available: None,
            current_stock: None,
            reorder_point: None,
            substitutes: Vec::new(),
        }
    }

    fn oracle_data(typical_price: f64, package_size: f64) -> RealProductData {
        RealProductData {
            name: "Chocolate".to_string(),
            category: "Food".to_string(),
            typical_price,
            unit: "lb".to_string(),
            package_size,
            source: "test".to_string(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn computes_adjusted_per_unit_delta() {
        // 12.99 * 1.2 - 20.00 = -4.412
        let delta = compute_cost_difference(&product(20.0, 1.0), Some(&oracle_data(12.99, 1.0)), 1.2);
        assert!((delta - (-4.412)).abs() < 1e-9);
    }

    #[test]
    fn missing_oracle_data_yields_zero() {
        assert_eq!(compute_cost_difference(&product(20.0, 1.0), None, 1.2), 0.0);
    }

    #[test]
    fn zero_package_sizes_are_guarded() {
        let delta = compute_cost_difference(&product(10.0, 0.0), Some(&oracle_data(8.0, 0.0)), 1.0);
        assert!((delta - (-2.0)).abs() < 1e-9);
    }

    #[test]
    fn negative_quantity_adjustment_is_clamped() {
        let delta = compute_cost_difference(&product(10.0, 1.0), Some(&oracle_data(8.0, 1.0)), -2.0);
        assert!((delta - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn sign_convention_maps_to_impact() {
        assert_eq!(cost_impact(-0.01), Impact::Better);
        assert_eq!(cost_impact(0.01), Impact::Worse);
        assert_eq!(cost_impact(0.0), Impact::Similar);
    }
}
