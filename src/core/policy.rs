//! Fixed budgeting and allocation policy tables.

use super::types::{AllocationSplit, BudgetGroup, ExpenseCategory, RiskProfile};

/// Share of net monthly income recommended for essentials.
pub const NEEDS_RATIO: f64 = 0.50;
/// Share of net monthly income recommended for discretionary spending.
pub const WANTS_RATIO: f64 = 0.30;
/// Share of net monthly income recommended for savings and investments.
pub const SAVINGS_RATIO: f64 = 0.20;
/// Actual spending may exceed the recommended band by this fraction before
/// it is flagged.
pub const OVERSPEND_TOLERANCE: f64 = 0.10;

const BUDGET_GROUPS: [(ExpenseCategory, BudgetGroup); 12] = [
    (ExpenseCategory::Rent, BudgetGroup::Needs),
    (ExpenseCategory::Groceries, BudgetGroup::Needs),
    (ExpenseCategory::Utilities, BudgetGroup::Needs),
    (ExpenseCategory::Transport, BudgetGroup::Needs),
    (ExpenseCategory::Emi, BudgetGroup::Needs),
    (ExpenseCategory::Insurance, BudgetGroup::Needs),
    (ExpenseCategory::Subscriptions, BudgetGroup::Wants),
    (ExpenseCategory::Education, BudgetGroup::Wants),
    (ExpenseCategory::Health, BudgetGroup::Needs),
    (ExpenseCategory::Entertainment, BudgetGroup::Wants),
    (ExpenseCategory::Shopping, BudgetGroup::Wants),
    (ExpenseCategory::Other, BudgetGroup::Wants),
];

const ALLOCATION_TABLE: [(RiskProfile, AllocationSplit); 3] = [
    (
        RiskProfile::Conservative,
        AllocationSplit {
            equity: 30,
            debt: 45,
            reits: 25,
        },
    ),
    (
        RiskProfile::Moderate,
        AllocationSplit {
            equity: 55,
            debt: 30,
            reits: 15,
        },
    ),
    (
        RiskProfile::Aggressive,
        AllocationSplit {
            equity: 70,
            debt: 15,
            reits: 15,
        },
    ),
];

// Row of each category in BUDGET_GROUPS.
fn category_slot(category: ExpenseCategory) -> usize {
    match category {
        ExpenseCategory::Rent => 0,
        ExpenseCategory::Groceries => 1,
        ExpenseCategory::Utilities => 2,
        ExpenseCategory::Transport => 3,
        ExpenseCategory::Emi => 4,
        ExpenseCategory::Insurance => 5,
        ExpenseCategory::Subscriptions => 6,
        ExpenseCategory::Education => 7,
        ExpenseCategory::Health => 8,
        ExpenseCategory::Entertainment => 9,
        ExpenseCategory::Shopping => 10,
        ExpenseCategory::Other => 11,
    }
}

// Row of each profile in ALLOCATION_TABLE.
fn profile_slot(profile: RiskProfile) -> usize {
    match profile {
        RiskProfile::Conservative => 0,
        RiskProfile::Moderate => 1,
        RiskProfile::Aggressive => 2,
    }
}

pub fn budget_group(category: ExpenseCategory) -> BudgetGroup {
    BUDGET_GROUPS[category_slot(category)].1
}

pub fn allocation_split(profile: RiskProfile) -> AllocationSplit {
    ALLOCATION_TABLE[profile_slot(profile)].1
}

pub fn is_overspent(actual: f64, recommended: f64) -> bool {
    actual > recommended * (1.0 + OVERSPEND_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_exactly_one_group() {
        for category in ExpenseCategory::ALL {
            let hits = BUDGET_GROUPS.iter().filter(|(c, _)| *c == category).count();
            assert_eq!(hits, 1, "{category:?}");
        }
    }

    #[test]
    fn table_slots_point_at_their_own_rows() {
        for category in ExpenseCategory::ALL {
            assert_eq!(BUDGET_GROUPS[category_slot(category)].0, category);
        }
        for profile in RiskProfile::ALL {
            assert_eq!(ALLOCATION_TABLE[profile_slot(profile)].0, profile);
        }
    }

    #[test]
    fn needs_group_matches_essential_categories() {
        let needs: Vec<ExpenseCategory> = ExpenseCategory::ALL
            .into_iter()
            .filter(|c| budget_group(*c) == BudgetGroup::Needs)
            .collect();
        assert_eq!(
            needs,
            vec![
                ExpenseCategory::Rent,
                ExpenseCategory::Groceries,
                ExpenseCategory::Utilities,
                ExpenseCategory::Transport,
                ExpenseCategory::Emi,
                ExpenseCategory::Insurance,
                ExpenseCategory::Health,
            ]
        );
    }

    #[test]
    fn every_profile_splits_to_one_hundred_percent() {
        for profile in RiskProfile::ALL {
            assert_eq!(allocation_split(profile).total(), 100, "{profile:?}");
        }
    }

    #[test]
    fn allocation_table_values() {
        assert_eq!(
            allocation_split(RiskProfile::Conservative),
            AllocationSplit {
                equity: 30,
                debt: 45,
                reits: 25
            }
        );
        assert_eq!(
            allocation_split(RiskProfile::Aggressive),
            AllocationSplit {
                equity: 70,
                debt: 15,
                reits: 15
            }
        );
    }

    #[test]
    fn band_ratios_cover_whole_income() {
        assert!((NEEDS_RATIO + WANTS_RATIO + SAVINGS_RATIO - 1.0).abs() < 1e-12);
    }

    #[test]
    fn overspend_needs_more_than_ten_percent_over_band() {
        assert!(!is_overspent(27_500.0, 25_000.0));
        assert!(is_overspent(27_501.0, 25_000.0));
        assert!(!is_overspent(0.0, 0.0));
    }
}
