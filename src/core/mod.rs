mod engine;
pub mod format;
pub mod policy;
pub mod sheets;
mod types;

pub use engine::{
    allocate_surplus, compute_figures, generate_plan, project_corpus,
    required_monthly_contribution,
};
pub use types::{
    Allocation, AllocationSplit, BudgetGroup, CashFlowPoint, Cell, ChartData, ExpenseCategory,
    ExpenseSlice, Expenses, PlanFigures, PlanInput, PlanResult, ProjectionPoint, RiskProfile,
    Sheet,
};
