use super::format::format_inr;
use super::policy::{
    NEEDS_RATIO, SAVINGS_RATIO, WANTS_RATIO, allocation_split, budget_group, is_overspent,
};
use super::sheets::build_sheets;
use super::types::{
    Allocation, AllocationSplit, BudgetGroup, CashFlowPoint, ChartData, ExpenseSlice,
    PlanFigures, PlanInput, PlanResult, ProjectionPoint,
};

#[derive(Debug, Clone, Copy)]
struct BudgetBreakdown {
    actual_needs: f64,
    actual_wants: f64,
    recommended_needs: f64,
    recommended_wants: f64,
    recommended_savings: f64,
}

pub fn generate_plan(input: &PlanInput) -> PlanResult {
    let figures = compute_figures(input);
    let recommendations = build_recommendations(input, &figures);
    let chart_data = build_chart_data(input, &figures);
    let sheets = build_sheets(input, &figures, &recommendations, &chart_data);
    PlanResult {
        figures,
        recommendations,
        sheets,
        chart_data,
    }
}

pub fn compute_figures(input: &PlanInput) -> PlanFigures {
    let monthly_expenses = input.expenses.total();
    let net_income_after_tax =
        input.net_monthly_income - input.monthly_tax_deduction + input.monthly_side_income;
    let monthly_surplus = net_income_after_tax - monthly_expenses;

    // Bands are measured against the stated net income, not the after-tax figure.
    let budget = budget_breakdown(input);

    let emergency_target = budget.actual_needs * f64::from(input.emergency_months_target);
    let emergency_shortfall = (emergency_target - input.current_emergency_fund).max(0.0);

    let annual_passive_needed = input.target_passive_monthly * 12.0;
    let assumed_yield = input.assumed_yield_pct / 100.0;
    let corpus_needed = if assumed_yield > 0.0 {
        annual_passive_needed / assumed_yield
    } else {
        0.0
    };
    let corpus_to_accumulate = (corpus_needed - input.current_investments).max(0.0);
    let required_monthly_sip = required_monthly_contribution(
        corpus_to_accumulate,
        input.accumulation_return_pct / 100.0,
        input.target_timeline_months,
    );

    let allocation_split = allocation_split(input.risk_profile);
    let allocation = allocate_surplus(monthly_surplus, allocation_split);

    PlanFigures {
        monthly_expenses,
        net_income_after_tax,
        monthly_surplus,
        actual_needs: budget.actual_needs,
        actual_wants: budget.actual_wants,
        recommended_needs: budget.recommended_needs,
        recommended_wants: budget.recommended_wants,
        recommended_savings: budget.recommended_savings,
        overspend_needs: is_overspent(budget.actual_needs, budget.recommended_needs),
        overspend_wants: is_overspent(budget.actual_wants, budget.recommended_wants),
        emergency_target,
        emergency_shortfall,
        annual_passive_needed,
        corpus_needed,
        corpus_to_accumulate,
        required_monthly_sip,
        allocation_split,
        allocation,
    }
}

fn budget_breakdown(input: &PlanInput) -> BudgetBreakdown {
    let mut actual_needs = 0.0;
    let mut actual_wants = 0.0;
    for (category, amount) in input.expenses.iter() {
        match budget_group(category) {
            BudgetGroup::Needs => actual_needs += amount,
            BudgetGroup::Wants => actual_wants += amount,
        }
    }
    BudgetBreakdown {
        actual_needs,
        actual_wants,
        recommended_needs: NEEDS_RATIO * input.net_monthly_income,
        recommended_wants: WANTS_RATIO * input.net_monthly_income,
        recommended_savings: SAVINGS_RATIO * input.net_monthly_income,
    }
}

/// Level monthly contribution that grows to `target_corpus` after `months`
/// at `annual_return` (a fraction, compounded monthly, paid at month end).
pub fn required_monthly_contribution(target_corpus: f64, annual_return: f64, months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    let n = f64::from(months);
    let r = annual_return / 12.0;
    if r == 0.0 {
        return target_corpus / n;
    }
    let factor = ((1.0 + r).powf(n) - 1.0) / r;
    if factor == 0.0 {
        return 0.0;
    }
    target_corpus / factor
}

pub fn allocate_surplus(monthly_surplus: f64, split: AllocationSplit) -> Allocation {
    if monthly_surplus <= 0.0 {
        return Allocation::ZERO;
    }
    let bucket = |pct: u32| (monthly_surplus * f64::from(pct) / 100.0).round();
    Allocation {
        equity: bucket(split.equity),
        debt: bucket(split.debt),
        reits: bucket(split.reits),
    }
}

pub fn project_corpus(
    current_investments: f64,
    monthly_contribution: f64,
    annual_return: f64,
    months: u32,
) -> Vec<ProjectionPoint> {
    let monthly_rate = annual_return / 12.0;
    let mut corpus = current_investments;
    let mut points = Vec::new();
    for month in 0..=months {
        points.push(ProjectionPoint {
            month,
            value: corpus.round(),
        });
        corpus = (corpus + monthly_contribution) * (1.0 + monthly_rate);
    }
    points
}

fn build_recommendations(input: &PlanInput, figures: &PlanFigures) -> Vec<String> {
    let mut lines = Vec::new();

    if figures.overspend_needs {
        lines.push(format!(
            "Overspending on NEEDS: Your essential expenses are {}, which is higher than the recommended {}. Review major costs like rent/EMI.",
            format_inr(figures.actual_needs),
            format_inr(figures.recommended_needs)
        ));
    }
    if figures.overspend_wants {
        lines.push(format!(
            "Overspending on WANTS: Your discretionary spending is {}, exceeding the recommended {}. Consider reducing non-essential spending.",
            format_inr(figures.actual_wants),
            format_inr(figures.recommended_wants)
        ));
    }

    if figures.monthly_surplus <= 0.0 {
        lines.push(
            "Negative Cashflow: Your expenses exceed your income. Urgent action is needed to cut costs or increase income to start saving."
                .to_string(),
        );
    } else {
        lines.push(format!(
            "Monthly Surplus: You have {} available for investment. It's being allocated based on your '{}' profile.",
            format_inr(figures.monthly_surplus),
            input.risk_profile.as_str()
        ));
    }

    if figures.emergency_shortfall > 0.0 {
        lines.push(format!(
            "Emergency Fund Shortfall: You need {} more to be secure. Prioritize building this fund.",
            format_inr(figures.emergency_shortfall)
        ));
    }

    let sip = figures.required_monthly_sip;
    if sip > 0.0 {
        lines.push(format!(
            "Goal SIP: To reach {}/month passive income in {} months, a monthly SIP of ≈ {} is needed.",
            format_inr(input.target_passive_monthly),
            input.target_timeline_months,
            format_inr(sip)
        ));
        if figures.monthly_surplus < sip {
            let deficit = sip - figures.monthly_surplus.max(0.0);
            lines.push(format!(
                "SIP Deficit: Your surplus is {} less than the required SIP. Consider extending your timeline, increasing savings, or boosting income.",
                format_inr(deficit)
            ));
        } else {
            lines.push(
                "On Track: Your monthly surplus is sufficient to fund the required SIP for your goal. Stay consistent!"
                    .to_string(),
            );
        }
    } else {
        lines.push(
            "Goal Achieved: Your current investments are sufficient to generate your passive income goal. Consider shifting to income-generating assets."
                .to_string(),
        );
    }

    lines
}

fn build_chart_data(input: &PlanInput, figures: &PlanFigures) -> ChartData {
    let expense_breakdown = input
        .expenses
        .iter()
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(category, amount)| ExpenseSlice {
            name: category.label().to_string(),
            value: amount,
        })
        .collect();

    let invested_monthly = figures.monthly_surplus.max(0.0);
    ChartData {
        expense_breakdown,
        cash_flow: CashFlowPoint {
            name: "Cash Flow".to_string(),
            income: figures.net_income_after_tax,
            expenses: figures.monthly_expenses,
            surplus: invested_monthly,
        },
        investment_projection: project_corpus(
            input.current_investments,
            invested_monthly,
            input.accumulation_return_pct / 100.0,
            input.target_timeline_months,
        ),
    }
}
