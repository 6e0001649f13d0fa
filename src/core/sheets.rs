use super::format::format_inr;
use super::types::{Cell, ChartData, PlanFigures, PlanInput, Sheet};

pub const RECOMMENDATIONS: &str = "Recommendations";
pub const SIP_PLAN: &str = "SIP_Plan";
pub const BUDGET: &str = "Budget";
pub const INVESTMENT_ALLOCATION: &str = "Investment_Allocation";
pub const EXPENSES: &str = "Expenses";
pub const INPUTS_SUMMARY: &str = "Inputs_Summary";

/// Sheet names in the order they are produced and exported.
pub const SHEET_ORDER: [&str; 6] = [
    RECOMMENDATIONS,
    SIP_PLAN,
    BUDGET,
    INVESTMENT_ALLOCATION,
    EXPENSES,
    INPUTS_SUMMARY,
];

pub const SIP_PASSIVE_TARGET: &str = "Passive Monthly Target";
pub const SIP_CORPUS_NEEDED: &str = "Corpus Needed for Goal";
pub const SIP_REQUIRED: &str = "Required Monthly SIP";
pub const SIP_AVAILABLE_SURPLUS: &str = "Available Monthly Surplus";
pub const EXPENSES_TOTAL: &str = "Total Monthly Expenses";

fn money(value: f64) -> Cell {
    Cell::Text(format_inr(value))
}

pub(crate) fn build_sheets(
    input: &PlanInput,
    figures: &PlanFigures,
    recommendations: &[String],
    chart_data: &ChartData,
) -> Vec<Sheet> {
    vec![
        recommendations_sheet(recommendations),
        sip_sheet(input, figures),
        budget_sheet(figures),
        allocation_sheet(figures),
        expenses_sheet(figures, chart_data),
        inputs_sheet(input),
    ]
}

fn recommendations_sheet(recommendations: &[String]) -> Sheet {
    let mut sheet = Sheet::new(RECOMMENDATIONS, &["Actionable Advice"]);
    for line in recommendations {
        sheet.push_row(vec![Cell::from(line.clone())]);
    }
    sheet
}

fn sip_sheet(input: &PlanInput, figures: &PlanFigures) -> Sheet {
    let sufficient = if figures.monthly_surplus >= figures.required_monthly_sip {
        "Yes"
    } else {
        "No"
    };
    let mut sheet = Sheet::new(SIP_PLAN, &["Metric", "Value"]);
    sheet.push_row(vec![
        SIP_PASSIVE_TARGET.into(),
        money(input.target_passive_monthly),
    ]);
    sheet.push_row(vec![SIP_CORPUS_NEEDED.into(), money(figures.corpus_needed)]);
    sheet.push_row(vec![
        "Current Investments".into(),
        money(input.current_investments),
    ]);
    sheet.push_row(vec![
        "Corpus to Accumulate".into(),
        money(figures.corpus_to_accumulate),
    ]);
    sheet.push_row(vec![SIP_REQUIRED.into(), money(figures.required_monthly_sip)]);
    sheet.push_row(vec![
        SIP_AVAILABLE_SURPLUS.into(),
        money(figures.monthly_surplus),
    ]);
    sheet.push_row(vec!["Sufficient Surplus for SIP?".into(), sufficient.into()]);
    sheet
}

fn budget_sheet(figures: &PlanFigures) -> Sheet {
    let mut sheet = Sheet::new(
        BUDGET,
        &["Budget Component", "Actual (₹)", "Recommended (₹)"],
    );
    sheet.push_row(vec![
        "Needs (Essentials)".into(),
        money(figures.actual_needs),
        money(figures.recommended_needs),
    ]);
    sheet.push_row(vec![
        "Wants (Discretionary)".into(),
        money(figures.actual_wants),
        money(figures.recommended_wants),
    ]);
    sheet.push_row(vec![
        "Savings & Investments".into(),
        money(figures.monthly_surplus.max(0.0)),
        money(figures.recommended_savings),
    ]);
    sheet
}

fn allocation_sheet(figures: &PlanFigures) -> Sheet {
    let split = figures.allocation_split;
    let amounts = figures.allocation;
    let mut sheet = Sheet::new(
        INVESTMENT_ALLOCATION,
        &["Asset Class", "Allocation %", "Monthly Investment (₹)"],
    );
    for (name, pct, amount) in [
        ("Equity", split.equity, amounts.equity),
        ("Debt", split.debt, amounts.debt),
        ("REITs", split.reits, amounts.reits),
    ] {
        sheet.push_row(vec![name.into(), format!("{pct}%").into(), money(amount)]);
    }
    sheet.push_row(vec![
        "Total Surplus Allocated".into(),
        "100%".into(),
        money(amounts.total()),
    ]);
    sheet
}

fn expenses_sheet(figures: &PlanFigures, chart_data: &ChartData) -> Sheet {
    let mut sheet = Sheet::new(EXPENSES, &["Category", "Amount (₹)"]);
    for slice in &chart_data.expense_breakdown {
        sheet.push_row(vec![slice.name.clone().into(), money(slice.value)]);
    }
    sheet.push_row(vec![EXPENSES_TOTAL.into(), money(figures.monthly_expenses)]);
    sheet
}

fn inputs_sheet(input: &PlanInput) -> Sheet {
    let mut sheet = Sheet::new(INPUTS_SUMMARY, &["Field", "Value"]);
    sheet.push_row(vec![
        "Net Monthly Income".into(),
        money(input.net_monthly_income),
    ]);
    sheet.push_row(vec!["Side Income".into(), money(input.monthly_side_income)]);
    sheet.push_row(vec![
        "Risk Profile".into(),
        input.risk_profile.as_str().into(),
    ]);
    sheet.push_row(vec![
        "Passive Income Target".into(),
        format!("{}/mo", format_inr(input.target_passive_monthly)).into(),
    ]);
    sheet.push_row(vec![
        "Target Timeline".into(),
        format!("{} months", input.target_timeline_months).into(),
    ]);
    sheet.push_row(vec![
        "Current Investments".into(),
        money(input.current_investments),
    ]);
    sheet.push_row(vec![
        "Current Emergency Fund".into(),
        money(input.current_emergency_fund),
    ]);
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlanInput, PlanResult, RiskProfile, generate_plan};

    fn text(cell: Option<&Cell>) -> &str {
        cell.and_then(Cell::as_text).unwrap_or("<missing>")
    }

    fn default_plan() -> PlanResult {
        generate_plan(&PlanInput::default())
    }

    #[test]
    fn sheets_come_in_fixed_order() {
        let plan = default_plan();
        let names: Vec<&str> = plan.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, SHEET_ORDER);
    }

    #[test]
    fn every_row_is_as_wide_as_its_header() {
        let plan = default_plan();
        for sheet in &plan.sheets {
            let width = sheet.header().len();
            for row in sheet.data_rows() {
                assert_eq!(row.len(), width, "sheet {}", sheet.name);
            }
        }
    }

    #[test]
    fn sip_plan_rows_for_default_form() {
        let plan = default_plan();
        let sip = plan.sheet(SIP_PLAN).expect("sip sheet");
        assert_eq!(text(sip.value_for(SIP_PASSIVE_TARGET)), "₹10,000");
        assert_eq!(text(sip.value_for(SIP_CORPUS_NEEDED)), "₹17,14,286");
        assert_eq!(text(sip.value_for("Current Investments")), "₹1,00,000");
        assert_eq!(text(sip.value_for("Corpus to Accumulate")), "₹16,14,286");
        assert_eq!(text(sip.value_for(SIP_REQUIRED)), "₹37,475");
        assert_eq!(text(sip.value_for(SIP_AVAILABLE_SURPLUS)), "₹19,000");
        assert_eq!(text(sip.value_for("Sufficient Surplus for SIP?")), "No");
    }

    #[test]
    fn budget_rows_compare_actual_with_bands() {
        let plan = default_plan();
        let budget = plan.sheet(BUDGET).expect("budget sheet");
        assert_eq!(
            budget.data_rows()[0],
            vec![
                Cell::from("Needs (Essentials)"),
                Cell::from("₹25,500"),
                Cell::from("₹25,000")
            ]
        );
        assert_eq!(
            budget.data_rows()[2],
            vec![
                Cell::from("Savings & Investments"),
                Cell::from("₹19,000"),
                Cell::from("₹10,000")
            ]
        );
    }

    #[test]
    fn allocation_sheet_lists_split_and_total() {
        let mut input = PlanInput::default();
        input.risk_profile = RiskProfile::Aggressive;
        let plan = generate_plan(&input);
        let sheet = plan.sheet(INVESTMENT_ALLOCATION).expect("allocation sheet");
        assert_eq!(sheet.data_rows().len(), 4);
        assert_eq!(text(sheet.value_for("Equity")), "70%");
        assert_eq!(sheet.data_rows()[0][2], Cell::from("₹13,300"));
        assert_eq!(
            sheet.data_rows()[3],
            vec![
                Cell::from("Total Surplus Allocated"),
                Cell::from("100%"),
                Cell::from("₹19,000")
            ]
        );
    }

    #[test]
    fn expenses_sheet_skips_zero_rows_and_ends_with_total() {
        let plan = default_plan();
        let sheet = plan.sheet(EXPENSES).expect("expenses sheet");
        let rows = sheet.data_rows();
        assert_eq!(rows.len(), 11);
        assert_eq!(sheet.value_for("EMI"), None);
        assert_eq!(text(sheet.value_for("Rent")), "₹15,000");
        assert_eq!(
            rows.last().cloned(),
            Some(vec![Cell::from(EXPENSES_TOTAL), Cell::from("₹31,000")])
        );
    }

    #[test]
    fn inputs_summary_echoes_form() {
        let plan = default_plan();
        let sheet = plan.sheet(INPUTS_SUMMARY).expect("inputs sheet");
        assert_eq!(sheet.data_rows().len(), 7);
        assert_eq!(text(sheet.value_for("Risk Profile")), "Moderate");
        assert_eq!(text(sheet.value_for("Passive Income Target")), "₹10,000/mo");
        assert_eq!(text(sheet.value_for("Target Timeline")), "36 months");
        assert_eq!(text(sheet.value_for("Current Emergency Fund")), "₹50,000");
    }

    #[test]
    fn recommendations_sheet_has_one_row_per_line() {
        let plan = default_plan();
        let sheet = plan.sheet(RECOMMENDATIONS).expect("recommendations sheet");
        assert_eq!(sheet.header(), &[Cell::from("Actionable Advice")]);
        assert_eq!(sheet.data_rows().len(), plan.recommendations.len());
    }

    #[test]
    fn negative_surplus_shows_in_sip_plan_but_not_budget() {
        let mut input = PlanInput::default();
        input.net_monthly_income = 25_000.0;
        let plan = generate_plan(&input);
        let sip = plan.sheet(SIP_PLAN).expect("sip sheet");
        assert_eq!(text(sip.value_for(SIP_AVAILABLE_SURPLUS)), "-₹6,000");
        let budget = plan.sheet(BUDGET).expect("budget sheet");
        assert_eq!(budget.data_rows()[2][1], Cell::from("₹0"));
    }
}
