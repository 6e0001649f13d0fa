use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum RiskProfile {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 3] = [
        RiskProfile::Conservative,
        RiskProfile::Moderate,
        RiskProfile::Aggressive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::Moderate => "Moderate",
            RiskProfile::Aggressive => "Aggressive",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExpenseCategory {
    Rent,
    Groceries,
    Utilities,
    Transport,
    Emi,
    Insurance,
    Subscriptions,
    Education,
    Health,
    Entertainment,
    Shopping,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 12] = [
        ExpenseCategory::Rent,
        ExpenseCategory::Groceries,
        ExpenseCategory::Utilities,
        ExpenseCategory::Transport,
        ExpenseCategory::Emi,
        ExpenseCategory::Insurance,
        ExpenseCategory::Subscriptions,
        ExpenseCategory::Education,
        ExpenseCategory::Health,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Shopping,
        ExpenseCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::Groceries => "Groceries",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Emi => "EMI",
            ExpenseCategory::Insurance => "Insurance",
            ExpenseCategory::Subscriptions => "Subscriptions",
            ExpenseCategory::Education => "Education",
            ExpenseCategory::Health => "Health",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Other => "Others",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BudgetGroup {
    Needs,
    Wants,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expenses {
    pub rent: f64,
    pub groceries: f64,
    pub utilities: f64,
    pub transport: f64,
    pub emi: f64,
    pub insurance: f64,
    pub subscriptions: f64,
    pub education: f64,
    pub health: f64,
    pub entertainment: f64,
    pub shopping: f64,
    pub other: f64,
}

impl Expenses {
    pub fn amount(&self, category: ExpenseCategory) -> f64 {
        match category {
            ExpenseCategory::Rent => self.rent,
            ExpenseCategory::Groceries => self.groceries,
            ExpenseCategory::Utilities => self.utilities,
            ExpenseCategory::Transport => self.transport,
            ExpenseCategory::Emi => self.emi,
            ExpenseCategory::Insurance => self.insurance,
            ExpenseCategory::Subscriptions => self.subscriptions,
            ExpenseCategory::Education => self.education,
            ExpenseCategory::Health => self.health,
            ExpenseCategory::Entertainment => self.entertainment,
            ExpenseCategory::Shopping => self.shopping,
            ExpenseCategory::Other => self.other,
        }
    }

    pub fn amount_mut(&mut self, category: ExpenseCategory) -> &mut f64 {
        match category {
            ExpenseCategory::Rent => &mut self.rent,
            ExpenseCategory::Groceries => &mut self.groceries,
            ExpenseCategory::Utilities => &mut self.utilities,
            ExpenseCategory::Transport => &mut self.transport,
            ExpenseCategory::Emi => &mut self.emi,
            ExpenseCategory::Insurance => &mut self.insurance,
            ExpenseCategory::Subscriptions => &mut self.subscriptions,
            ExpenseCategory::Education => &mut self.education,
            ExpenseCategory::Health => &mut self.health,
            ExpenseCategory::Entertainment => &mut self.entertainment,
            ExpenseCategory::Shopping => &mut self.shopping,
            ExpenseCategory::Other => &mut self.other,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExpenseCategory, f64)> + '_ {
        ExpenseCategory::ALL
            .into_iter()
            .map(move |category| (category, self.amount(category)))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, amount)| amount).sum()
    }
}

/// One submission of the planning form. Percentages are whole numbers
/// (`7.0` means 7%).
#[derive(Debug, Clone, PartialEq)]
pub struct PlanInput {
    pub net_monthly_income: f64,
    pub monthly_tax_deduction: f64,
    pub monthly_side_income: f64,
    pub expenses: Expenses,
    pub current_investments: f64,
    pub current_emergency_fund: f64,
    pub emergency_months_target: u32,
    pub target_passive_monthly: f64,
    pub target_timeline_months: u32,
    pub assumed_yield_pct: f64,
    pub accumulation_return_pct: f64,
    pub risk_profile: RiskProfile,
}

impl Default for PlanInput {
    fn default() -> Self {
        Self {
            net_monthly_income: 50_000.0,
            monthly_tax_deduction: 0.0,
            monthly_side_income: 0.0,
            expenses: Expenses {
                rent: 15_000.0,
                groceries: 5_000.0,
                utilities: 2_000.0,
                transport: 1_500.0,
                emi: 0.0,
                insurance: 1_000.0,
                subscriptions: 500.0,
                education: 0.0,
                health: 1_000.0,
                entertainment: 2_000.0,
                shopping: 2_000.0,
                other: 1_000.0,
            },
            current_investments: 100_000.0,
            current_emergency_fund: 50_000.0,
            emergency_months_target: 6,
            target_passive_monthly: 10_000.0,
            target_timeline_months: 36,
            assumed_yield_pct: 7.0,
            accumulation_return_pct: 12.0,
            risk_profile: RiskProfile::Moderate,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSplit {
    pub equity: u32,
    pub debt: u32,
    pub reits: u32,
}

impl AllocationSplit {
    pub fn total(self) -> u32 {
        self.equity + self.debt + self.reits
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub equity: f64,
    pub debt: f64,
    pub reits: f64,
}

impl Allocation {
    pub const ZERO: Allocation = Allocation {
        equity: 0.0,
        debt: 0.0,
        reits: 0.0,
    };

    pub fn total(self) -> f64 {
        self.equity + self.debt + self.reits
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFigures {
    pub monthly_expenses: f64,
    pub net_income_after_tax: f64,
    pub monthly_surplus: f64,
    pub actual_needs: f64,
    pub actual_wants: f64,
    pub recommended_needs: f64,
    pub recommended_wants: f64,
    pub recommended_savings: f64,
    pub overspend_needs: bool,
    pub overspend_wants: bool,
    pub emergency_target: f64,
    pub emergency_shortfall: f64,
    pub annual_passive_needed: f64,
    pub corpus_needed: f64,
    pub corpus_to_accumulate: f64,
    pub required_monthly_sip: f64,
    pub allocation_split: AllocationSplit,
    pub allocation: Allocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            Cell::Number(_) => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    #[serde(rename = "sheetName")]
    pub name: String,
    #[serde(rename = "data")]
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            rows: vec![header.iter().map(|h| Cell::from(*h)).collect()],
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn value_for(&self, label: &str) -> Option<&Cell> {
        self.data_rows()
            .iter()
            .find(|row| row.first().and_then(Cell::as_text) == Some(label))
            .and_then(|row| row.get(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowPoint {
    pub name: String,
    pub income: f64,
    pub expenses: f64,
    pub surplus: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub month: u32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub expense_breakdown: Vec<ExpenseSlice>,
    pub cash_flow: CashFlowPoint,
    pub investment_projection: Vec<ProjectionPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub figures: PlanFigures,
    pub recommendations: Vec<String>,
    pub sheets: Vec<Sheet>,
    pub chart_data: ChartData,
}

impl PlanResult {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}
