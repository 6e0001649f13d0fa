//! Chart rendering port and the plain-text renderer used by the CLI.

use std::fmt::Write as _;

use crate::core::format::{format_inr, format_inr_short};
use crate::core::{Cell, ChartData, Sheet};
use crate::export::column_widths;

pub const DEFAULT_BAR_WIDTH: usize = 40;
pub const DEFAULT_PROJECTION_STEP: u32 = 6;

const BAR: char = '█';

pub trait ChartRenderer {
    fn render(&self, charts: &ChartData) -> String;
}

/// Bar charts and a sampled projection table for a terminal.
#[derive(Debug, Clone, Copy)]
pub struct TerminalCharts {
    pub bar_width: usize,
    /// Every `projection_step`-th month is listed, plus the final month.
    pub projection_step: u32,
}

impl Default for TerminalCharts {
    fn default() -> Self {
        Self {
            bar_width: DEFAULT_BAR_WIDTH,
            projection_step: DEFAULT_PROJECTION_STEP,
        }
    }
}

impl TerminalCharts {
    fn bar(&self, value: f64, max: f64) -> String {
        if max <= 0.0 || !value.is_finite() || value <= 0.0 {
            return String::new();
        }
        let len = ((value / max) * self.bar_width as f64).round() as usize;
        BAR.to_string().repeat(len.clamp(1, self.bar_width))
    }

    fn expense_breakdown(&self, charts: &ChartData, out: &mut String) {
        let _ = writeln!(out, "Expense Breakdown");
        let slices = &charts.expense_breakdown;
        if slices.is_empty() {
            let _ = writeln!(out, "  (no expenses entered)");
            return;
        }

        let total: f64 = slices.iter().map(|s| s.value).sum();
        let max = slices.iter().map(|s| s.value).fold(0.0, f64::max);
        let label_width = slices.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
        for slice in slices {
            let share = if total > 0.0 {
                slice.value / total * 100.0
            } else {
                0.0
            };
            let _ = writeln!(
                out,
                "  {:<label_width$}  {:<bar_width$}  {:>5.1}%  {}",
                slice.name,
                self.bar(slice.value, max),
                share,
                format_inr(slice.value),
                bar_width = self.bar_width,
            );
        }
    }

    fn cash_flow(&self, charts: &ChartData, out: &mut String) {
        let flow = &charts.cash_flow;
        let _ = writeln!(out, "{}", flow.name);
        let max = flow.income.max(flow.expenses).max(flow.surplus);
        for (label, value) in [
            ("Income", flow.income),
            ("Expenses", flow.expenses),
            ("Surplus", flow.surplus),
        ] {
            let _ = writeln!(
                out,
                "  {:<8}  {:<bar_width$}  {}",
                label,
                self.bar(value, max),
                format_inr(value),
                bar_width = self.bar_width,
            );
        }
    }

    fn projection(&self, charts: &ChartData, out: &mut String) {
        let _ = writeln!(out, "Investment Projection");
        let points = &charts.investment_projection;
        let step = self.projection_step.max(1);
        let last = points.last().map(|p| p.month);
        for point in points
            .iter()
            .filter(|p| p.month % step == 0 || Some(p.month) == last)
        {
            let _ = writeln!(
                out,
                "  Month {:>4}  {:>10}  {}",
                point.month,
                format_inr_short(point.value),
                format_inr(point.value)
            );
        }
    }
}

impl ChartRenderer for TerminalCharts {
    fn render(&self, charts: &ChartData) -> String {
        let mut out = String::new();
        self.expense_breakdown(charts, &mut out);
        out.push('\n');
        self.cash_flow(charts, &mut out);
        out.push('\n');
        self.projection(charts, &mut out);
        out
    }
}

/// Sheet as a left-aligned text table with a rule under the header.
pub fn sheet_table(sheet: &Sheet) -> String {
    let widths = column_widths(sheet);
    let line = |row: &[Cell]| {
        row.iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell.display()))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = format!("{}\n", sheet.name);
    let _ = writeln!(out, "{}", line(sheet.header()));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in sheet.data_rows() {
        let _ = writeln!(out, "{}", line(row.as_slice()));
    }
    out
}
