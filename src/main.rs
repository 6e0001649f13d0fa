use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;

use finance_planner::advice::AdviceService;
use finance_planner::api::{AppState, plan_input_from_json, run_http_server};
use finance_planner::config::{AdviceSettings, Cli, Command, OutputFormat, init_logger};
use finance_planner::core::{PlanInput, PlanResult, generate_plan};
use finance_planner::export::{SheetExporter, XlsxExporter, default_file_name};
use finance_planner::render::{ChartRenderer, TerminalCharts, sheet_table};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    let settings = AdviceSettings::from(cli.advice);

    match cli.command {
        Command::Serve(args) => {
            let advice = AdviceService::from_settings(&settings)?;
            let state = AppState::new(advice, XlsxExporter);
            run_http_server(args.socket_addr(), state)
                .await
                .context("HTTP server failed")?;
        }
        Command::Plan(args) => {
            let plan = generate_plan(&load_input(args.input.as_deref())?);
            let answer = match args.ask.as_deref().map(str::trim) {
                Some("") => bail!("--ask needs a non-empty question"),
                Some(question) => {
                    let advice = AdviceService::from_settings(&settings)?;
                    Some(advice.ask(&plan, question).await)
                }
                None => None,
            };

            match args.format {
                OutputFormat::Json => {
                    let body = match answer {
                        Some(answer) => serde_json::json!({ "plan": plan, "answer": answer }),
                        None => serde_json::to_value(&plan)?,
                    };
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Text => {
                    print_plan(&plan);
                    if let Some(answer) = answer {
                        println!("FinPal\n{answer}");
                    }
                }
            }
        }
        Command::Export(args) => {
            let plan = generate_plan(&load_input(args.input.as_deref())?);
            let path = args.output.unwrap_or_else(|| {
                PathBuf::from(default_file_name(chrono::Local::now().date_naive()))
            });
            XlsxExporter
                .save(&plan.sheets, &path)
                .with_context(|| format!("failed to export plan to {}", path.display()))?;
            println!("Plan exported to {}", path.display());
        }
    }

    Ok(())
}

fn load_input(path: Option<&Path>) -> Result<PlanInput> {
    let Some(path) = path else {
        return Ok(PlanInput::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    plan_input_from_json(&json).map_err(|msg| anyhow!("{}: {msg}", path.display()))
}

fn print_plan(plan: &PlanResult) {
    println!("{}", TerminalCharts::default().render(&plan.chart_data));
    for sheet in &plan.sheets {
        println!("{}", sheet_table(sheet));
    }
}
