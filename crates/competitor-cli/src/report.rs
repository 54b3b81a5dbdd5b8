//! Plain-text rendering of an analysis result

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use competitor_engine::insights::percent;
use competitor_engine::{AnalysisResult, ScoredStock, format_market_cap};

const NAME_WIDTH: usize = 20;

pub fn render(result: &AnalysisResult) -> String {
    let main = &result.main_stock;
    let rule = "=".repeat(70);
    let mut lines = vec![
        rule.clone(),
        "INVESTMENT RANKINGS & ANALYSIS".to_string(),
        rule.clone(),
        format!(
            "{} ranks #{} out of {} analyzed stocks",
            main.symbol(),
            result.main_rank(),
            result.total_stocks()
        ),
        format!("Company:         {}", main.snapshot.name),
        format!("Sector:          {} / {}", main.snapshot.sector, main.snapshot.industry),
        format!("Market Cap:      {}", format_market_cap(main.snapshot.market_cap)),
        format!("Current Price:   {}", money(main.snapshot.current_price)),
        format!("Score:           {:.1}/100", main.score),
        format!("Recommendation:  {}", main.recommendation),
        format!("Target Price:    {}", money(main.target_price)),
        format!("Risk Level:      {}", main.risk_level),
        rule,
        String::new(),
        "COMPLETE RANKINGS (best to worst):".to_string(),
        rankings_table(result).to_string(),
        "* = analyzed stock".to_string(),
    ];

    let insights = result.insights();
    lines.push(String::new());
    lines.push(format!("QUICK INSIGHT: {}", result.rank_summary()));
    section(&mut lines, "STRENGTHS", &insights.strengths);
    section(&mut lines, "WEAKNESSES", &insights.weaknesses);
    section(&mut lines, "RISKS", &insights.risks);
    lines.push(String::new());
    lines.push("INVESTMENT THESIS".to_string());
    lines.push(insights.thesis);

    lines.join("\n")
}

pub fn rankings_table(result: &AnalysisResult) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Rank", "Symbol", "Company", "Price", "Market Cap", "P/E", "ROE", "Score", "Rec",
        ]);

    let main_symbol = result.main_stock.symbol();
    for (i, stock) in result.all_stocks.iter().enumerate() {
        table.add_row(row(i + 1, stock, stock.symbol() == main_symbol));
    }
    table
}

fn row(rank: usize, stock: &ScoredStock, is_main: bool) -> Vec<Cell> {
    let snapshot = &stock.snapshot;
    let symbol = if is_main {
        format!("*{}", snapshot.symbol)
    } else {
        snapshot.symbol.clone()
    };

    vec![
        Cell::new(format!("#{rank}")),
        Cell::new(symbol),
        Cell::new(truncate(&snapshot.name, NAME_WIDTH)),
        Cell::new(money(snapshot.current_price)),
        Cell::new(format_market_cap(snapshot.market_cap)),
        Cell::new(snapshot.pe_ratio.map_or_else(na, |pe| format!("{pe:.1}"))),
        Cell::new(snapshot.roe.map_or_else(na, percent)),
        Cell::new(format!("{:.1}", stock.score)),
        Cell::new(stock.recommendation),
    ]
}

fn section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(title.to_string());
    lines.extend(items.iter().map(|item| format!("  - {item}")));
}

fn money(value: Option<f64>) -> String {
    value.map_or_else(na, |v| format!("${v:.2}"))
}

fn na() -> String {
    "N/A".to_string()
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let head: String = name.chars().take(width - 2).collect();
        format!("{head}..")
    } else {
        name.to_string()
    }
}
