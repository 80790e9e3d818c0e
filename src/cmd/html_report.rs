//! HTML report generation for an asset register
//!
//! Generates a self-contained HTML file with embedded CSS/JS for interactive filtering.

use crate::cmd::read_register;
use crate::cmd::register::{AssetRow, RegisterArgs, TotalsOutput};
use crate::core::{value_register, RegisterValuation};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct HtmlCommand {
    #[command(flatten)]
    register: RegisterArgs,

    /// Output file path (default: opens in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl HtmlCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let loaded = read_register(&self.register.assets)?;
        let as_of = self.register.as_of(loaded.as_of);
        let valuation = value_register(&loaded.assets, as_of, &self.register.filter());

        let html = generate(&valuation)?;

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)?;
            println!("HTML report written to: {}", output_path.display());
        } else {
            // Write to temp file and open in browser
            let temp_path = std::env::temp_dir().join("assetbook-register.html");
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened HTML report in browser: {}", temp_path.display());
        }

        Ok(())
    }
}

/// Data structure for embedding in HTML as JSON
#[derive(Serialize)]
pub struct HtmlReportData {
    pub as_of: String,
    pub assets: Vec<AssetRow>,
    pub totals: TotalsOutput,
    pub categories: Vec<String>,
    pub locations: Vec<String>,
}

fn build_report_data(valuation: &RegisterValuation) -> HtmlReportData {
    let assets: Vec<AssetRow> = valuation.assets.iter().map(AssetRow::from).collect();
    let categories: BTreeSet<String> = assets.iter().map(|a| a.category.clone()).collect();
    let locations: BTreeSet<String> = assets.iter().map(|a| a.location.clone()).collect();
    HtmlReportData {
        as_of: valuation.as_of.to_string(),
        totals: (&valuation.totals).into(),
        assets,
        categories: categories.into_iter().collect(),
        locations: locations.into_iter().collect(),
    }
}

/// Generate HTML report content
pub fn generate(valuation: &RegisterValuation) -> anyhow::Result<String> {
    let data = build_report_data(valuation);
    // keep "</script>" inside string values from closing the script element
    let json_data = serde_json::to_string(&data)?.replace("</", "<\\/");

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Asset Register</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <h1>Asset Register <span class="as-of">as of {as_of}</span></h1>
        <div class="filters">
            <div class="filter-group">
                <label for="search">Search</label>
                <input type="text" id="search" placeholder="ID or name..." oninput="applyFilters()">
            </div>
            <div class="filter-group">
                <label for="category">Category</label>
                <select id="category" onchange="applyFilters()"><option value="">All</option></select>
            </div>
            <div class="filter-group">
                <label for="location">Location</label>
                <select id="location" onchange="applyFilters()"><option value="">All</option></select>
            </div>
            <button class="reset-btn" onclick="resetFilters()">Reset Filters</button>
        </div>
    </header>

    <main>
        <section class="summary-cards">
            <div class="card"><h3>Assets</h3><p class="value" id="summary-count">-</p></div>
            <div class="card"><h3>Cost</h3><p class="value" id="summary-cost">-</p></div>
            <div class="card"><h3>Accumulated</h3><p class="value" id="summary-accumulated">-</p></div>
            <div class="card"><h3>Book Value</h3><p class="value" id="summary-book">-</p></div>
            <div class="card"><h3>Monthly Charge</h3><p class="value" id="summary-monthly">-</p></div>
        </section>

        <table>
            <thead>
                <tr>
                    <th>ID</th><th>Name</th><th>Category</th><th>Location</th><th>Status</th>
                    <th>Purchased</th><th class="num">Cost</th><th class="num">Life</th>
                    <th class="num">Months</th><th class="num">Monthly</th>
                    <th class="num">Accumulated</th><th class="num">Book Value</th><th>Notes</th>
                </tr>
            </thead>
            <tbody id="assets-body"></tbody>
        </table>
    </main>

    <script>
const DATA = {json_data};

function esc(s) {{
    return String(s).replace(/[&<>"']/g, c => ({{'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}}[c]));
}}

function fillSelect(id, values) {{
    const select = document.getElementById(id);
    values.forEach(v => {{
        const opt = document.createElement('option');
        opt.value = v;
        opt.textContent = v;
        select.appendChild(opt);
    }});
}}

function num(value) {{
    const n = parseFloat(value);
    return isNaN(n) ? 0 : n;
}}

function money(n) {{
    return n.toLocaleString(undefined, {{ minimumFractionDigits: 2, maximumFractionDigits: 2 }});
}}

function applyFilters() {{
    const search = document.getElementById('search').value.toLowerCase();
    const category = document.getElementById('category').value;
    const location = document.getElementById('location').value;
    const rows = DATA.assets.filter(a =>
        (!search || a.id.toLowerCase().includes(search) || a.name.toLowerCase().includes(search)) &&
        (!category || a.category === category) &&
        (!location || a.location === location));
    render(rows);
}}

function resetFilters() {{
    document.getElementById('search').value = '';
    document.getElementById('category').value = '';
    document.getElementById('location').value = '';
    applyFilters();
}}

function render(rows) {{
    const tbody = document.getElementById('assets-body');
    tbody.innerHTML = rows.map(a => `<tr class="${{a.notes ? 'flagged' : ''}}">
        <td>${{esc(a.id)}}</td><td>${{esc(a.name)}}</td><td>${{esc(a.category)}}</td>
        <td>${{esc(a.location)}}</td><td>${{esc(a.status)}}</td><td>${{esc(a.purchase_date)}}</td>
        <td class="num">${{esc(a.purchase_price)}}</td><td class="num">${{esc(a.useful_life_years)}}</td>
        <td class="num">${{esc(a.months_elapsed)}}</td><td class="num">${{esc(a.monthly_depreciation)}}</td>
        <td class="num">${{esc(a.accumulated_depreciation)}}</td><td class="num">${{esc(a.book_value)}}</td>
        <td>${{esc(a.notes)}}</td></tr>`).join('');

    const valued = rows.filter(a => a.book_value !== '-');
    const sum = f => valued.reduce((acc, a) => acc + num(a[f]), 0);
    const charging = valued.filter(a => num(a.book_value) > 0);
    document.getElementById('summary-count').textContent = rows.length;
    document.getElementById('summary-cost').textContent = money(sum('purchase_price'));
    document.getElementById('summary-accumulated').textContent = money(sum('accumulated_depreciation'));
    document.getElementById('summary-book').textContent = money(sum('book_value'));
    document.getElementById('summary-monthly').textContent =
        money(charging.reduce((acc, a) => acc + num(a.monthly_depreciation), 0));
}}

fillSelect('category', DATA.categories);
fillSelect('location', DATA.locations);
applyFilters();
    </script>
</body>
</html>
"##,
        css = CSS,
        as_of = data.as_of,
        json_data = json_data,
    ))
}

const CSS: &str = r#"
        body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; margin: 0; color: #1f2933; background: #f5f7fa; }
        header { background: #243b53; color: #fff; padding: 1rem 2rem; }
        h1 { margin: 0 0 0.75rem; font-size: 1.5rem; }
        .as-of { font-size: 0.9rem; font-weight: normal; opacity: 0.8; }
        .filters { display: flex; gap: 1rem; align-items: flex-end; flex-wrap: wrap; }
        .filter-group { display: flex; flex-direction: column; gap: 0.25rem; }
        .filter-group label { font-size: 0.75rem; text-transform: uppercase; opacity: 0.8; }
        input, select { padding: 0.35rem 0.5rem; border-radius: 4px; border: 1px solid #829ab1; }
        .reset-btn { padding: 0.4rem 0.8rem; border: none; border-radius: 4px; background: #627d98; color: #fff; cursor: pointer; }
        main { padding: 1.5rem 2rem; }
        .summary-cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 1rem; margin-bottom: 1.5rem; }
        .card { background: #fff; border-radius: 6px; padding: 0.75rem 1rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
        .card h3 { margin: 0; font-size: 0.75rem; text-transform: uppercase; color: #627d98; }
        .card .value { margin: 0.25rem 0 0; font-size: 1.3rem; font-weight: 600; }
        table { width: 100%; border-collapse: collapse; background: #fff; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
        th, td { padding: 0.45rem 0.6rem; border-bottom: 1px solid #e4e7eb; font-size: 0.85rem; text-align: left; }
        th { background: #f0f4f8; font-weight: 600; }
        .num { text-align: right; font-variant-numeric: tabular-nums; }
        tr.flagged td { background: #fffbea; }
"#;
