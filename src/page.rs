use std::fmt::Write;

use polars::prelude::*;

use crate::chart;
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::query::GenreSeries;
use crate::sidebar::{SCORE_BOUNDS, SCORE_HELP, SCORE_STEP, SELECTION_HELP};

const STYLE: &str = "\
body{margin:0;font-family:sans-serif;color:#262730}\
.layout{display:flex;min-height:100vh}\
aside{width:300px;padding:1.5rem;background:#f0f2f6;box-sizing:border-box}\
aside label{display:block;margin-top:1rem;font-weight:600}\
aside select{width:100%}\
main{flex:1;padding:1.5rem 3rem}\
.row{display:flex;gap:2rem}\
.row>section{flex:1;min-width:0}\
.table{max-height:350px;overflow:auto;border:1px solid #ddd}\
table{border-collapse:collapse;width:100%}\
th,td{padding:.25rem .5rem;border-bottom:1px solid #eee;text-align:left}\
td.index{color:#999}";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// The whole dashboard page for one render pass.
pub fn render(dashboard: &Dashboard) -> Result<String> {
    let counts = GenreSeries::from_frame(&dashboard.score_counts, "count")?;
    let means = GenreSeries::from_frame(&dashboard.budget_means, "budget")?;

    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(
        html,
        "<html><head><meta charset=\"utf-8\"><title>Interactive Dashboard</title><style>{STYLE}</style></head>"
    )?;
    writeln!(html, "<body><div class=\"layout\">")?;
    sidebar(&mut html, dashboard)?;

    writeln!(html, "<main><h1>Interactive Dashboard</h1><div class=\"row\">")?;
    writeln!(
        html,
        "<section><h3>Lists of movies filtered by year and Genre</h3>"
    )?;
    movie_table(&mut html, &dashboard.movies)?;
    writeln!(html, "</section>")?;
    writeln!(
        html,
        "<section><h3>User Score of Movies and Their Genre</h3>{}</section>",
        chart::score_line_chart(&counts)?
    )?;
    writeln!(html, "</div>")?;
    writeln!(
        html,
        "<p>Average Movie Budget, Grouped by Genre</p>{}",
        chart::budget_bar_chart(&means)?
    )?;
    writeln!(html, "</main></div></body></html>")?;
    Ok(html)
}

fn sidebar(html: &mut String, dashboard: &Dashboard) -> Result<()> {
    let selection = &dashboard.selection;
    let (min, max) = selection.score_range;
    let (lo, hi) = SCORE_BOUNDS;

    writeln!(
        html,
        "<aside><form method=\"get\" action=\"/\" onchange=\"this.submit()\">"
    )?;
    writeln!(html, "<input type=\"hidden\" name=\"submitted\" value=\"1\">")?;

    writeln!(html, "<p>{}</p>", escape(SCORE_HELP))?;
    writeln!(html, "<label>Choose a value: {min:.1} &ndash; {max:.1}</label>")?;
    for (name, value) in [("score_min", min), ("score_max", max)] {
        writeln!(
            html,
            "<input type=\"range\" name=\"{name}\" min=\"{lo:.1}\" max=\"{hi:.1}\" step=\"{SCORE_STEP}\" value=\"{value:.1}\">"
        )?;
    }

    writeln!(html, "<p>{}</p>", escape(SELECTION_HELP))?;
    writeln!(html, "<label for=\"genre\">Select Genre</label>")?;
    writeln!(html, "<select id=\"genre\" name=\"genre\" multiple size=\"8\">")?;
    for genre in &dashboard.options.genres {
        let selected = if selection.genres.contains(genre) { " selected" } else { "" };
        let genre = escape(genre);
        writeln!(html, "<option value=\"{genre}\"{selected}>{genre}</option>")?;
    }
    writeln!(html, "</select>")?;

    writeln!(html, "<label for=\"year\">Select Year</label>")?;
    writeln!(html, "<select id=\"year\" name=\"year\">")?;
    for year in &dashboard.options.years {
        let selected = if selection.year.as_ref() == Some(year) { " selected" } else { "" };
        let year = escape(year);
        writeln!(html, "<option value=\"{year}\"{selected}>{year}</option>")?;
    }
    writeln!(html, "</select>")?;

    writeln!(html, "<noscript><button type=\"submit\">Apply</button></noscript>")?;
    writeln!(html, "</form></aside>")?;
    Ok(())
}

/// Filtered movies with a fresh 0-based index, like a reset index.
fn movie_table(html: &mut String, movies: &DataFrame) -> Result<()> {
    writeln!(html, "<div class=\"table\"><table>")?;
    writeln!(html, "<tr><th></th><th>name</th><th>genre</th><th>year</th></tr>")?;

    let cell = |value: Option<&str>| value.map(escape).unwrap_or_else(|| "None".to_string());
    for (index, ((name, genre), year)) in movies
        .column("name")?
        .str()?
        .into_iter()
        .zip(movies.column("genre")?.str()?)
        .zip(movies.column("year")?.str()?)
        .enumerate()
    {
        writeln!(
            html,
            "<tr><td class=\"index\">{index}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            cell(name),
            cell(genre),
            cell(year)
        )?;
    }
    writeln!(html, "</table></div>")?;
    Ok(())
}
