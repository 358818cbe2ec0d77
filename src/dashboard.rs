use std::time::Instant;

use polars::prelude::*;
use tracing::debug;

use crate::data::{DataSource, MovieData};
use crate::error::Result;
use crate::page;
use crate::query::{mean_budget_by_genre, movies_by_year_and_genre, score_counts_by_genre};
use crate::sidebar::{Selection, SelectionInput, SidebarOptions};

/// Everything one render pass computed. Lives only as long as the pass.
pub struct Dashboard {
    pub options: SidebarOptions,
    pub selection: Selection,
    /// `name, genre, year` of the movies matching the year and genres.
    pub movies: DataFrame,
    /// `genre, count` within the score range.
    pub score_counts: DataFrame,
    /// `genre, budget` over the whole table.
    pub budget_means: DataFrame,
}

impl Dashboard {
    pub fn build(data: &MovieData, input: &SelectionInput) -> PolarsResult<Self> {
        let start = Instant::now();

        let options = SidebarOptions {
            genres: data.genres()?,
            years: data.years()?,
        };
        let selection = Selection::resolve(input, &options);

        let movies = movies_by_year_and_genre(
            &data.movies,
            selection.year.as_deref(),
            &selection.genres,
        )?;
        let score_counts = score_counts_by_genre(&data.movies, selection.score_range)?;
        let budget_means = mean_budget_by_genre(&data.movies)?;

        debug!(
            year = ?selection.year,
            genres = selection.genres.len(),
            score_range = ?selection.score_range,
            listed = movies.height(),
            elapsed = ?start.elapsed(),
            "dashboard computed"
        );

        Ok(Dashboard {
            options,
            selection,
            movies,
            score_counts,
            budget_means,
        })
    }

    pub fn to_html(&self) -> Result<String> {
        page::render(self)
    }
}

/// One full top-to-bottom run: fetch, coerce, resolve the sidebar, compute.
/// Nothing is kept between runs.
pub fn render_pass(source: &DataSource, input: &SelectionInput) -> Result<Dashboard> {
    let data = MovieData::load(source)?;
    Ok(Dashboard::build(&data, input)?)
}

#[cfg(test)]
mod test_dashboard {
    use super::*;
    use crate::data::fixture;

    #[test]
    fn test_default_pass() -> Result<(), PolarsError> {
        let dashboard = Dashboard::build(&fixture::movies(), &SelectionInput::default())?;

        assert_eq!(dashboard.selection.year.as_deref(), Some("1980"));
        assert_eq!(dashboard.selection.score_range, (3.0, 4.0));
        // nothing from the preset genres came out in 1980
        assert_eq!(dashboard.movies.height(), 0);
        assert_eq!(dashboard.score_counts.height(), 2);
        assert_eq!(dashboard.budget_means.height(), 8);
        Ok(())
    }

    #[test]
    fn test_budget_means_do_not_follow_selection() -> Result<(), PolarsError> {
        let data = fixture::movies();
        let a = Dashboard::build(&data, &SelectionInput::default())?;
        let b = Dashboard::build(
            &data,
            &SelectionInput {
                score_min: Some(8.0),
                score_max: Some(9.0),
                genres: Some(vec!["Horror".to_string()]),
                year: Some("1981".to_string()),
            },
        )?;
        assert!(a.budget_means.equals_missing(&b.budget_means));
        assert_eq!(b.movies.height(), 1);
        Ok(())
    }

    #[test]
    fn test_render_pass_from_file() -> Result<()> {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/movies.csv");
        let dashboard = render_pass(&DataSource::from(path), &SelectionInput::default())?;
        assert_eq!(dashboard.options.years, vec!["1980", "1981"]);
        // Clash of the Titans, Caddyshack, Endless Love
        let total: u64 = dashboard.score_counts.column("count")?.u64()?.into_no_null_iter().sum();
        assert_eq!(total, 3);
        assert!(dashboard.to_html()?.contains("Interactive Dashboard"));
        Ok(())
    }

    #[test]
    fn test_missing_source_aborts_the_pass() {
        let source = DataSource::from("/nonexistent/movies.csv");
        assert!(render_pass(&source, &SelectionInput::default()).is_err());
    }
}
