use polars::prelude::*;

/// Rows released in `year` whose genre is one of `genres`, projected to
/// `name, genre, year`. No year or no genres gives an empty table.
pub fn movies_by_year_and_genre(
    movies: &DataFrame,
    year: Option<&str>,
    genres: &[String],
) -> PolarsResult<DataFrame> {
    let projection = [col("name"), col("genre"), col("year")];

    let genre_pred = genres
        .iter()
        .map(|genre| col("genre").eq(lit(genre.as_str())))
        .reduce(|acc, pred| acc.or(pred));

    match (year, genre_pred) {
        (Some(year), Some(genre_pred)) => movies
            .clone()
            .lazy()
            .filter(col("year").eq(lit(year)).and(genre_pred))
            .select(projection)
            .collect(),
        _ => Ok(movies.clone().lazy().select(projection).collect()?.clear()),
    }
}

/// Number of movies per genre whose score lies in the closed `range`.
/// Genres with no such movie do not appear.
pub fn score_counts_by_genre(movies: &DataFrame, range: (f64, f64)) -> PolarsResult<DataFrame> {
    let (min, max) = range;
    movies
        .clone()
        .lazy()
        .filter(
            col("score")
                .gt_eq(lit(min))
                .and(col("score").lt_eq(lit(max)))
                .and(col("genre").is_not_null()),
        )
        .group_by([col("genre")])
        // IdxSize is u32 unless polars is built with bigidx
        .agg([len().cast(DataType::UInt64).alias("count")])
        .sort(["genre"], SortMultipleOptions::default())
        .collect()
}

/// Mean budget per genre over every row, rounded half to even.
pub fn mean_budget_by_genre(movies: &DataFrame) -> PolarsResult<DataFrame> {
    let means = movies
        .clone()
        .lazy()
        .filter(col("genre").is_not_null())
        .group_by([col("genre")])
        .agg([col("budget").mean()])
        .sort(["genre"], SortMultipleOptions::default())
        .collect()?;

    let genres: Vec<&str> = means.column("genre")?.str()?.into_no_null_iter().collect();
    let budgets: Vec<Option<f64>> = means
        .column("budget")?
        .f64()?
        .into_iter()
        .map(|mean| mean.map(f64::round_ties_even))
        .collect();

    df!("genre" => genres, "budget" => budgets)
}

/// A two-column aggregate (`genre`, value) pulled out of its frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenreSeries {
    pub genres: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl GenreSeries {
    /// Works for any numeric value column; counts and means both come out as f64.
    pub fn from_frame(frame: &DataFrame, value_column: &str) -> PolarsResult<Self> {
        let values = frame.column(value_column)?.cast(&DataType::Float64)?;
        let (genres, values) = frame
            .column("genre")?
            .str()?
            .into_iter()
            .zip(values.f64()?)
            .filter_map(|(genre, value)| Some((genre?.to_string(), value)))
            .unzip();
        Ok(GenreSeries { genres, values })
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// Largest present value, if any.
    pub fn max_value(&self) -> Option<f64> {
        self.values.iter().flatten().copied().reduce(f64::max)
    }
}
