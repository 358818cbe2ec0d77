use rustc_hash::FxHashSet as HashSet;
use tracing::warn;

pub const SCORE_BOUNDS: (f64, f64) = (0.0, 10.0);
pub const DEFAULT_SCORE_WINDOW: (f64, f64) = (3.0, 4.0);
pub const SCORE_STEP: f64 = 0.1;
pub const DEFAULT_GENRES: [&str; 4] = ["Animation", "Horror", "Fantasy", "Romance"];

pub const SCORE_HELP: &str = "Select a range on the slider (it represents movie score) to view \
    the total number of movies in a genre that falls within that range";
pub const SELECTION_HELP: &str = "Select your preferred genre(s) and year to view the movies \
    released that year and on that genre";

/// Option lists the widgets are populated from.
#[derive(Debug, Clone, Default)]
pub struct SidebarOptions {
    pub genres: Vec<String>,
    pub years: Vec<String>,
}

/// What the user sent, before it is checked against the options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionInput {
    pub score_min: Option<f64>,
    pub score_max: Option<f64>,
    /// `None` means nothing was submitted yet, so the preset applies.
    pub genres: Option<Vec<String>>,
    pub year: Option<String>,
}

impl SelectionInput {
    /// Read widget values from query string pairs. Unparsable numbers are
    /// treated as absent.
    pub fn from_query(pairs: &[(String, String)]) -> Self {
        let mut input = SelectionInput::default();
        let mut submitted = false;
        let mut genres = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "score_min" => input.score_min = value.trim().parse().ok(),
                "score_max" => input.score_max = value.trim().parse().ok(),
                "year" => input.year = Some(value.clone()),
                "genre" => genres.push(value.clone()),
                "submitted" => submitted = true,
                _ => {}
            }
        }

        if submitted || !genres.is_empty() {
            input.genres = Some(genres);
        }
        input
    }
}

/// A resolved sidebar state, ready to drive the queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub score_range: (f64, f64),
    pub genres: Vec<String>,
    pub year: Option<String>,
}

impl Selection {
    pub fn resolve(input: &SelectionInput, options: &SidebarOptions) -> Self {
        Selection {
            score_range: score_range(input.score_min, input.score_max),
            genres: genre_selection(input.genres.as_deref(), &options.genres),
            year: year_selection(input.year.as_deref(), &options.years),
        }
    }
}

fn snap_score(value: f64) -> f64 {
    let (lo, hi) = SCORE_BOUNDS;
    let steps = ((value.clamp(lo, hi) - lo) / SCORE_STEP).round();
    // steps * 0.1 drifts (3 * 0.1 != 0.3); dividing by 10 keeps the literal.
    lo + steps / (1.0 / SCORE_STEP).round()
}

fn score_range(min: Option<f64>, max: Option<f64>) -> (f64, f64) {
    let (default_min, default_max) = DEFAULT_SCORE_WINDOW;
    let min = snap_score(min.filter(|v| v.is_finite()).unwrap_or(default_min));
    let max = snap_score(max.filter(|v| v.is_finite()).unwrap_or(default_max));
    if min <= max { (min, max) } else { (max, min) }
}

fn genre_selection(submitted: Option<&[String]>, options: &[String]) -> Vec<String> {
    let known: HashSet<&str> = options.iter().map(String::as_str).collect();

    match submitted {
        Some(genres) => {
            let mut seen: HashSet<&str> = HashSet::default();
            genres
                .iter()
                .filter(|genre| known.contains(genre.as_str()) && seen.insert(genre.as_str()))
                .cloned()
                .collect()
        }
        None => DEFAULT_GENRES
            .iter()
            .filter(|genre| {
                let present = known.contains(*genre);
                if !present {
                    warn!(genre = %genre, "preset genre missing from dataset, skipped");
                }
                present
            })
            .map(|genre| genre.to_string())
            .collect(),
    }
}

fn year_selection(submitted: Option<&str>, options: &[String]) -> Option<String> {
    submitted
        .and_then(|year| options.iter().find(|option| option.as_str() == year))
        .or_else(|| options.first())
        .cloned()
}

#[cfg(test)]
mod test_sidebar {
    use super::*;

    fn options() -> SidebarOptions {
        SidebarOptions {
            genres: ["Drama", "Animation", "Horror", "Fantasy", "Romance"]
                .map(String::from)
                .to_vec(),
            years: ["1980", "1981", "1982"].map(String::from).to_vec(),
        }
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_load_uses_defaults() {
        let selection = Selection::resolve(&SelectionInput::from_query(&[]), &options());
        assert_eq!(selection.score_range, (3.0, 4.0));
        assert_eq!(
            selection.genres,
            vec!["Animation", "Horror", "Fantasy", "Romance"]
        );
        assert_eq!(selection.year.as_deref(), Some("1980"));
    }

    #[test]
    fn test_preset_genres_absent_from_data_are_dropped() {
        let options = SidebarOptions {
            genres: vec!["Horror".to_string(), "Drama".to_string()],
            years: vec![],
        };
        let selection = Selection::resolve(&SelectionInput::default(), &options);
        assert_eq!(selection.genres, vec!["Horror"]);
        assert_eq!(selection.year, None);
    }

    #[test]
    fn test_submitted_form() {
        let input = SelectionInput::from_query(&pairs(&[
            ("score_min", "7.26"),
            ("score_max", "12"),
            ("genre", "Drama"),
            ("genre", "Western"),
            ("genre", "Drama"),
            ("year", "1982"),
            ("submitted", "1"),
        ]));
        let selection = Selection::resolve(&input, &options());
        assert_eq!(selection.score_range, (7.3, 10.0));
        assert_eq!(selection.genres, vec!["Drama"]);
        assert_eq!(selection.year.as_deref(), Some("1982"));
    }

    #[test]
    fn test_empty_genre_submission_stays_empty() {
        let input = SelectionInput::from_query(&pairs(&[("submitted", "1")]));
        assert_eq!(input.genres, Some(vec![]));
        let selection = Selection::resolve(&input, &options());
        assert!(selection.genres.is_empty());
    }

    #[test]
    fn test_score_range_is_ordered_and_clamped() {
        let input = SelectionInput::from_query(&pairs(&[
            ("score_min", "9.0"),
            ("score_max", "-1"),
        ]));
        let selection = Selection::resolve(&input, &options());
        assert_eq!(selection.score_range, (0.0, 9.0));

        let input = SelectionInput::from_query(&pairs(&[("score_min", "abc")]));
        assert_eq!(input.score_min, None);
        let selection = Selection::resolve(&input, &options());
        assert_eq!(selection.score_range, (3.0, 4.0));
    }

    #[test]
    fn test_snapped_values_match_literals() {
        assert_eq!(snap_score(0.3), 0.3);
        assert_eq!(snap_score(0.34), 0.3);
        assert_eq!(snap_score(6.66), 6.7);
    }

    #[test]
    fn test_unknown_year_falls_back_to_first_option() {
        let input = SelectionInput {
            year: Some("2999".to_string()),
            ..SelectionInput::default()
        };
        let selection = Selection::resolve(&input, &options());
        assert_eq!(selection.year.as_deref(), Some("1980"));
    }
}
