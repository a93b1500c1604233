use itertools::Itertools;

use crate::model::CountryStats;

/// Group `(museum country, year_created)` rows into per-country statistics.
///
/// Each row is one artwork joined to its museum, so a country only appears
/// when at least one artwork links to it. The mean ignores rows without a
/// year and is `None` when none of the group's rows have one.
pub fn summarize_by_country<I>(rows: I) -> Vec<CountryStats>
where
    I: IntoIterator<Item = (Option<String>, Option<i32>)>,
{
    let mut stats: Vec<CountryStats> = rows
        .into_iter()
        .into_group_map()
        .into_iter()
        .map(|(country, years)| {
            let known: Vec<f64> = years.iter().flatten().map(|&year| f64::from(year)).collect();
            let average_year = if known.is_empty() {
                None
            } else {
                Some(known.iter().sum::<f64>() / known.len() as f64)
            };

            CountryStats {
                country,
                artwork_count: years.len() as u64,
                average_year,
            }
        })
        .collect();

    sort_by_country(&mut stats);
    stats
}

/// Order rows by country name with the country-less group last, matching
/// `ORDER BY country` in Postgres.
pub fn sort_by_country(stats: &mut [CountryStats]) {
    stats.sort_by(|a, b| {
        a.country
            .is_none()
            .cmp(&b.country.is_none())
            .then_with(|| a.country.cmp(&b.country))
    });
}
