//! Season reports for paddock.
//!
//! Each report is a pure aggregation over the loaded results plus a chart.
//! Aggregations never fail: a name that matches nothing yields an empty
//! series, which renders as an empty chart.
//!
//! Rankings are ordered by value descending, ties broken by name ascending,
//! so output does not depend on the order rows were read in.

mod chart;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::ops::Add;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::RaceResultRecord;

/// Number of entries kept by the bar chart rankings.
pub const TOP_RANKED: usize = 10;

/// Number of drivers shown in the points distribution.
pub const TOP_DISTRIBUTION: usize = 5;

/// A named, aggregated value in a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranked<'a, T> {
    /// Driver or constructor name.
    pub name: &'a str,
    /// Aggregated value.
    pub value: T,
}

/// Points scored in one round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Round number.
    pub round: u32,
    /// Points scored in that round.
    pub points: f64,
}

/// Per-race points of one driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution<'a> {
    /// Driver name.
    pub driver: &'a str,
    /// Points of every race the driver finished, in table order.
    pub points: Vec<f64>,
}

/// Sum `value` per `key` and keep the top `limit`.
fn rank_by<'a, T, K, V>(
    records: &'a [RaceResultRecord],
    key: K,
    value: V,
    limit: usize,
) -> Vec<Ranked<'a, T>>
where
    T: Copy + Add<Output = T> + PartialOrd,
    K: Fn(&'a RaceResultRecord) -> &'a str,
    V: Fn(&RaceResultRecord) -> Option<T>,
{
    let mut totals: HashMap<&'a str, T> = HashMap::new();
    for record in records {
        if let Some(v) = value(record) {
            totals
                .entry(key(record))
                .and_modify(|total| *total = *total + v)
                .or_insert(v);
        }
    }

    let mut ranked: Vec<_> = totals
        .into_iter()
        .map(|(name, value)| Ranked { name, value })
        .collect();
    ranked.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(b.name))
    });
    ranked.truncate(limit);
    ranked
}

fn driver_totals(records: &[RaceResultRecord], limit: usize) -> Vec<Ranked<'_, f64>> {
    rank_by(records, |r| r.driver.as_str(), |r| Some(r.points), limit)
}

/// Top 10 drivers by total points.
#[must_use]
pub fn driver_points_ranking(records: &[RaceResultRecord]) -> Vec<Ranked<'_, f64>> {
    driver_totals(records, TOP_RANKED)
}

/// Top 10 constructors by total points.
#[must_use]
pub fn constructor_points_ranking(records: &[RaceResultRecord]) -> Vec<Ranked<'_, f64>> {
    rank_by(
        records,
        |r| r.constructor.as_str(),
        |r| Some(r.points),
        TOP_RANKED,
    )
}

/// Top 10 drivers by number of podium finishes.
///
/// Drivers without a podium do not appear.
#[must_use]
pub fn podium_counts(records: &[RaceResultRecord]) -> Vec<Ranked<'_, u32>> {
    rank_by(
        records,
        |r| r.driver.as_str(),
        |r| r.is_podium().then_some(1),
        TOP_RANKED,
    )
}

/// Per-race points of the top 5 drivers, in ranking order.
#[must_use]
pub fn points_distribution(records: &[RaceResultRecord]) -> Vec<Distribution<'_>> {
    driver_totals(records, TOP_DISTRIBUTION)
        .into_iter()
        .map(|ranked| Distribution {
            driver: ranked.name,
            points: records
                .iter()
                .filter(|r| r.driver == ranked.name)
                .map(|r| r.points)
                .collect(),
        })
        .collect()
}

/// Points per round for one driver, by round ascending.
#[must_use]
pub fn driver_trend(records: &[RaceResultRecord], driver: &str) -> Vec<TrendPoint> {
    let mut trend: Vec<_> = records
        .iter()
        .filter(|r| r.driver == driver)
        .map(|r| TrendPoint {
            round: r.round,
            points: r.points,
        })
        .collect();
    trend.sort_by_key(|p| p.round);
    trend
}

/// Team points per round for one constructor, by round ascending.
#[must_use]
pub fn constructor_trend(records: &[RaceResultRecord], constructor: &str) -> Vec<TrendPoint> {
    let mut per_round: BTreeMap<u32, f64> = BTreeMap::new();
    for record in records.iter().filter(|r| r.constructor == constructor) {
        *per_round.entry(record.round).or_insert(0.0) += record.points;
    }

    per_round
        .into_iter()
        .map(|(round, points)| TrendPoint { round, points })
        .collect()
}

/// The six season reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// Top drivers by points, horizontal bars.
    DriverPoints,
    /// Top constructors by points, vertical bars.
    ConstructorPoints,
    /// Top drivers by podiums, vertical bars.
    PodiumCounts,
    /// Per-race points of the top drivers, box plots.
    PointsDistribution,
    /// One driver's points per round, line.
    DriverTrend,
    /// One constructor's points per round, line.
    ConstructorTrend,
}

impl ReportKind {
    /// Every report, in rendering order.
    pub const ALL: [Self; 6] = [
        Self::DriverPoints,
        Self::ConstructorPoints,
        Self::PodiumCounts,
        Self::PointsDistribution,
        Self::DriverTrend,
        Self::ConstructorTrend,
    ];

    /// File name of the chart inside the output directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::DriverPoints => "driver_points.svg",
            Self::ConstructorPoints => "constructor_points.svg",
            Self::PodiumCounts => "podium_counts.svg",
            Self::PointsDistribution => "points_distribution.svg",
            Self::DriverTrend => "driver_trend.svg",
            Self::ConstructorTrend => "constructor_trend.svg",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DriverPoints => write!(f, "driver-points"),
            Self::ConstructorPoints => write!(f, "constructor-points"),
            Self::PodiumCounts => write!(f, "podium-counts"),
            Self::PointsDistribution => write!(f, "points-distribution"),
            Self::DriverTrend => write!(f, "driver-trend"),
            Self::ConstructorTrend => write!(f, "constructor-trend"),
        }
    }
}

/// Renders report charts into an output directory.
#[derive(Debug, Clone)]
pub struct Reporter {
    output_dir: PathBuf,
    driver: String,
    constructor: String,
}

impl Reporter {
    /// Create a reporter writing to `output_dir`, with the subjects of the
    /// two trend charts.
    #[must_use]
    pub fn new(
        output_dir: impl Into<PathBuf>,
        driver: impl Into<String>,
        constructor: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            driver: driver.into(),
            constructor: constructor.into(),
        }
    }

    /// Create a reporter from the `[report]` section of the configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.output_dir(),
            config.report.driver.clone(),
            config.report.constructor.clone(),
        )
    }

    /// Directory charts are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the chart for `kind`.
    #[must_use]
    pub fn chart_path(&self, kind: ReportKind) -> PathBuf {
        self.output_dir.join(kind.file_name())
    }

    /// Render all six charts.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or a chart
    /// cannot be written.
    pub fn render_all(&self, records: &[RaceResultRecord]) -> Result<Vec<PathBuf>> {
        self.render(records, &ReportKind::ALL)
    }

    /// Render the given charts, returning the written paths in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or a chart
    /// cannot be written.
    pub fn render(
        &self,
        records: &[RaceResultRecord],
        kinds: &[ReportKind],
    ) -> Result<Vec<PathBuf>> {
        if !self.output_dir.exists() {
            std::fs::create_dir_all(&self.output_dir).map_err(|source| {
                Error::DirectoryCreate {
                    path: self.output_dir.clone(),
                    source,
                }
            })?;
        }

        let mut written = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let path = self.chart_path(kind);
            self.render_one(records, kind, &path)?;
            debug!("Rendered {} to {}", kind, path.display());
            written.push(path);
        }

        info!(
            "Rendered {} charts into {}",
            written.len(),
            self.output_dir.display()
        );
        Ok(written)
    }

    fn render_one(&self, records: &[RaceResultRecord], kind: ReportKind, path: &Path) -> Result<()> {
        match kind {
            ReportKind::DriverPoints => chart::horizontal_bars(
                path,
                "Top 10 Drivers by Points",
                "Total Points",
                &driver_points_ranking(records),
            ),
            ReportKind::ConstructorPoints => chart::vertical_bars(
                path,
                "Top 10 Constructors by Points",
                "Total Points",
                &constructor_points_ranking(records),
            ),
            ReportKind::PodiumCounts => chart::vertical_bars(
                path,
                "Top 10 Drivers by Podium Finishes",
                "Number of Podiums (Top 3)",
                &podium_counts(records),
            ),
            ReportKind::PointsDistribution => chart::box_plot(
                path,
                "Points per Race Distribution (Top 5 Drivers)",
                &points_distribution(records),
            ),
            ReportKind::DriverTrend => {
                let trend = driver_trend(records, &self.driver);
                if trend.is_empty() {
                    warn!("No results for driver '{}'", self.driver);
                }
                chart::line_with_markers(
                    path,
                    &format!("{} - Points per Race", self.driver),
                    &trend,
                )
            }
            ReportKind::ConstructorTrend => {
                let trend = constructor_trend(records, &self.constructor);
                if trend.is_empty() {
                    warn!("No results for constructor '{}'", self.constructor);
                }
                chart::line_with_markers(
                    path,
                    &format!("{} - Team Points per Round", self.constructor),
                    &trend,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(
        round: u32,
        position: u32,
        driver: &str,
        constructor: &str,
        points: f64,
    ) -> RaceResultRecord {
        RaceResultRecord {
            season: 2023,
            round,
            race: format!("Round {round}"),
            date: NaiveDate::from_ymd_opt(2023, 1, round).unwrap(),
            position,
            driver: driver.to_string(),
            constructor: constructor.to_string(),
            points,
        }
    }

    fn scenario() -> Vec<RaceResultRecord> {
        vec![
            record(1, 1, "A", "Team X", 25.0),
            record(1, 2, "B", "Team Y", 18.0),
            record(2, 2, "A", "Team X", 18.0),
        ]
    }

    /// Fifteen drivers, driver N scoring N points once.
    fn grid() -> Vec<RaceResultRecord> {
        (1..=15)
            .map(|n| {
                record(
                    1,
                    16 - n,
                    &format!("Driver {n:02}"),
                    &format!("Team {n:02}"),
                    f64::from(n),
                )
            })
            .collect()
    }

    #[test]
    fn test_driver_ranking_scenario() {
        let records = scenario();
        let ranking = driver_points_ranking(&records);

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].name, "A");
        assert!((ranking[0].value - 43.0).abs() < f64::EPSILON);
        assert_eq!(ranking[1].name, "B");
        assert!((ranking[1].value - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_driver_trend_scenario() {
        let trend = driver_trend(&scenario(), "A");
        assert_eq!(
            trend,
            vec![
                TrendPoint {
                    round: 1,
                    points: 25.0
                },
                TrendPoint {
                    round: 2,
                    points: 18.0
                },
            ]
        );
    }

    #[test]
    fn test_driver_ranking_top_ten_descending() {
        let records = grid();
        let ranking = driver_points_ranking(&records);

        assert_eq!(ranking.len(), TOP_RANKED);
        assert_eq!(ranking[0].name, "Driver 15");
        assert!(ranking.windows(2).all(|w| w[0].value >= w[1].value));
        assert!(ranking.iter().all(|r| r.name != "Driver 01"));
    }

    #[test]
    fn test_ranking_ties_break_alphabetically() {
        let records = vec![
            record(1, 1, "Zed", "Z", 10.0),
            record(1, 2, "Abe", "A", 10.0),
            record(1, 3, "Moe", "M", 10.0),
        ];

        let names: Vec<_> = driver_points_ranking(&records)
            .iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Abe", "Moe", "Zed"]);

        let mut reversed = records.clone();
        reversed.reverse();
        let names_rev: Vec<_> = driver_points_ranking(&reversed)
            .iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, names_rev);
    }

    #[test]
    fn test_constructor_ranking_sums_both_cars() {
        let records = vec![
            record(1, 1, "A", "Red Bull", 25.0),
            record(1, 2, "B", "Red Bull", 18.0),
            record(1, 3, "C", "Ferrari", 15.0),
        ];
        let ranking = constructor_points_ranking(&records);

        assert_eq!(ranking[0].name, "Red Bull");
        assert!((ranking[0].value - 43.0).abs() < f64::EPSILON);
        assert_eq!(ranking[1].name, "Ferrari");
    }

    #[test]
    fn test_constructor_ranking_top_ten() {
        assert_eq!(constructor_points_ranking(&grid()).len(), TOP_RANKED);
    }

    #[test]
    fn test_podium_counts_only_top_three() {
        let records = vec![
            record(1, 1, "A", "X", 25.0),
            record(1, 3, "B", "Y", 15.0),
            record(1, 4, "C", "Z", 12.0),
            record(2, 2, "A", "X", 18.0),
            record(2, 4, "B", "Y", 12.0),
        ];
        let counts = podium_counts(&records);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0], Ranked { name: "A", value: 2 });
        assert_eq!(counts[1], Ranked { name: "B", value: 1 });
        assert!(counts.iter().all(|c| c.name != "C"));
    }

    #[test]
    fn test_podium_counts_at_most_ten() {
        let records: Vec<_> = (1..=12)
            .flat_map(|n| {
                let driver = format!("Driver {n:02}");
                vec![record(n, 1, &driver, "T", 25.0)]
            })
            .collect();
        let counts = podium_counts(&records);

        assert_eq!(counts.len(), TOP_RANKED);
        assert_eq!(counts[0].name, "Driver 01");
    }

    #[test]
    fn test_points_distribution_top_five() {
        let mut records = grid();
        records.push(record(2, 1, "Driver 15", "Team 15", 25.0));

        let distribution = points_distribution(&records);
        assert_eq!(distribution.len(), TOP_DISTRIBUTION);
        assert_eq!(distribution[0].driver, "Driver 15");
        assert_eq!(distribution[0].points, vec![15.0, 25.0]);
        assert_eq!(distribution[4].driver, "Driver 11");
        assert_eq!(distribution[4].points, vec![11.0]);
    }

    #[test]
    fn test_driver_trend_unknown_driver_is_empty() {
        assert!(driver_trend(&scenario(), "NoSuchDriver").is_empty());
    }

    #[test]
    fn test_driver_trend_sorts_by_round() {
        let records = vec![
            record(3, 1, "A", "X", 25.0),
            record(1, 5, "A", "X", 10.0),
            record(2, 2, "A", "X", 18.0),
        ];
        let rounds: Vec<_> = driver_trend(&records, "A").iter().map(|p| p.round).collect();
        assert_eq!(rounds, vec![1, 2, 3]);
    }

    #[test]
    fn test_constructor_trend_sums_per_round() {
        let records = vec![
            record(2, 1, "A", "Red Bull", 25.0),
            record(1, 1, "A", "Red Bull", 25.0),
            record(1, 2, "B", "Red Bull", 18.0),
            record(1, 3, "C", "Ferrari", 15.0),
        ];
        let trend = constructor_trend(&records, "Red Bull");

        assert_eq!(
            trend,
            vec![
                TrendPoint {
                    round: 1,
                    points: 43.0
                },
                TrendPoint {
                    round: 2,
                    points: 25.0
                },
            ]
        );
    }

    #[test]
    fn test_constructor_trend_unknown_team_is_empty() {
        assert!(constructor_trend(&scenario(), "Minardi").is_empty());
    }

    #[test]
    fn test_aggregations_on_empty_table() {
        let records: Vec<RaceResultRecord> = Vec::new();
        assert!(driver_points_ranking(&records).is_empty());
        assert!(constructor_points_ranking(&records).is_empty());
        assert!(podium_counts(&records).is_empty());
        assert!(points_distribution(&records).is_empty());
    }

    #[test]
    fn test_report_kind_file_names_unique() {
        let mut names: Vec<_> = ReportKind::ALL.iter().map(|k| k.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ReportKind::ALL.len());
    }

    #[test]
    fn test_report_kind_display() {
        assert_eq!(ReportKind::PodiumCounts.to_string(), "podium-counts");
        assert_eq!(ReportKind::DriverTrend.to_string(), "driver-trend");
    }

    #[test]
    fn test_reporter_chart_path() {
        let reporter = Reporter::new("/tmp/charts", "Max Verstappen", "Red Bull");
        assert_eq!(
            reporter.chart_path(ReportKind::PointsDistribution),
            PathBuf::from("/tmp/charts/points_distribution.svg")
        );
        assert_eq!(reporter.output_dir(), Path::new("/tmp/charts"));
    }

    #[test]
    fn test_reporter_from_config() {
        let mut config = Config::default();
        config.report.output_dir = Some(PathBuf::from("/srv/charts"));
        config.report.driver = "Lando Norris".to_string();

        let reporter = Reporter::from_config(&config);
        assert_eq!(reporter.output_dir(), Path::new("/srv/charts"));
        assert_eq!(reporter.driver, "Lando Norris");
        assert_eq!(reporter.constructor, "Red Bull");
    }

    #[test]
    fn test_reporter_render_nothing_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("charts");
        let reporter = Reporter::new(&out, "A", "X");

        let written = reporter.render(&scenario(), &[]).unwrap();
        assert!(written.is_empty());
        assert!(out.is_dir());
    }

    fn assert_svg_charts(reporter: &Reporter, written: &[PathBuf]) {
        assert_eq!(written.len(), ReportKind::ALL.len());
        for (path, kind) in written.iter().zip(ReportKind::ALL) {
            assert_eq!(path, &reporter.chart_path(kind));
            let svg = std::fs::read_to_string(path).unwrap();
            assert!(svg.contains("<svg"), "{} is not an SVG", path.display());
        }
    }

    #[test]
    fn test_render_all_writes_six_charts() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path(), "A", "Team X");

        let written = reporter.render_all(&scenario()).unwrap();
        assert_svg_charts(&reporter, &written);

        let trend = std::fs::read_to_string(reporter.chart_path(ReportKind::DriverTrend)).unwrap();
        assert!(trend.contains("A - Points per Race"));
    }

    #[test]
    fn test_render_all_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path(), "A", "Team X");

        let written = reporter.render_all(&[]).unwrap();
        assert_svg_charts(&reporter, &written);
    }

    #[test]
    fn test_render_all_unknown_trend_subjects() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path(), "Nobody", "No Team");

        let written = reporter.render_all(&scenario()).unwrap();
        assert_svg_charts(&reporter, &written);
    }

    #[test]
    fn test_render_single_round_without_points() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path(), "C", "Team Z");
        let records = vec![record(1, 12, "C", "Team Z", 0.0)];

        let written = reporter.render_all(&records).unwrap();
        assert_svg_charts(&reporter, &written);
    }

    #[test]
    fn test_render_subset_in_requested_order() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path(), "A", "Team X");

        let kinds = [ReportKind::ConstructorTrend, ReportKind::PodiumCounts];
        let written = reporter.render(&scenario(), &kinds).unwrap();
        assert_eq!(
            written,
            vec![
                reporter.chart_path(ReportKind::ConstructorTrend),
                reporter.chart_path(ReportKind::PodiumCounts),
            ]
        );
        assert!(!reporter.chart_path(ReportKind::DriverPoints).exists());
    }
}
