use clap::{Parser, Subcommand, ValueEnum};
use lochist_core::models::WeekdayLocale;
use std::path::PathBuf;

/// Lochist - Location-history analysis
#[derive(Parser, Debug)]
#[command(name = "lochist")]
#[command(about = "Find gaps, visits and merge location-history exports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./lochist.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find periods where location recording stopped
    Gaps(GapsArgs),

    /// List visits within a distance of a location
    Visits(VisitsArgs),

    /// Merge several exports into one time-ordered file
    Merge(MergeArgs),

    /// Show effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct GapsArgs {
    /// Path to the location-history export (JSON)
    pub file: PathBuf,

    /// Minimum gap length in hours
    #[arg(long, value_name = "HOURS")]
    pub min_gap_hours: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct VisitsArgs {
    /// Path to the location-history export (JSON)
    pub file: PathBuf,

    /// Latitude of the location of interest
    #[arg(allow_negative_numbers = true)]
    pub latitude: f64,

    /// Longitude of the location of interest
    #[arg(allow_negative_numbers = true)]
    pub longitude: f64,

    /// Search radius in meters
    pub distance: f64,

    /// Visits starting within this many hours of the previous one form one episode
    #[arg(long, value_name = "HOURS")]
    pub adjacency_hours: Option<f64>,

    /// Ignore visits shorter than this many minutes
    #[arg(long, value_name = "MINUTES")]
    pub min_duration_minutes: Option<f64>,

    /// Skip reverse geocoding of episode locations
    #[arg(long)]
    pub no_geocode: bool,

    /// Language of weekday names in the report
    #[arg(long, value_enum, default_value_t = WeekdayLang::En)]
    pub weekday_locale: WeekdayLang,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeekdayLang {
    En,
    Fi,
}

impl From<WeekdayLang> for WeekdayLocale {
    fn from(lang: WeekdayLang) -> Self {
        match lang {
            WeekdayLang::En => WeekdayLocale::English,
            WeekdayLang::Fi => WeekdayLocale::Finnish,
        }
    }
}

#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Export files to merge, in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output file
    #[arg(long, short = 'o', default_value = "merged.json")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_visits_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["lochist", "visits", "data.json", "-33.86", "-151.2", "100"]).unwrap();
        match cli.command {
            Commands::Visits(args) => {
                assert_eq!(args.latitude, -33.86);
                assert_eq!(args.longitude, -151.2);
                assert_eq!(args.distance, 100.0);
                assert!(!args.no_geocode);
                assert_eq!(args.weekday_locale, WeekdayLang::En);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_merge_requires_files_and_defaults_output() {
        assert!(Cli::try_parse_from(["lochist", "merge"]).is_err());

        let cli = Cli::try_parse_from(["lochist", "--json", "merge", "a.json", "b.json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.output, PathBuf::from("merged.json"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_visits_weekday_locale() {
        let cli = Cli::try_parse_from(["lochist", "visits", "data.json", "60.1", "24.9", "50", "--weekday-locale", "fi"])
            .unwrap();
        match cli.command {
            Commands::Visits(args) => {
                assert_eq!(WeekdayLocale::from(args.weekday_locale), WeekdayLocale::Finnish);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["lochist", "visits", "d.json", "1", "2", "3", "--weekday-locale", "sv"]).is_err());
    }
}
