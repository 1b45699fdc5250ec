mod loader;
mod reports;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use vgsales_engine::{
    EngineConfig, GenreDisplay, GenreSet, Query, RankingView, RecordStore, Region, SalesEngine,
    SalesReport, YearRange,
};

use loader::FileSource;
use reports::{ReportFormat, View};
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Total sales per platform
    Platform,
    /// Genre totals with share of the displayed set
    Genre,
    /// Best-selling titles within each selected genre
    Ranking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenreScope {
    /// Keep only the best-selling genres
    Top,
    /// Keep every genre
    All,
}

#[derive(Debug, Parser)]
#[command(name = "vgsales", version = "0.1.0")]
#[command(about = "Aggregate and rank video-game sales by platform, genre and title")]
struct Args {
    /// Dataset to load (.csv or .json)
    #[arg(long, default_value = "vgsales.csv")]
    data: PathBuf,

    /// Which breakdown to produce
    #[arg(long, value_enum, default_value_t = Mode::Platform)]
    mode: Mode,

    /// Sales region (All, North America, Europe, Japan, Other)
    #[arg(long)]
    region: Option<String>,

    /// First release year included (defaults to the earliest in the dataset)
    #[arg(long)]
    min_year: Option<i32>,

    /// Last release year included (defaults to the latest in the dataset)
    #[arg(long)]
    max_year: Option<i32>,

    /// Genre mode: top genres or all genres
    #[arg(long, value_enum, default_value_t = GenreScope::Top)]
    display: GenreScope,

    /// Number of genres kept by `--display top`
    #[arg(long)]
    top_genres: Option<usize>,

    /// Genres to rank (comma-separated, defaults to every genre)
    #[arg(long)]
    genres: Option<String>,

    /// Titles ranked per genre
    #[arg(long)]
    per_genre: Option<usize>,

    /// Chart or table presentation
    #[arg(long, value_enum, default_value_t = View::Chart)]
    view: View,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON file overriding engine defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// List the genres, platforms and years in the dataset and exit
    #[arg(long)]
    list_genres: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run(&args)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let engine = SalesEngine::new(FileSource::new(&args.data), config);
    let store = engine
        .load_store()
        .with_context(|| format!("failed to load {}", args.data.display()))?;

    if maybe_list_genres(args, &store)? {
        return Ok(());
    }

    let query = build_query(args, engine.config(), &store)?;
    log::debug!("running {:?} query for {}", args.mode, query.region.label());
    let report = engine.run(&store, &query)?;
    write_report_output(args, &report)
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = EngineConfig::from_json(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    log::info!("loaded engine defaults from {}", path.display());
    Ok(config)
}

fn maybe_list_genres(args: &Args, store: &RecordStore) -> Result<bool> {
    if !args.list_genres {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let out = output_target.writer();
    writeln!(out, "Available genres:")?;
    for genre in store.genres() {
        writeln!(out, "  {genre}")?;
    }
    writeln!(out, "Available platforms:")?;
    for platform in store.platforms() {
        writeln!(out, "  {platform}")?;
    }
    if let Some(years) = store.year_bounds() {
        writeln!(out, "Release years: {years}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn resolve_region(args: &Args, config: &EngineConfig) -> Result<Region> {
    match args.region.as_deref() {
        Some(label) => Ok(Region::from_label(label)?),
        None => Ok(config.default_region),
    }
}

fn resolve_years(args: &Args, store: &RecordStore) -> Result<YearRange> {
    let bounds = store.year_bounds();
    let min = args
        .min_year
        .or_else(|| bounds.map(YearRange::min))
        .context("dataset has no dated records; pass --min-year")?;
    let max = args
        .max_year
        .or_else(|| bounds.map(YearRange::max))
        .context("dataset has no dated records; pass --max-year")?;
    Ok(YearRange::new(min, max)?)
}

const fn ranking_view(view: View) -> RankingView {
    match view {
        View::Chart => RankingView::Chart,
        View::Table => RankingView::Table,
    }
}

fn build_query(args: &Args, config: &EngineConfig, store: &RecordStore) -> Result<Query> {
    let region = resolve_region(args, config)?;
    let years = resolve_years(args, store)?;
    let query = match args.mode {
        Mode::Platform => Query::platform(region, years),
        Mode::Genre => {
            let display = match args.display {
                GenreScope::Top => GenreDisplay::Top(args.top_genres.unwrap_or(config.top_genres)),
                GenreScope::All => GenreDisplay::All,
            };
            Query::genre(region, years, display)
        }
        Mode::Ranking => {
            let genres: GenreSet = match args.genres.as_deref() {
                Some(list) => split_csv(list).into_iter().collect(),
                None => store.genres().into_iter().collect(),
            };
            Query::ranking(
                region,
                years,
                genres,
                args.per_genre.unwrap_or(config.titles_per_genre),
                ranking_view(args.view),
            )
        }
    };
    Ok(query)
}

fn announce_banner(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", "🎮 Video Game Sales Explorer".bright_cyan().bold())?;
    writeln!(out, "{}", "================================".cyan())?;
    Ok(())
}

fn write_report_output(args: &Args, report: &SalesReport) -> Result<()> {
    if args.output.is_some() {
        colored::control::set_override(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    if args.report == ReportFormat::Console {
        announce_banner(output_target.writer())?;
    }
    reports::write_report(output_target.writer(), args.report, report, args.view)?;
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use vgsales_engine::{QueryMode, Record, SalesFigures};

    const FIXTURE: &str = "\
Rank,Name,Platform,Year,Genre,Publisher,NA_Sales,EU_Sales,JP_Sales,Other_Sales,Global_Sales
1,Wii Sports,Wii,2006,Sports,Nintendo,41.49,29.02,3.77,8.46,82.74
2,Super Mario Bros.,NES,1985,Platform,Nintendo,29.08,3.58,6.81,0.77,40.24
3,Mario Kart Wii,Wii,2008,Racing,Nintendo,15.85,12.88,3.79,3.31,35.82
4,Undated Game,PS2,N/A,Sports,Acme,0.1,0.1,0.1,0.1,0.4
";

    fn temp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("vgsales-main-{nanos}-{name}"))
    }

    fn fixture_file() -> PathBuf {
        let path = temp_path("data.csv");
        std::fs::write(&path, FIXTURE).unwrap();
        path
    }

    fn base_args() -> Args {
        Args {
            data: fixture_file(),
            mode: Mode::Platform,
            region: None,
            min_year: None,
            max_year: None,
            display: GenreScope::Top,
            top_genres: None,
            genres: None,
            per_genre: None,
            view: View::Chart,
            report: ReportFormat::Json,
            output: None,
            config: None,
            list_genres: false,
            verbose: false,
        }
    }

    fn store() -> RecordStore {
        let rec = |name: &str, genre: &str, year: i32| Record {
            name: name.to_string(),
            platform: "Wii".to_string(),
            year,
            genre: genre.to_string(),
            publisher: "Nintendo".to_string(),
            sales: SalesFigures {
                global: 1.0,
                ..SalesFigures::default()
            },
        };
        RecordStore::new(vec![
            rec("Wii Sports", "Sports", 2006),
            rec("Mario Kart Wii", "Racing", 2008),
        ])
    }

    #[test]
    fn query_defaults_come_from_store_and_config() {
        let config = EngineConfig {
            default_region: Region::Europe,
            ..EngineConfig::default()
        };
        let query = build_query(&base_args(), &config, &store()).unwrap();
        assert_eq!(query.region, Region::Europe);
        assert_eq!(query.years, YearRange::new(2006, 2008).unwrap());
        assert_eq!(query.mode, QueryMode::Platform);
    }

    #[test]
    fn region_labels_are_parsed_leniently() {
        let args = Args {
            region: Some("japan regions".to_string()),
            ..base_args()
        };
        let query = build_query(&args, &EngineConfig::default(), &store()).unwrap();
        assert_eq!(query.region, Region::Japan);

        let args = Args {
            region: Some("Mars".to_string()),
            ..base_args()
        };
        let err = build_query(&args, &EngineConfig::default(), &store()).unwrap_err();
        assert!(err.to_string().contains("Mars"));
    }

    #[test]
    fn genre_mode_applies_top_count() {
        let args = Args {
            mode: Mode::Genre,
            top_genres: Some(3),
            ..base_args()
        };
        let query = build_query(&args, &EngineConfig::default(), &store()).unwrap();
        assert_eq!(
            query.mode,
            QueryMode::Genre {
                display: GenreDisplay::Top(3)
            }
        );

        let args = Args {
            mode: Mode::Genre,
            display: GenreScope::All,
            ..base_args()
        };
        let query = build_query(&args, &EngineConfig::default(), &store()).unwrap();
        assert_eq!(
            query.mode,
            QueryMode::Genre {
                display: GenreDisplay::All
            }
        );
    }

    #[test]
    fn ranking_mode_defaults_to_every_genre() {
        let args = Args {
            mode: Mode::Ranking,
            view: View::Table,
            ..base_args()
        };
        let query = build_query(&args, &EngineConfig::default(), &store()).unwrap();
        let QueryMode::Ranking {
            genres,
            per_genre,
            view,
        } = query.mode
        else {
            panic!("expected ranking mode");
        };
        assert_eq!(genres.len(), 2);
        assert_eq!(per_genre, 5);
        assert_eq!(view, RankingView::Table);
    }

    #[test]
    fn ranking_mode_splits_genre_list() {
        let args = Args {
            mode: Mode::Ranking,
            genres: Some("Racing, Puzzle,Racing".to_string()),
            per_genre: Some(2),
            ..base_args()
        };
        let query = build_query(&args, &EngineConfig::default(), &store()).unwrap();
        let QueryMode::Ranking { genres, .. } = query.mode else {
            panic!("expected ranking mode");
        };
        assert_eq!(genres.iter().collect::<Vec<_>>(), vec!["Puzzle", "Racing"]);
    }

    #[test]
    fn inverted_years_are_rejected() {
        let args = Args {
            min_year: Some(2010),
            max_year: Some(2000),
            ..base_args()
        };
        assert!(build_query(&args, &EngineConfig::default(), &store()).is_err());
    }

    #[test]
    fn empty_store_needs_explicit_years() {
        let empty = RecordStore::new(Vec::new());
        assert!(resolve_years(&base_args(), &empty).is_err());
        let args = Args {
            min_year: Some(1990),
            max_year: Some(1999),
            ..base_args()
        };
        assert_eq!(
            resolve_years(&args, &empty).unwrap(),
            YearRange::new(1990, 1999).unwrap()
        );
    }

    #[test]
    fn config_file_overrides_defaults() {
        let path = temp_path("config.json");
        std::fs::write(&path, r#"{ "titles_per_genre": 2 }"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.titles_per_genre, 2);
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());

        std::fs::write(&path, r#"{ "top_genres": 0 }"#).unwrap();
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn run_writes_markdown_report() {
        let output = temp_path("report.md");
        let args = Args {
            mode: Mode::Genre,
            report: ReportFormat::Markdown,
            output: Some(output.clone()),
            ..base_args()
        };
        run(&args).unwrap();
        let content = std::fs::read_to_string(output).unwrap();
        assert!(content.contains("# Most Popular Game Genres"));
        assert!(content.contains("Top 5 Genres in All Regions (1985 - 2008)"));
        assert!(content.contains("| Sports | 82.74 |"));
    }

    #[test]
    fn run_writes_console_report_with_banner() {
        let output = temp_path("report.txt");
        let args = Args {
            report: ReportFormat::Console,
            region: Some("North America".to_string()),
            output: Some(output.clone()),
            ..base_args()
        };
        run(&args).unwrap();
        let content = std::fs::read_to_string(output).unwrap();
        assert!(content.contains("Video Game Sales Explorer"));
        assert!(content.contains("Total Sales by Platform in North America"));
    }

    #[test]
    fn run_reports_missing_dataset() {
        let args = Args {
            data: temp_path("missing.csv"),
            ..base_args()
        };
        let err = run(&args).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load"));
    }

    #[test]
    fn list_genres_writes_output() {
        let output = temp_path("genres.txt");
        let args = Args {
            list_genres: true,
            output: Some(output.clone()),
            ..base_args()
        };
        run(&args).unwrap();
        let content = std::fs::read_to_string(output).unwrap();
        assert!(content.contains("Available genres:"));
        assert!(content.contains("  Racing"));
        assert!(content.contains("Release years: 1985 to 2008"));
    }

    #[test]
    fn list_genres_returns_false_when_disabled() {
        assert!(!maybe_list_genres(&base_args(), &store()).unwrap());
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
