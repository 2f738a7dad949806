mod writer;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, warn};
use paddock::{
    AnalysisConfig, FileSessionProvider, LapFilter, PaddockError, ResultsProjection, Session,
    SessionKey, SessionProvider, SessionType, TrackProjector,
    analysis::{self, SessionResults},
};
use writer::emit;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SessionCode {
    #[value(aliases = ["r", "R"])]
    Race,
    #[value(aliases = ["q", "Q"])]
    Qualifying,
    #[value(aliases = ["s", "S"])]
    Sprint,
    #[value(aliases = ["sq", "SQ"])]
    SprintQualifying,
}

impl From<SessionCode> for SessionType {
    fn from(value: SessionCode) -> Self {
        match value {
            SessionCode::Race => SessionType::Race,
            SessionCode::Qualifying => SessionType::Qualifying,
            SessionCode::Sprint => SessionType::Sprint,
            SessionCode::SprintQualifying => SessionType::SprintQualifying,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Directory holding session snapshots, defaults to the application data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[arg(short, long)]
    year: u16,

    /// Event name as listed in the schedule, e.g. "Monaco Grand Prix"
    #[arg(short, long)]
    event: String,

    #[arg(short, long, value_enum, default_value_t = SessionCode::Race)]
    session: SessionCode,

    /// Write JSON lines to this file instead of printing to stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Size of the session tables and weather extremes
    Summary,
    /// Classification with gained/lost places or qualifying segment times
    Results,
    /// Fastest lap of each driver
    BestLaps {
        #[arg(required = true)]
        drivers: Vec<String>,
    },
    /// Lap times of a driver's representative laps
    Laps {
        driver: String,

        /// Keep laps within this factor of the fastest lap, e.g. 1.07
        #[arg(short, long)]
        threshold: Option<f64>,
    },
    /// Tyre stints of every driver
    Stints,
    /// Fastest lap speed, throttle and brake traces
    Telemetry {
        #[arg(required = true)]
        drivers: Vec<String>,
    },
    /// Time delta between the fastest laps of two drivers
    Delta { reference: String, comparison: String },
    /// Lap by lap positions from the grid onwards
    Positions,
    /// Circuit map in reference orientation
    Track {
        /// Distance between a corner and its label
        #[arg(long)]
        label_offset: Option<f64>,
    },
    /// Display color of every driver
    Colors,
}

fn load_config() -> AnalysisConfig {
    match AnalysisConfig::from_local_file() {
        Ok(Some(config)) => config,
        Ok(None) => AnalysisConfig::default(),
        Err(e) => {
            warn!("Ignoring config file: {}", e);
            AnalysisConfig::default()
        }
    }
}

fn load_session(args: &Args) -> Result<Session, PaddockError> {
    let provider = match &args.data_dir {
        Some(dir) => FileSessionProvider::new(dir.clone()),
        None => FileSessionProvider::new_default()?,
    };
    let key = SessionKey::new(args.year, args.event.clone(), args.session.into());
    provider.load_session(&key)
}

fn run(args: &Args) -> Result<(), PaddockError> {
    let config = load_config();
    let session = load_session(args)?;
    let output = args.output.as_ref();

    match &args.command {
        Commands::Summary => emit(&[analysis::summarize(&session)], output),
        Commands::Results => match ResultsProjection::from_config(&config).project(&session) {
            SessionResults::Race(rows) => emit(&rows, output),
            SessionResults::Qualifying(rows) => emit(&rows, output),
        },
        Commands::BestLaps { drivers } => emit(
            &analysis::best_laps(&session, drivers, &config.not_set_marker),
            output,
        ),
        Commands::Laps { driver, threshold } => {
            let filter = LapFilter::new(threshold.unwrap_or(config.quicklap_threshold))?;
            emit(&filter.lap_time_series(&session, driver), output)
        }
        Commands::Stints => emit(&[analysis::stint_chart(&session)], output),
        Commands::Telemetry { drivers } => {
            if drivers.len() > config.max_compared_drivers {
                return Err(PaddockError::InvalidUserInput {
                    field: "drivers".to_string(),
                    reason: format!(
                        "at most {} drivers can be compared",
                        config.max_compared_drivers
                    ),
                });
            }
            emit(
                &analysis::fastest_lap_traces(&session, drivers, config.max_compared_drivers),
                output,
            )
        }
        Commands::Delta {
            reference,
            comparison,
        } => emit(
            &[analysis::fastest_lap_delta(&session, reference, comparison)],
            output,
        ),
        Commands::Positions => emit(&analysis::reconstruct_positions(&session), output),
        Commands::Track { label_offset } => {
            let projector =
                TrackProjector::new(label_offset.unwrap_or(config.corner_label_offset));
            let projected = session.track.as_ref().map(|track| projector.project(track));
            if projected.is_none() {
                warn!("Session {} has no track geometry", session.key);
            }
            emit(projected.as_slice(), output)
        }
        Commands::Colors => emit(
            &analysis::session_colors(&session, &config.fallback_color).colors,
            output,
        ),
    }
}

fn main() {
    colog::init();

    let cli = Args::parse();
    if let Err(e) = run(&cli) {
        error!("{}", snafu::Report::from_error(e));
        std::process::exit(1);
    }
}
