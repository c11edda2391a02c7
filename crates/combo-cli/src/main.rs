//! `combo` - recommends four-member teams by the reaction chains they produce.

mod config;
mod render;
mod theme;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use combo_core::{
    load_roster, select, ChainSearch, Character, Faction, RankConfig, Ranker, SearchStats,
    Sequence, Team,
};
use config::ColorChoice;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use theme::Theme;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "combo", version, about = "Find the teams with the longest combo chains")]
struct Cli {
    /// Roster file (defaults to $COMBO_ROSTER, ./warriors.csv, then the config dir)
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Style terminal output
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the roster grouped by faction
    List {
        /// Only show one faction
        #[arg(long)]
        faction: Option<String>,
    },
    /// Show every chain a single team can produce
    Search {
        /// Exactly four character names
        #[arg(num_args = 4, required = true)]
        members: Vec<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Rank candidate teams from a selection pool
    Rank(RankArgs),
}

#[derive(Debug, Args)]
struct RankArgs {
    /// Character every team must include (up to 4, repeatable)
    #[arg(long = "pin")]
    pinned: Vec<String>,

    /// Character to add to the pool (repeatable; defaults to the whole roster)
    #[arg(long = "select")]
    selected: Vec<String>,

    /// Only teams with 3 characters from one faction
    #[arg(long)]
    same_faction: bool,

    /// Length of the main leaderboard
    #[arg(long, default_value_t = 15)]
    top: usize,

    /// Length of the 4-chain leaderboard
    #[arg(long, default_value_t = 5)]
    deep: usize,

    /// Evaluate teams on a single thread
    #[arg(long)]
    sequential: bool,

    /// Also print the chains of this team number
    #[arg(long)]
    detail: Option<usize>,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct SearchReport<'a> {
    team: Vec<String>,
    stats: SearchStats,
    sequences: &'a [Sequence],
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "combo=info,combo_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let theme = if cli.color.enabled() {
        Theme::default()
    } else {
        Theme::plain()
    };

    let path = config::resolve_roster(cli.roster.clone()).with_context(|| {
        format!(
            "no roster found; pass --roster or set {}",
            config::ROSTER_ENV
        )
    })?;
    let roster = load_roster(&path)?;
    tracing::info!(path = %path.display(), characters = roster.len(), "roster loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::List { faction } => list(&mut out, &theme, &roster, faction.as_deref())?,
        Command::Search { members, json } => search(&mut out, &theme, &roster, &members, json)?,
        Command::Rank(args) => rank(&mut out, &theme, &roster, &args)?,
    }

    out.flush()?;
    Ok(())
}

fn list(
    out: &mut impl Write,
    theme: &Theme,
    roster: &[Character],
    faction: Option<&str>,
) -> Result<()> {
    let shown: Vec<Character> = match faction {
        Some(name) => {
            let Some(faction) = Faction::parse(name) else {
                bail!("unknown faction '{}'", name);
            };
            roster.iter().filter(|c| c.faction == faction).cloned().collect()
        }
        None => roster.to_vec(),
    };
    render::render_roster(out, theme, &shown)?;
    Ok(())
}

fn search(
    out: &mut impl Write,
    theme: &Theme,
    roster: &[Character],
    members: &[String],
    json: bool,
) -> Result<()> {
    let team = Team::new(select(roster, members)?).context("invalid team")?;
    let sequences = ChainSearch::new().search(&team);
    let stats = SearchStats::from_sequences(&sequences);

    if json {
        let report = SearchReport {
            team: team.names(),
            stats,
            sequences: &sequences,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{}", theme.bold(&team, theme.header))?;
    if sequences.is_empty() {
        writeln!(out, "{}", theme.paint("this team produces no combo", theme.dim))?;
        return Ok(());
    }
    render::render_sequences(out, theme, &sequences)?;
    writeln!(out)?;
    render::render_summary(out, theme, &stats)?;
    Ok(())
}

/// Pinned characters first, then the selection, each name once; an empty
/// selection means the whole roster. Repeated pins are left for the ranker
/// to reject.
fn build_pool(roster: &[Character], args: &RankArgs) -> Result<Vec<Character>> {
    if args.selected.is_empty() {
        return Ok(roster.to_vec());
    }
    let mut names: Vec<&String> = Vec::with_capacity(args.pinned.len() + args.selected.len());
    for name in args.pinned.iter().chain(&args.selected) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Ok(select(roster, &names)?)
}

fn rank(out: &mut impl Write, theme: &Theme, roster: &[Character], args: &RankArgs) -> Result<()> {
    let pool = build_pool(roster, args)?;
    let mut config = RankConfig::default()
        .with_top_n(args.top)
        .with_depth_top_n(args.deep);
    config.parallel = !args.sequential;

    let boards = Ranker::new(config)
        .rank(&pool, &args.pinned, args.same_faction)
        .context("cannot rank teams")?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &boards)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "{}",
        theme.paint(
            format!(
                "{} characters, {} candidate teams, {} with combos",
                pool.len(),
                boards.candidates,
                boards.evaluated
            ),
            theme.dim
        )
    )?;
    writeln!(out)?;
    render::render_leaderboard(
        out,
        theme,
        &format!("Recommended top {}", args.top),
        &boards.top,
    )?;
    writeln!(out)?;
    render::render_leaderboard(
        out,
        theme,
        &format!("Most 4-chains top {}", args.deep),
        &boards.deep,
    )?;

    if let Some(team_no) = args.detail {
        writeln!(out)?;
        match boards.find(team_no) {
            Some(result) => render::render_detail(out, theme, result)?,
            None => bail!("team {} is not on either leaderboard", team_no),
        }
    }
    Ok(())
}
