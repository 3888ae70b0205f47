use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use roster_core::model::{FormSlot, RosterEntryType, StartDraft};
use roster_core::preferences::Locale;
use std::path::PathBuf;

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Roster client - flight day registrations for club members", long_about = None)]
struct Cli {
    /// Directory holding config.toml, session.toml, preferences.toml and startlist.toml
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    ///
    /// When the token later expires, commands log in again on their own only
    /// if `remember_credentials = true` is set in config.toml. Otherwise the
    /// session ends and `roster login` has to be run again.
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// End the session and remove stored credentials
    Logout,
    /// Show the identity behind the stored token
    Whoami,
    /// Show the calendar overview
    Calendar,
    /// Show the roster of one day
    Day {
        /// Date as YYYY-MM-DD
        date: NaiveDate,
    },
    /// Register your own status for a day
    Update {
        date: NaiveDate,
        /// Definite, Tentative or Unavailable
        entry_type: RosterEntryType,
        #[arg(short, long)]
        remarks: Option<String>,
    },
    /// List aircraft reservations
    Reservations {
        /// Only reservations touching this date
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Search the member directory
    Members {
        /// Case-insensitive name filter
        query: Option<String>,
    },
    /// Record take-offs on the start list kept on this device
    Starts {
        #[command(subcommand)]
        action: StartsAction,
    },
    /// Show or change the display language
    Locale {
        #[command(subcommand)]
        action: LocaleAction,
    },
}

#[derive(clap::Args)]
struct StartArgs {
    /// Take-off as HH:MM
    #[arg(long, value_parser = commands::starts::parse_time)]
    from: Option<NaiveTime>,
    /// Landing as HH:MM
    #[arg(long, value_parser = commands::starts::parse_time)]
    to: Option<NaiveTime>,
    /// Pilot in command
    #[arg(long, default_value = "")]
    pic: String,
    #[arg(long, default_value = "")]
    copilot: String,
    #[arg(long, default_value = "")]
    plane: String,
    /// Passenger flight
    #[arg(long)]
    pax: bool,
}

impl From<StartArgs> for StartDraft {
    fn from(args: StartArgs) -> Self {
        StartDraft {
            from: args.from,
            to: args.to,
            pic: args.pic,
            copilot: args.copilot,
            is_pax: args.pax,
            plane: args.plane,
        }
    }
}

#[derive(Subcommand)]
enum StartsAction {
    /// Print recorded starts, open drafts and suggestion lists
    List,
    /// Record a start; needs --from, --to, --pic and --plane
    Add(StartArgs),
    /// Keep an incomplete start in form slot a or b
    Draft {
        slot: FormSlot,
        #[command(flatten)]
        start: StartArgs,
    },
    /// Record the draft of a slot and empty the slot
    Submit { slot: FormSlot },
    /// Replace the pilot suggestions
    Pilots { names: Vec<String> },
    /// Replace the plane suggestions
    Planes { registrations: Vec<String> },
}

#[derive(Subcommand)]
enum LocaleAction {
    /// Print the current locale
    Get,
    /// Set the locale (en, fr, de)
    Set { locale: Locale },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app = app::bootstrap(cli.config_dir).await?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::session::login(&app, &username, &password).await?
        }
        Commands::Logout => commands::session::logout(&app).await?,
        Commands::Whoami => commands::session::whoami(&app).await?,
        Commands::Calendar => commands::roster::calendar(&app).await?,
        Commands::Day { date } => commands::roster::day(&app, date).await?,
        Commands::Update {
            date,
            entry_type,
            remarks,
        } => commands::roster::update(&app, date, entry_type, remarks).await?,
        Commands::Reservations { date } => commands::roster::reservations(&app, date).await?,
        Commands::Members { query } => commands::roster::members(&app, query.as_deref()).await?,
        Commands::Starts { action } => match action {
            StartsAction::List => commands::starts::list(&app).await?,
            StartsAction::Add(start) => commands::starts::add(&app, start.into()).await?,
            StartsAction::Draft { slot, start } => {
                commands::starts::save_draft(&app, slot, start.into()).await?
            }
            StartsAction::Submit { slot } => commands::starts::submit(&app, slot).await?,
            StartsAction::Pilots { names } => commands::starts::set_pilots(&app, names).await?,
            StartsAction::Planes { registrations } => {
                commands::starts::set_planes(&app, registrations).await?
            }
        },
        Commands::Locale { action } => match action {
            LocaleAction::Get => commands::locale::get(&app).await?,
            LocaleAction::Set { locale } => commands::locale::set(&app, locale).await?,
        },
    }

    Ok(())
}
