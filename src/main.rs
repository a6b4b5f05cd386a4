use clap::Parser;
use color_eyre::Result;
use tempo::{
    cli::{self, Cli, Commands},
    utils, Config, Database, Planner, Profile,
};

fn init_tracing(interactive: bool) {
    // stdout carries command output; logs go to stderr and stay silent under the TUI
    let default_filter = if interactive { "off" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    init_tracing(matches!(command, Commands::Tui));

    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(&utils::expand_path(path))?,
        None => Config::load_with_profile(profile)?,
    };
    let owner = cli.user.unwrap_or_else(|| config.default_owner.clone());

    let db_path = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;
    let planner = Planner::new(db).with_policy(config.key_policy());

    match command {
        Commands::Tui => {
            let app = tempo::tui::App::new(config, planner, owner)?;
            tempo::tui::run_event_loop(app)?;
        }
        Commands::AddTask { title, priority, due, category, description } => {
            cli::handle_add_task(&planner, &owner, title, priority, due, category, description)?;
        }
        Commands::EditTask { id, title, priority, due, category, description } => {
            let changes = cli::task_changes(title, priority, due, category, description)?;
            cli::handle_edit_task(&planner, &owner, id, changes)?;
        }
        Commands::CompleteTask { id } => cli::handle_complete_task(&planner, &owner, id)?,
        Commands::DeleteTask { id } => cli::handle_delete_task(&planner, &owner, id)?,
        Commands::Tasks => cli::handle_tasks(&planner, &owner)?,
        Commands::AddEvent { title, date, category, description } => {
            cli::handle_add_event(&planner, &owner, title, date, category, description)?;
        }
        Commands::DeleteEvent { id } => cli::handle_delete_event(&planner, &owner, id)?,
        Commands::Events => cli::handle_events(&planner, &owner)?,
        Commands::TrackCycle { last_date, cycle_length, period_length } => {
            cli::handle_track_cycle(&planner, &owner, last_date, cycle_length, period_length)?;
        }
        Commands::Cycles => cli::handle_cycles(&planner, &owner)?,
        Commands::Notifications => cli::handle_notifications(&planner, &owner)?,
        Commands::Calendar { start, end } => cli::handle_calendar(&planner, &owner, start, end)?,
        Commands::Analytics => cli::handle_analytics(&planner, &owner)?,
        Commands::DeleteAccount { yes } => cli::handle_delete_account(&planner, &owner, yes)?,
    }

    Ok(())
}
