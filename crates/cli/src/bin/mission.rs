use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rover_mission_control::config::{Settings, load_robot_config, load_settings};
use rover_mission_control::export::{json, path_file, trajectory_csv};
use rover_mission_control::service::{DeployRequest, Mission, MissionService};
use rover_mission_control::units::rad_to_deg;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Waypoint mission planner and store")]
struct Cli {
    /// Settings file (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Mission store directory (overrides the settings file)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a trajectory from waypoints, store it, and make it current
    Deploy {
        /// Path editor file (`{"points": [[x, y], ...]}`)
        #[arg(long, conflicts_with = "request", required_unless_present = "request")]
        path: Option<PathBuf>,

        /// Feet per path-file unit
        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        /// JSON deploy request (`{"waypoints": [...], "robotConfig": {...}}`)
        #[arg(long)]
        request: Option<PathBuf>,

        /// Robot configuration (YAML or TOML); falls back to the active configuration
        #[arg(long)]
        robot: Option<PathBuf>,
    },
    /// List stored missions
    List,
    /// Print one mission as JSON
    Show { id: String },
    /// Print the current mission as JSON
    Current,
    /// Print readiness of the current mission
    Summary,
    /// Recompute a mission's trajectory from its stored waypoints and configuration
    Regenerate { id: String },
    /// Make a stored mission current
    Activate { id: String },
    /// Stop serving the current mission
    Undeploy,
    /// Delete a mission
    Delete { id: String },
    /// Export a mission (`current` for the deployed one)
    Export {
        id: String,

        /// Trajectory CSV output (`-` for stdout)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Full mission JSON output
        #[arg(long)]
        json: Option<PathBuf>,

        /// Waypoints as a path editor file
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    if let Some(store) = cli.store {
        settings.store_dir = store;
    }
    let service = MissionService::from_settings(&settings)?;
    tracing::debug!(
        store = ?service.store().root(),
        missions = service.list().len(),
        "mission store opened"
    );

    match cli.command {
        Command::Deploy {
            path,
            scale,
            request,
            robot,
        } => {
            let mut deploy = match (path, request) {
                (Some(path), _) => DeployRequest::new(path_file::load_path_file(&path, scale)?),
                (None, Some(request)) => {
                    DeployRequest::from_json(&std::fs::read_to_string(&request)?)?
                }
                (None, None) => anyhow::bail!("either --path or --request is required"),
            };
            if let Some(robot) = robot {
                deploy = deploy.with_config(load_robot_config(&robot)?);
            }
            let mission = service.deploy(deploy)?;
            print_mission_line(&mission);
        }
        Command::List => {
            let missions = service.list();
            if missions.is_empty() {
                println!("no missions stored");
            }
            for mission in &missions {
                print_mission_line(mission);
            }
        }
        Command::Show { id } => {
            println!("{}", serde_json::to_string_pretty(&service.get(&id)?)?);
        }
        Command::Current => {
            println!("{}", serde_json::to_string_pretty(&service.current()?)?);
        }
        Command::Summary => {
            println!("{}", serde_json::to_string_pretty(&service.summary())?);
        }
        Command::Regenerate { id } => {
            let mission = service.regenerate(&id)?;
            print_mission_line(&mission);
        }
        Command::Activate { id } => {
            let mission = service.activate(&id)?;
            print_mission_line(&mission);
        }
        Command::Undeploy => match service.undeploy()? {
            Some(id) => println!("undeployed {id}"),
            None => println!("no mission was deployed"),
        },
        Command::Delete { id } => {
            let mission = service.delete(&id)?;
            println!("deleted {}", mission.id);
        }
        Command::Export {
            id,
            csv,
            json: json_out,
            path,
        } => {
            let mission = if id == "current" {
                service.current()?
            } else {
                service.get(&id)?
            };
            if csv.is_none() && json_out.is_none() && path.is_none() {
                anyhow::bail!("nothing to export: pass --csv, --json, or --path");
            }
            if let Some(out) = csv {
                trajectory_csv::write_file(&out, &mission.trajectory)?;
                report_written(&out);
            }
            if let Some(out) = json_out {
                json::write_pretty(&out, &mission)?;
                report_written(&out);
            }
            if let Some(out) = path {
                path_file::save_path_file(&out, &mission.waypoints, 1.0)?;
                report_written(&out);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_mission_line(mission: &Mission) {
    let duration = mission.trajectory.last().map(|p| p.t).unwrap_or(0.0);
    let end_heading = mission
        .trajectory
        .last()
        .map(|p| rad_to_deg(p.heading))
        .unwrap_or(0.0);
    println!(
        "{:<28} {:<9} waypoints={:<3} points={:<5} duration={:.2}s end_heading={:.1}°",
        mission.id,
        format!("{:?}", mission.status),
        mission.waypoints.len(),
        mission.trajectory.len(),
        duration,
        end_heading,
    );
}

fn report_written(path: &Path) {
    if path != Path::new("-") {
        eprintln!("wrote {}", path.display());
    }
}
