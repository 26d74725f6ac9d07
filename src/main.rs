//! Plotkeeper CLI - garden cell occupancy and harvest scheduling.

use clap::Parser;
use plotkeeper::action_log;
use plotkeeper::cli::{
    CellCommands, Cli, Commands, ConfigCommands, ContainerCommands, ContainerKindArgs,
    PlantCommands, PlantKindArgs, SoilUnitArg,
};
use plotkeeper::clock::SystemClock;
use plotkeeper::commands::{self, CellFilter, NewContainer, NewPlant, Output};
use plotkeeper::config::{self, ConfigOverrides, OutputFormat};
use plotkeeper::models::{ContainerKind, HarvestStyle, PlantKind, SoilUnit};
use plotkeeper::storage::Storage;
use std::env;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter (e.g., `PK_LOG=debug`).
const LOG_ENV: &str = "PK_LOG";

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let garden_path = resolve_garden_path(cli.garden_path, cli.human_readable);
    let human = resolve_human(&garden_path, cli.human_readable);

    let (cmd_name, args_json) = serialize_command(&cli.command);

    let start = Instant::now();
    let result = run_command(cli.command, &garden_path, human);
    let duration = start.elapsed().as_millis() as u64;

    let (success, error) = match &result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };
    action_log::log_action(&garden_path, &cmd_name, args_json, success, error, duration);

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Diagnostics go to stderr so JSON on stdout stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Use an explicit path literally; otherwise the current directory.
fn resolve_garden_path(explicit_path: Option<PathBuf>, human: bool) -> PathBuf {
    match explicit_path {
        Some(path) => {
            if !path.exists() {
                let message = format!("Specified garden path does not exist: {}", path.display());
                if human {
                    eprintln!("Error: {}", message);
                } else {
                    eprintln!("{}", serde_json::json!({ "error": message }));
                }
                process::exit(1);
            }
            path
        }
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// `-H` wins; otherwise the configured output-format decides.
fn resolve_human(garden_path: &Path, flag: bool) -> bool {
    let mut overrides = ConfigOverrides::new();
    if flag {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }
    let resolved = match Storage::open(garden_path) {
        Ok(storage) => config::resolve_config(&storage, &overrides),
        Err(_) => config::resolve_config_without_session(&overrides),
    };
    match resolved {
        Ok(resolved) => resolved.output_format() == OutputFormat::Human,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable config");
            flag
        }
    }
}

fn run_command(command: Commands, garden_path: &Path, human: bool) -> plotkeeper::Result<()> {
    let clock = SystemClock;

    match command {
        Commands::Init { name, zone } => {
            output(&commands::init(garden_path, &name, &zone)?, human);
        }

        Commands::Summary => output(&commands::summary(garden_path)?, human),

        Commands::Container { command } => match command {
            ContainerCommands::Add { kind } => {
                let new = new_container(kind);
                output(&commands::container_add(garden_path, new)?, human);
            }
            ContainerCommands::List => output(&commands::container_list(garden_path)?, human),
            ContainerCommands::Show {
                id,
                spacing,
                soil_unit,
            } => {
                let unit = match soil_unit {
                    SoilUnitArg::CubicInches => SoilUnit::CubicInches,
                    SoilUnitArg::CubicFeet => SoilUnit::CubicFeet,
                    SoilUnitArg::CubicYards => SoilUnit::CubicYards,
                };
                output(&commands::container_show(garden_path, &id, spacing, unit)?, human);
            }
            ContainerCommands::Move { id, location } => {
                output(&commands::container_move(garden_path, &id, &location)?, human);
            }
        },

        Commands::Plant { command } => match command {
            PlantCommands::Add { kind } => {
                output(&commands::plant_add(garden_path, new_plant(kind))?, human);
            }
            PlantCommands::List { category } => {
                output(&commands::plant_list(garden_path, category.as_deref())?, human);
            }
            PlantCommands::Show { id } => output(&commands::plant_show(garden_path, &id)?, human),
        },

        Commands::Cell { command } => match command {
            CellCommands::Create {
                container,
                row,
                column,
            } => output(&commands::cell_create(garden_path, &container, &row, column)?, human),
            CellCommands::List {
                available,
                occupied,
            } => {
                let filter = if available {
                    CellFilter::Available
                } else if occupied {
                    CellFilter::Occupied
                } else {
                    CellFilter::All
                };
                output(&commands::cell_list(garden_path, filter)?, human);
            }
            CellCommands::Show { id } => output(&commands::cell_show(garden_path, &id)?, human),
            CellCommands::Plant {
                cell,
                plant,
                planted_on,
            } => {
                let result = commands::cell_plant(garden_path, &cell, &plant, planted_on, &clock)?;
                output(&result, human);
            }
            CellCommands::Harvest { cell } => {
                output(&commands::cell_harvest(garden_path, &cell)?, human);
            }
        },

        Commands::Harvests { days } => {
            output(&commands::harvests(garden_path, days, &clock)?, human);
        }

        Commands::Config { command } => match command {
            ConfigCommands::Get { key } => output(&commands::config_get(garden_path, &key)?, human),
            ConfigCommands::Set { key, value, system } => {
                output(&commands::config_set(garden_path, &key, &value, system)?, human);
            }
            ConfigCommands::List => output(&commands::config_list(garden_path)?, human),
        },

        Commands::Log { limit } => output(&commands::log(garden_path, limit)?, human),
    }

    Ok(())
}

fn new_container(kind: ContainerKindArgs) -> NewContainer {
    let (identity, kind) = match kind {
        ContainerKindArgs::Bed {
            identity,
            length,
            width,
            depth,
            material,
        } => (
            identity,
            ContainerKind::RaisedBed {
                length,
                width,
                depth,
                material,
            },
        ),
        ContainerKindArgs::Pot {
            identity,
            diameter,
            depth,
            no_drainage_holes,
        } => (
            identity,
            ContainerKind::Pot {
                diameter,
                depth,
                has_drainage_holes: !no_drainage_holes,
            },
        ),
        ContainerKindArgs::Greenhouse {
            identity,
            length,
            width,
            depth,
            heated,
            grow_lights,
        } => (
            identity,
            ContainerKind::GreenhousePlanter {
                length,
                width,
                depth,
                has_heating: heated,
                has_supplemental_light: grow_lights,
            },
        ),
    };
    NewContainer {
        id: identity.id,
        name: identity.name,
        location: identity.location,
        kind,
    }
}

fn new_plant(kind: PlantKindArgs) -> NewPlant {
    let (identity, kind) = match kind {
        PlantKindArgs::Vegetable {
            identity,
            continuous,
        } => {
            let harvest_style = if continuous {
                HarvestStyle::Continuous
            } else {
                HarvestStyle::Single
            };
            (identity, PlantKind::Vegetable { harvest_style })
        }
        PlantKindArgs::Herb {
            identity,
            perennial,
        } => (identity, PlantKind::Herb { perennial }),
        PlantKindArgs::Flower {
            identity,
            bloom_color,
            no_pollinators,
        } => (
            identity,
            PlantKind::Flower {
                bloom_color,
                attracts_pollinators: !no_pollinators,
            },
        ),
    };
    NewPlant {
        id: identity.id,
        common_name: identity.common_name,
        scientific_name: identity.scientific_name,
        maturity_days: identity.maturity_days,
        kind,
    }
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

/// Command name and arguments for the action log.
fn serialize_command(command: &Commands) -> (String, serde_json::Value) {
    use serde_json::json;

    match command {
        Commands::Init { name, zone } => ("init".to_string(), json!({ "name": name, "zone": zone })),
        Commands::Summary => ("summary".to_string(), json!({})),

        Commands::Container { command } => match command {
            ContainerCommands::Add { kind } => {
                let (shape, identity) = match kind {
                    ContainerKindArgs::Bed { identity, .. } => ("bed", identity),
                    ContainerKindArgs::Pot { identity, .. } => ("pot", identity),
                    ContainerKindArgs::Greenhouse { identity, .. } => ("greenhouse", identity),
                };
                (
                    "container add".to_string(),
                    json!({ "type": shape, "id": identity.id, "name": identity.name, "location": identity.location }),
                )
            }
            ContainerCommands::List => ("container list".to_string(), json!({})),
            ContainerCommands::Show { id, spacing, .. } => (
                "container show".to_string(),
                json!({ "id": id, "spacing": spacing }),
            ),
            ContainerCommands::Move { id, location } => (
                "container move".to_string(),
                json!({ "id": id, "location": location }),
            ),
        },

        Commands::Plant { command } => match command {
            PlantCommands::Add { kind } => {
                let (category, identity) = match kind {
                    PlantKindArgs::Vegetable { identity, .. } => ("vegetable", identity),
                    PlantKindArgs::Herb { identity, .. } => ("herb", identity),
                    PlantKindArgs::Flower { identity, .. } => ("flower", identity),
                };
                (
                    "plant add".to_string(),
                    json!({ "category": category, "id": identity.id, "common_name": identity.common_name, "maturity_days": identity.maturity_days }),
                )
            }
            PlantCommands::List { category } => {
                ("plant list".to_string(), json!({ "category": category }))
            }
            PlantCommands::Show { id } => ("plant show".to_string(), json!({ "id": id })),
        },

        Commands::Cell { command } => match command {
            CellCommands::Create {
                container,
                row,
                column,
            } => (
                "cell create".to_string(),
                json!({ "container": container, "row": row, "column": column }),
            ),
            CellCommands::List {
                available,
                occupied,
            } => (
                "cell list".to_string(),
                json!({ "available": available, "occupied": occupied }),
            ),
            CellCommands::Show { id } => ("cell show".to_string(), json!({ "id": id })),
            CellCommands::Plant {
                cell,
                plant,
                planted_on,
            } => (
                "cell plant".to_string(),
                json!({ "cell": cell, "plant": plant, "planted_on": planted_on.map(|d| d.to_string()) }),
            ),
            CellCommands::Harvest { cell } => ("cell harvest".to_string(), json!({ "cell": cell })),
        },

        Commands::Harvests { days } => ("harvests".to_string(), json!({ "days": days })),

        Commands::Config { command } => match command {
            ConfigCommands::Get { key } => ("config get".to_string(), json!({ "key": key })),
            ConfigCommands::Set { key, value, system } => (
                "config set".to_string(),
                json!({ "key": key, "value": value, "system": system }),
            ),
            ConfigCommands::List => ("config list".to_string(), json!({})),
        },

        Commands::Log { limit } => ("log".to_string(), json!({ "limit": limit })),
    }
}
