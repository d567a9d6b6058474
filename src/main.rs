use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::error;
use tracing_subscriber::EnvFilter;

use mud_world::{
    AnsiColors, AreaId, Location, World, WorldConfig, describe_room, find_route, path_directions,
    reconstruct_path, shortest_path,
};

fn init_logging(config: &WorldConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_numbers(args: &[&str]) -> Option<Vec<usize>> {
    args.iter().map(|a| a.parse().ok()).collect()
}

fn area_id(raw: usize) -> Option<AreaId> {
    AreaId::try_from(raw).ok()
}

fn run_command(world: &World, verb: &str, args: &[&str]) -> String {
    match (verb, parse_numbers(args).as_deref()) {
        ("areas", _) => world
            .areas()
            .map(|a| format!("{:>4}  {} ({} rooms)", a.id, a.name, a.num_rooms()))
            .collect::<Vec<_>>()
            .join("\n"),
        ("look", Some(&[area, room])) => {
            let Some(area) = area_id(area) else {
                return format!("No area {}.", area);
            };
            match world.get_room(area, room) {
                Ok(room) => describe_room(room, None, &AnsiColors),
                Err(e) => e.to_string(),
            }
        }
        ("path", Some(&[raw_area, from, to])) => {
            let Some(area) = area_id(raw_area).and_then(|id| world.area(id)) else {
                return format!("No area {}.", raw_area);
            };
            let result = match shortest_path(area, from) {
                Ok(r) => r,
                Err(e) => return e.to_string(),
            };
            match reconstruct_path(&result, from, to) {
                Some(rooms) => {
                    let ids = rooms
                        .iter()
                        .map(|r| r.to_string())
                        .collect::<Vec<_>>()
                        .join(" -> ");
                    let dirs = path_directions(area, &rooms)
                        .unwrap_or_default()
                        .iter()
                        .map(|d| d.name())
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("{} ({} hops: {})", ids, rooms.len() - 1, dirs)
                }
                None => format!("No path from {} to {}.", from, to),
            }
        }
        ("route", Some(&[fa, fr, ta, tr])) => {
            let (Some(fa), Some(ta)) = (area_id(fa), area_id(ta)) else {
                return "Area ids must fit in 32 bits.".to_string();
            };
            let from = Location::new(fa, fr);
            let to = Location::new(ta, tr);
            match find_route(world, from, to) {
                Ok(Some(steps)) if steps.is_empty() => "You are already there.".to_string(),
                Ok(Some(steps)) => steps
                    .iter()
                    .map(|s| format!("{} to {}", s.direction, s.to))
                    .collect::<Vec<_>>()
                    .join("\n"),
                Ok(None) => format!("No route from {} to {}.", from, to),
                Err(e) => e.to_string(),
            }
        }
        _ => "Commands: areas | look <area> <room> | path <area> <from> <to> | \
              route <area> <room> <area> <room> | quit"
            .to_string(),
    }
}

fn main() -> io::Result<()> {
    let config_path: PathBuf = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/world.toml"));

    let config = match WorldConfig::from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to read config '{}': {e}", config_path.display());
            std::process::exit(1);
        }
    };
    init_logging(&config);

    let world = match World::load_from_config(&config) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to load world: {e}");
            std::process::exit(1);
        }
    };

    println!("Type 'areas' to list loaded areas, 'quit' to exit.\n");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            println!();
            break;
        }

        let mut parts = input.split_whitespace();
        let Some(verb) = parts.next() else { continue };
        let verb = verb.to_lowercase();
        if verb == "quit" || verb == "exit" {
            break;
        }

        let args: Vec<&str> = parts.collect();
        println!("{}", run_command(&world, &verb, &args));
    }

    Ok(())
}
