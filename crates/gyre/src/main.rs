mod driver;
mod events;
mod exec;
mod provider;
mod server;
mod surface;

use clap::{Parser, Subcommand};
use driver::Driver;
use exec::ShellExecutor;
use gyre_core::automation::{ExecuteTarget, Request, Response};
use gyre_core::geometry::Point;
use gyre_core::lifecycle::Orchestrator;
use gyre_core::menu::{ItemId, PositionMode};
use gyre_core::source::MenuSource;
use provider::FsMenuResolver;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::Arc;
use surface::{LogAnnouncer, LogSurface};

#[derive(Parser, Debug)]
#[command(name = "gyre", version, about = "Radial menu daemon and control client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the menu daemon.
    Daemon,
    /// Show a menu and print the outcome once it closes.
    Show {
        /// Named menu from the menus directory
        #[arg(long, conflicts_with_all = ["file", "inline"])]
        menu: Option<String>,
        /// Menu definition file
        #[arg(long, conflicts_with = "inline")]
        file: Option<PathBuf>,
        /// Inline JSON menu definition
        #[arg(long)]
        inline: Option<String>,
        /// Placement: "cursor", "center", or explicit "X,Y"
        #[arg(long)]
        at: Option<String>,
        /// Report the chosen item without executing its action
        #[arg(long)]
        select_only: bool,
    },
    /// Execute a baseline item directly, bypassing the surface.
    Exec {
        /// Item title (case-insensitive), or an id with --by-id
        target: String,
        #[arg(long)]
        by_id: bool,
    },
    /// List named menus and the current baseline items.
    List,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Daemon => run_daemon(),
        Commands::Show { menu, file, inline, at, select_only } => {
            let source = match (menu, file, inline) {
                (Some(name), _, _) => MenuSource::Named(name.into()),
                (_, Some(path), _) => MenuSource::File(path),
                (_, _, Some(json)) => MenuSource::Inline(json),
                _ => MenuSource::Default,
            };
            let (position, point) = parse_at(at)?;
            print_response(send_request(&Request::Show {
                source,
                position,
                at: point,
                select_only,
            })?)
        }
        Commands::Exec { target, by_id } => {
            let target = if by_id {
                ExecuteTarget::Id { id: ItemId::new(target) }
            } else {
                ExecuteTarget::Title { title: target }
            };
            print_response(send_request(&Request::Execute { target })?)
        }
        Commands::List => print_response(send_request(&Request::List)?),
    }
}

fn run_daemon() -> anyhow::Result<()> {
    let paths = provider::Paths::discover()?;
    if let Err(e) = provider::write_default_config(&paths) {
        log::warn!("could not seed default config: {e}");
    }

    let baseline = provider::load_or_setup(&paths);
    let resolver = Arc::new(FsMenuResolver::new(baseline.clone(), paths.menus_dir.clone()));
    let orchestrator = Orchestrator::new(baseline, Box::new(LogSurface), Box::new(LogAnnouncer));

    let (tx, rx) = async_channel::bounded(32);
    let driver = Driver::new(
        orchestrator,
        Arc::new(ShellExecutor),
        resolver,
        paths.clone(),
        tx.clone(),
        rx,
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        tokio::spawn(server::run_server(tx.clone()));
        tokio::spawn(provider::run_async_watcher(paths, tx.clone()));
        driver.run().await;
    });
    Ok(())
}

fn parse_at(at: Option<String>) -> anyhow::Result<(Option<PositionMode>, Option<Point>)> {
    let Some(s) = at else {
        return Ok((None, None));
    };
    match s.as_str() {
        "cursor" => Ok((Some(PositionMode::Cursor), None)),
        "center" => Ok((Some(PositionMode::Center), None)),
        other => {
            let (x, y) = other
                .split_once(',')
                .ok_or_else(|| anyhow::anyhow!("--at expects cursor, center, or X,Y"))?;
            let point = Point::new(x.trim().parse()?, y.trim().parse()?);
            Ok((Some(PositionMode::Fixed), Some(point)))
        }
    }
}

fn send_request(request: &Request) -> anyhow::Result<Response> {
    let mut stream = UnixStream::connect(server::SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "failed to connect to gyre daemon at {}: {}. Is gyre running?",
            server::SOCKET_PATH,
            e
        )
    })?;

    let mut line = serde_json::to_string(request)?;
    line.push('\n');
    stream.write_all(line.as_bytes())?;

    let mut reader = BufReader::new(stream);
    let mut response = String::new();
    reader.read_line(&mut response)?;
    Ok(serde_json::from_str(response.trim())?)
}

fn print_response(response: Response) -> anyhow::Result<()> {
    let failed = matches!(response, Response::Error { .. });
    println!("{}", serde_json::to_string_pretty(&response)?);
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
