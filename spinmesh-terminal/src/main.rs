/// spinmesh terminal demo - a flat-shaded mesh spinning in the terminal
///
/// Usage: spinmesh-terminal [--config <file.toml>] [<mesh.obj>]
///
/// Without a mesh path (here or in the config) the built-in unit cube is shown.
/// Controls:
///   - Q/ESC: Quit
use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spinmesh_core::{MeshRenderer, RenderConfig};
use spinmesh_terminal::TerminalApp;

const USAGE: &str = "Usage: spinmesh-terminal [--config <file.toml>] [<mesh.obj>]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    mesh: Option<PathBuf>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "-c" | "--config" => {
                let Some(path) = args.next() else {
                    bail!("{arg} needs a file argument\n{USAGE}");
                };
                parsed.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => bail!("unknown option '{flag}'\n{USAGE}"),
            _ if parsed.mesh.is_some() => bail!("more than one mesh given\n{USAGE}"),
            _ => parsed.mesh = Some(PathBuf::from(&arg)),
        }
    }

    Ok(parsed)
}

fn main() -> Result<()> {
    // Logs go to stderr so they do not interleave with the canvas
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(mesh) = args.mesh {
        config.mesh.path = Some(mesh);
    }

    info!("Starting spinmesh with mesh source {:?}", config.mesh.source());

    let mut app = TerminalApp::new(MeshRenderer::new(config)).context("failed to start renderer")?;
    app.run()?;

    Ok(())
}
