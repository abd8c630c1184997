//! CLI for generating and solving a maze

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use flood_fill_maze::{maze_generator::MazeGenerator, Maze};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

/// Carve a random maze with a single corridor and walk it from left to right
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Print version and exit
    #[arg(short = 'v', long)]
    version: bool,

    /// Side length of the generated maze
    #[arg(long, default_value_t = 14, value_parser = clap::value_parser!(u16).range(3..))]
    size: u16,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print without colors
    #[arg(long)]
    plain: bool,

    /// File, where to read an unsolved maze instead of generating one. Use
    /// `-` for stdin.
    file: Option<PathBuf>,
}

/// Generate or read a maze, solve it and print the result
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.version {
        println!("\n{}\n", version_banner());
        return Ok(());
    }

    let mut maze = match &args.file {
        Some(path) => read_maze(path)?,
        None => MazeGenerator::new(args.seed).generate_maze(usize::from(args.size)),
    };
    let solution = maze.solve()?;
    info!("solved maze, corridor has {} cells", solution.steps.len());

    println!("\n");
    if args.plain {
        println!("{}", maze);
    } else {
        let mut random = if let Some(state) = args.seed {
            StdRng::seed_from_u64(state)
        } else {
            StdRng::from_entropy()
        };
        println!("{}", maze.render_colored(&mut random));
    }
    Ok(())
}

/// Name and `major.minor` version, e.g. `FloodFillMaze v2.0`
fn version_banner() -> String {
    format!(
        "FloodFillMaze v{}.{}",
        env!("CARGO_PKG_VERSION_MAJOR"),
        env!("CARGO_PKG_VERSION_MINOR")
    )
}

fn read_maze(path: &Path) -> anyhow::Result<Maze> {
    let text = if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Could not read maze from {}", path.display()))?
    };
    Ok(Maze::parse(&text)?)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::{version_banner, Args};

    #[test]
    fn version_flag_is_recognised() {
        assert!(Args::parse_from(["flood-fill-maze", "-v"]).version);
        assert!(Args::parse_from(["flood-fill-maze", "--version"]).version);
        assert!(!Args::parse_from(["flood-fill-maze"]).version);
        assert_eq!(version_banner(), "FloodFillMaze v2.0");
    }

    #[test]
    fn size_below_three_is_rejected() {
        assert!(Args::try_parse_from(["flood-fill-maze", "--size", "2"]).is_err());
        assert_eq!(Args::parse_from(["flood-fill-maze"]).size, 14);
    }
}
