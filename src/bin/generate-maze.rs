//! CLI for maze generation

use clap::Parser;
use flood_fill_maze::maze_generator::MazeGenerator;

/// Print an unsolved maze, readable by `flood-fill-maze FILE`
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Side length of the generated maze
    #[arg(long, default_value_t = 14, value_parser = clap::value_parser!(u16).range(3..))]
    size: u16,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut gen = MazeGenerator::new(args.seed);
    let maze = gen.generate_maze(usize::from(args.size));
    println!("{}", maze);
    Ok(())
}
