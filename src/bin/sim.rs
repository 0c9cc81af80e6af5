use battleship_server::{init_logging_with_default, simulate, GameConfig};
use log::LevelFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: {} <seed1> <seed2> [board_size]", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;
    let config = match args.get(3) {
        Some(size) => GameConfig::with_board_size(size.parse()?),
        None => GameConfig::default(),
    };

    // stdout carries only the JSON summary.
    init_logging_with_default(LevelFilter::Warn);
    let report = simulate(seed1, seed2, config).await?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
