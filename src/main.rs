#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use battleship_server::{init_logging, serve_match, Bot, GameConfig, DEFAULT_BOARD_SIZE, DEFAULT_PORT, MAX_LINE_LEN};

#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Host matches, pairing each two connections that arrive.
    Serve {
        #[arg(long, default_value_t = format!("0.0.0.0:{}", DEFAULT_PORT))]
        bind: String,
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        board_size: usize,
        #[arg(long, default_value_t = MAX_LINE_LEN, help = "Longest accepted client line in bytes")]
        max_line_len: usize,
        #[arg(long, help = "Exit after the first match instead of waiting for the next pair")]
        once: bool,
    },
    /// Connect to a server and let a bot play one match.
    Bot {
        #[arg(long, default_value_t = format!("127.0.0.1:{}", DEFAULT_PORT))]
        connect: String,
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        board_size: usize,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            board_size,
            max_line_len,
            once,
        } => {
            if board_size == 0 {
                return Err(anyhow::anyhow!("--board-size must be at least 1"));
            }
            let config = GameConfig {
                board_size,
                max_line_len,
            };
            let listener = TcpListener::bind(&bind).await?;
            log::info!("server started on {} ({}x{} board)", listener.local_addr()?, board_size, board_size);
            loop {
                log::info!("waiting for two players to connect...");
                match serve_match(&listener, config).await {
                    Ok(summary) => match summary.winner {
                        Some(id) => println!("Game over! Winner: Player {}", id),
                        None => println!("Game over! No winner."),
                    },
                    Err(e) => log::error!("match aborted: {}", e),
                }
                if once {
                    break;
                }
            }
        }
        Commands::Bot {
            connect,
            board_size,
            seed,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            log::info!("bot connecting to {} with seed {}", connect, seed);
            let mut bot = Bot::new(seed, GameConfig::with_board_size(board_size));
            let report = bot.run(&connect).await?;
            match report.winner {
                Some(_) if report.won() => println!("Victory after {} shots ({} hits).", report.shots, report.hits),
                Some(id) => println!("Defeat: player {} won. We fired {} shots.", id, report.shots),
                None => println!("Match ended without a winner."),
            }
        }
    }
    Ok(())
}
