use std::process::ExitCode;

use chess_rules::config::{AppConfig, OutputFormat};
use chess_rules::engine::san::parse_long_algebraic;
use chess_rules::engine::{ChessError, Game, GameStatus};

fn main() -> ExitCode {
    let config = AppConfig::from_env();

    // Logs go to stderr so JSON output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| "chess_rules=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let moves: Vec<String> = std::env::args().skip(1).collect();
    if moves.iter().any(|a| a == "-h" || a == "--help") {
        println!("usage: chess-rules <move>...   (long algebraic, e.g. e2e4 e7e5 g1f3)");
        return ExitCode::SUCCESS;
    }

    tracing::info!(
        "chess-rules v{} replaying {} moves",
        env!("CARGO_PKG_VERSION"),
        moves.len()
    );

    let mut game = Game::new();
    for (i, token) in moves.iter().enumerate() {
        if let Err(e) = replay(&mut game, token, &config) {
            eprintln!("move {} ({token}) rejected: {e}", i + 1);
            return ExitCode::FAILURE;
        }
    }

    match config.output {
        OutputFormat::Text => {
            println!("{}", game.board());
            println!();
            println!("turn:   {}", game.turn());
            println!("status: {}{}", game.status(), if game.in_check() { " (check)" } else { "" });
            if !game.san_history().is_empty() {
                println!("moves:  {}", game.san_history().join(" "));
            }
        }
        OutputFormat::Json => match game.snapshot().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("failed to serialize game: {e}");
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

/// Play one long-algebraic move through the click surface.
fn replay(game: &mut Game, token: &str, config: &AppConfig) -> Result<(), ChessError> {
    let (from, to, promotion) = parse_long_algebraic(token)?;
    game.select(from)?;
    game.apply_move(to)?;
    if game.status() == GameStatus::AwaitingPromotion {
        game.promote(promotion.unwrap_or(config.default_promotion))?;
    } else if promotion.is_some() {
        tracing::warn!(token, "promotion suffix ignored on a non-promoting move");
    }
    Ok(())
}
