use mahjong_engine::{Game, GameConfig, Phase};

fn main() {
    println!("Mahjong Engine\n");

    // Seeded, so the same hand comes up every run
    let config = GameConfig::with_seed(2024);
    let game = match Game::new(config) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };
    let state = game.state();

    println!("Events so far:");
    for line in game.log().messages() {
        println!("  {}", line);
    }

    println!("\nRound {}, {} tiles left in the pool", state.round, state.tiles_left);
    for (player, table) in state.players.iter().zip(&state.tables) {
        let discards: Vec<String> = table.iter().map(|t| t.to_string()).collect();
        println!(
            "  {:<7} {:>2} concealed  [{}]  discards: {}",
            player.name,
            player.concealed,
            player.status.names().join(", "),
            discards.join(" ")
        );
    }

    let hand: Vec<String> = state.hand.iter().map(|t| t.to_string()).collect();
    println!("\nYour hand: {}", hand.join(" "));
    if let Some(tile) = state.new_tile {
        println!("You drew: {}", tile);
    }

    match state.phase {
        Phase::AwaitingDiscard => println!("\nChoose a tile to play."),
        Phase::AwaitingClaim => {
            if let Some(prompt) = &state.prompt {
                println!(
                    "\n{} discarded {}: chow={} pung={} kong={}, or skip",
                    state.players[prompt.from].name, prompt.tile, prompt.chow, prompt.pung, prompt.kong
                );
            }
        }
        Phase::Ended => println!("\nThe game is already over."),
        Phase::Running => {}
    }
}
