use mahjong_engine::{Agent, DrawnTileAgent, Game, GameConfig, GameResult, GameState, Phase};

/// Answer the human seat's decisions with an agent until the game ends
fn autoplay(game: &mut Game, pilot: &mut dyn Agent) -> GameResult<GameState> {
    let human = game.human();
    let mut state = game.state();
    while !state.ended {
        state = match state.phase {
            Phase::AwaitingDiscard => {
                let me = &game.players()[human];
                let tile = match pilot.choose_discard(me) {
                    Some(tile) => tile,
                    None => state.hand[0],
                };
                game.play_tile(tile)?
            }
            Phase::AwaitingClaim => match state.prompt {
                Some(ref prompt) if prompt.kong => game.claim_kong(human)?,
                Some(ref prompt) if prompt.pung => game.claim_pung(human)?,
                Some(ref prompt) if prompt.chow => game.claim_chow(human)?,
                _ => game.skip()?,
            },
            Phase::Running | Phase::Ended => break,
        };
    }
    Ok(state)
}

fn main() {
    let seed = std::env::args().nth(1).and_then(|s| s.parse::<u64>().ok());
    let config = GameConfig {
        seed,
        ..GameConfig::default()
    };

    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let result = autoplay(&mut game, &mut DrawnTileAgent);

    for line in game.log().messages() {
        println!("{}", line);
    }

    match result {
        Ok(state) => match serde_json::to_string_pretty(&state) {
            Ok(json) => println!("\n{}", json),
            Err(e) => eprintln!("ERROR: could not serialize final state: {}", e),
        },
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}
