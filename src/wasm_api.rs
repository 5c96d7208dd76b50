use crate::{Game, GameConfig, GameResult, GameState, Tile};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Envelope returned by every command
#[derive(Serialize)]
pub struct CommandResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<GameState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn to_json(result: GameResult<GameState>) -> String {
    let envelope = match result {
        Ok(state) => CommandResult {
            success: true,
            state: Some(state),
            error: None,
        },
        Err(e) => CommandResult {
            success: false,
            state: None,
            error: Some(e.to_string()),
        },
    };
    serde_json::to_string(&envelope)
        .unwrap_or_else(|e| format!(r#"{{"success":false,"error":"Serialization error: {}"}}"#, e))
}

/// A running game driven from JavaScript.
///
/// Every command returns a JSON `CommandResult` string holding the new snapshot
/// or the reason the command was refused.
#[wasm_bindgen]
pub struct WasmGame {
    game: Game,
    /// Log lines already mirrored to the console
    echoed: usize,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a game from a JSON config, e.g. `{"seed": 7, "agent": "random"}`.
    /// An empty string uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmGame, JsValue> {
        let config = if config_json.trim().is_empty() {
            Ok(GameConfig::default())
        } else {
            GameConfig::from_json(config_json)
        };
        let game = config
            .and_then(Game::new)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mut wasm_game = WasmGame { game, echoed: 0 };
        wasm_game.echo_log();
        Ok(wasm_game)
    }

    pub fn state(&self) -> String {
        to_json(Ok(self.game.state()))
    }

    /// Discard a tile given in notation such as "b5"
    pub fn play_tile(&mut self, tile: &str) -> String {
        let result = Tile::from_string(tile).and_then(|tile| self.game.play_tile(tile));
        self.echo_log();
        to_json(result)
    }

    pub fn claim_pung(&mut self) -> String {
        let result = self.game.claim_pung(self.game.human());
        self.echo_log();
        to_json(result)
    }

    pub fn claim_kong(&mut self) -> String {
        let result = self.game.claim_kong(self.game.human());
        self.echo_log();
        to_json(result)
    }

    pub fn claim_chow(&mut self) -> String {
        let result = self.game.claim_chow(self.game.human());
        self.echo_log();
        to_json(result)
    }

    pub fn skip(&mut self) -> String {
        let result = self.game.skip();
        self.echo_log();
        to_json(result)
    }

    /// Every event line so far, oldest first
    pub fn log_lines(&self) -> js_sys::Array {
        self.game
            .log()
            .messages()
            .iter()
            .map(|line| JsValue::from_str(line))
            .collect()
    }

    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    fn echo_log(&mut self) {
        let messages = self.game.log().messages();
        for line in &messages[self.echoed..] {
            web_sys::console::log_1(&JsValue::from_str(line));
        }
        self.echoed = messages.len();
    }
}

/// Get the git commit hash that this WASM module was built from
///
/// Returns the first 8 characters of the commit hash, or "unknown" if not available
#[wasm_bindgen]
pub fn get_build_commit() -> String {
    env!("BUILD_COMMIT").to_string()
}
