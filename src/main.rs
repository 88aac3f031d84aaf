//! Fearwater entry point
//!
//! In the browser, keyboard listeners feed a `TickInput` queue that the
//! animation frame loop drains at 30 fps. Natively there is no window yet, so
//! this runs a scripted, headless walk through the campaign and logs what
//! happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use fearwater::Settings;
    use fearwater::consts::FRAME_MS;
    use fearwater::persistence::LocalStorage;
    use fearwater::sim::{GameEvent, GameLogic, GameStatus, InputEvent, Level, TickInput};

    struct Game {
        logic: GameLogic<LocalStorage>,
        pending: Vec<InputEvent>,
        last_frame: f64,
    }

    impl Game {
        fn update(&mut self, time: f64) {
            if time - self.last_frame < FRAME_MS {
                return;
            }
            self.last_frame = time;

            let input = TickInput {
                events: std::mem::take(&mut self.pending),
                time_ms: time,
            };
            if let Some(event) = self.logic.play(&input) {
                match event {
                    GameEvent::Caught { camera } => log::info!("Caught by camera {:?}", camera),
                    GameEvent::Restarted => log::debug!("Restarted"),
                    GameEvent::LevelComplete { level } => log::info!("Level {}", level + 1),
                    GameEvent::CampaignComplete { deaths } => {
                        log::info!("Campaign complete: {} deaths", deaths)
                    }
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }

        log::info!("Fearwater starting...");

        let level = match Level::built_in() {
            Ok(level) => level,
            Err(e) => {
                log::error!("Bundled levels are broken: {}", e);
                return;
            }
        };
        let mut logic = GameLogic::new(level, LocalStorage, Settings::load());
        logic.start();

        let game = Rc::new(RefCell::new(Game {
            logic,
            pending: Vec::new(),
            last_frame: 0.0,
        }));

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());
        request_animation_frame(game);

        log::info!("Fearwater running!");
    }

    fn key_char(event: &web_sys::KeyboardEvent) -> Option<char> {
        let mut chars = event.key().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c.to_ascii_lowercase()),
            _ => None,
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                if event.key() == "Escape" {
                    if g.logic.status() == GameStatus::Pause {
                        g.logic.unpause();
                    } else {
                        g.logic.pause();
                    }
                    return;
                }
                if event.repeat() {
                    return;
                }
                if let Some(key) = key_char(&event) {
                    g.pending.push(InputEvent::KeyDown(key));
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(key) = key_char(&event) {
                    game.borrow_mut().pending.push(InputEvent::KeyUp(key));
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur (click outside, tab switch). Key releases while
        // unfocused never arrive, so drop every held key.
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            g.pending.push(InputEvent::ReleaseAll);
            if g.logic.can_pause_game() {
                g.logic.pause();
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().update(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use fearwater::consts::FRAME_MS;
    use fearwater::Settings;
    use fearwater::persistence::FileStorage;
    use fearwater::sim::{GameEvent, GameLogic, InputEvent, Level, TickInput};

    const SAVE_FILE: &str = "fearwater_save.json";

    env_logger::init();
    log::info!("Fearwater (native) starting...");

    let level = match Level::built_in() {
        Ok(level) => level,
        Err(e) => {
            log::error!("Bundled levels are broken: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    };

    let storage = FileStorage::open(SAVE_FILE);
    let mut game = GameLogic::new(level, storage, Settings::load());
    game.start();

    // Walk right, nudging up and down, for twenty seconds of game time
    let script = [('d', 45), ('w', 10), ('d', 60), ('s', 15), ('d', 90)];
    let mut frame = 0u64;
    for _ in 0..4 {
        for &(key, frames) in &script {
            for i in 0..frames {
                let mut input = TickInput::at(frame as f64 * FRAME_MS);
                if i == 0 {
                    input = input.with_event(InputEvent::KeyDown(key));
                }
                if i + 1 == frames {
                    input = input.with_event(InputEvent::KeyUp(key));
                }

                match game.play(&input) {
                    Some(GameEvent::Caught { camera }) => {
                        println!("frame {:5}: caught by camera {:?}", frame, camera)
                    }
                    Some(GameEvent::LevelComplete { level }) => {
                        println!("frame {:5}: reached level {}", frame, level + 1)
                    }
                    Some(GameEvent::CampaignComplete { deaths }) => {
                        println!("frame {:5}: campaign complete, {} deaths", frame, deaths)
                    }
                    Some(GameEvent::Restarted) | None => {}
                }
                frame += 1;
            }
        }
    }

    println!(
        "Finished on level {} with {} deaths",
        game.level_index() + 1,
        game.deaths()
    );
    if let Some(best) = game.best_deaths() {
        println!("Last completed run: {} deaths", best);
    }
    log::info!("Progress saved to {}", SAVE_FILE);
    std::process::ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
