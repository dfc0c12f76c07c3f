//! Lava Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use lava_runner::consts::SIM_DT;
    use lava_runner::platform::{LogPresenter, Presenter};
    use lava_runner::remote::web::RemoteConnection;
    use lava_runner::{Controls, Game, GameConfig};

    /// Browser-side game instance
    struct WebGame {
        game: Game,
        controls: Controls,
        presenter: LogPresenter,
        last_time: f64,
        _remote: Option<RemoteConnection>,
    }

    impl WebGame {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            let events = self.game.update(dt, self.controls);
            self.presenter.present(&self.game.state, &events);
        }

        fn set_key(&mut self, key: &str, down: bool) {
            match key {
                "ArrowLeft" | "a" | "A" => self.controls.left = down,
                "ArrowRight" | "d" | "D" => self.controls.right = down,
                "ArrowUp" | "w" | "W" | " " => self.controls.jump = down,
                "r" | "R" if down && self.game.state.is_over() => {
                    let seed = js_sys::Date::now() as u64;
                    self.game.restart(seed);
                    log::info!("Restarted with seed {seed}");
                }
                _ => {}
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Lava Runner starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };

        let mut config = GameConfig::load();
        config.seed = js_sys::Date::now() as u64;
        let game = Game::new(config);

        let remote = match RemoteConnection::connect(&game.state.config.remote, game.sender()) {
            Ok(connection) => Some(connection),
            Err(e) => {
                log::warn!("Remote unavailable: {e:?}");
                None
            }
        };

        let web_game = Rc::new(RefCell::new(WebGame {
            game,
            controls: Controls::default(),
            presenter: LogPresenter::default(),
            last_time: 0.0,
            _remote: remote,
        }));

        setup_keyboard(&window, web_game.clone());
        request_animation_frame(web_game);

        log::info!("Lava Runner running!");
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<WebGame>>) {
        for (event_name, down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().set_key(&event.key(), down);
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<WebGame>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless native runner.
///
/// Usage: `lava-runner [config.json] [seconds]`. Holds "right", reads remote
/// commands line by line from stdin and prints a JSON summary at the end.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::io::BufRead;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use lava_runner::consts::SIM_DT;
    use lava_runner::platform::{LogPresenter, Presenter, RunSummary};
    use lava_runner::remote::CommandSender;
    use lava_runner::{Controls, Game, GameConfig, secs_to_ticks};

    fn spawn_stdin_reader(sender: CommandSender) {
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => sender.deliver(line.trim_end()),
                    Err(e) => {
                        log::warn!("stdin closed: {e}");
                        break;
                    }
                }
            }
        });
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Lava Runner (native) starting...");

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);

    let config = GameConfig::load_or_default(config_path.as_deref());
    let mut game = Game::new(config);
    spawn_stdin_reader(game.sender());

    let mut presenter = LogPresenter::default();
    let controls = Controls {
        right: true,
        ..Default::default()
    };
    let frame = Duration::from_secs_f32(SIM_DT);
    let limit = secs_to_ticks(seconds);

    let mut last = Instant::now();
    while game.state.time_ticks < limit && !game.state.is_over() {
        std::thread::sleep(frame);
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        let events = game.update(dt, controls);
        presenter.present(&game.state, &events);
    }

    match serde_json::to_string_pretty(&RunSummary::from(&game.state)) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to write summary: {e}"),
    }
}
