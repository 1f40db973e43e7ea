/// Entry point and host loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::random::SeededRng;
use domain::sprite::AnimationTable;
use sim::event::SimEvent;
use sim::ports::{ButtonSource, Clock, MonotonicClock};
use sim::step;
use sim::world::World;
use ui::gamepad::GamepadButtons;
use ui::input::KeyboardButtons;
use ui::renderer::TerminalDisplay;
use ui::sprites::slime_idle;

const LOG_FILE: &str = "slimewalk.log";

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = GameConfig::load();
    let seed = config.generation.seed.unwrap_or_else(SeededRng::entropy_seed);
    info!(seed, strategy = ?config.generation.strategy, "starting");

    let assets = slime_idle();
    let clock = MonotonicClock::new();
    let mut rng = SeededRng::new(seed);

    let mut world = World::new(
        &config,
        (assets.width(), assets.height()),
        assets.len(),
        clock.now_millis(),
    );
    world.regenerate(&mut rng);

    let mut display = TerminalDisplay::new(config.field.width, config.field.height);
    display.init().context("terminal init failed")?;

    let result = host_loop(&mut world, &mut display, &mut rng, &clock, &assets, &config);

    // Always restore the terminal, even when the loop failed.
    let cleanup = display.cleanup().context("terminal cleanup failed");
    result?;
    cleanup?;

    info!(ticks = world.tick, "bye");
    Ok(())
}

/// Route tracing output to a log file; the terminal belongs to the display.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("slimewalk=info"));

    match File::create(LOG_FILE) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
}

fn host_loop(
    world: &mut World,
    display: &mut TerminalDisplay,
    rng: &mut SeededRng,
    clock: &dyn Clock,
    assets: &AnimationTable,
    config: &GameConfig,
) -> anyhow::Result<()> {
    let mut kb = KeyboardButtons::new(display.enhanced_keys());
    let mut gp = GamepadButtons::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        info!("gamepad detected");
    }
    let frame_sleep = Duration::from_millis(config.timing.frame_sleep_ms);

    loop {
        let buttons = kb.sample().merge(gp.sample());
        if kb.quit_requested() {
            break;
        }

        let now = clock.now_millis();
        let events = step::step(world, now, &buttons, rng);
        log_events(&events);

        step::render(world, now, display, assets).context("display write failed")?;
        std::thread::sleep(frame_sleep);
    }

    Ok(())
}

fn log_events(events: &[SimEvent]) {
    for event in events {
        match event {
            SimEvent::ModeChanged { mode, at } => info!(?mode, at, "mode changed"),
            SimEvent::Bumped { dir, at } => debug!(?dir, x = at.x, y = at.y, "bumped wall"),
            SimEvent::HeadingChanged { from, to, cause } => {
                debug!(?from, ?to, ?cause, "heading changed")
            }
        }
    }
}
