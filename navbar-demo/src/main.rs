mod input;
mod page;
mod terminal;

use std::fs::{self, File};
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::EventStream;
use futures::StreamExt;
use log::{debug, error, info, warn};
use navbar::SidebarOptions;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::input::{Flow, Pointer};
use crate::page::Demo;
use crate::terminal::TerminalGuard;

const TICK: Duration = Duration::from_millis(50);

/// Options from a JSON file given as the first argument, defaults otherwise.
fn load_options() -> io::Result<SidebarOptions> {
    let mut options = match std::env::args().nth(1) {
        Some(path) => {
            let source = fs::read_to_string(&path)?;
            serde_json::from_str(&source).map_err(io::Error::other)?
        }
        None => SidebarOptions::default(),
    };
    if options.toggle_id.is_none() {
        options.toggle_id = Some("toggle".to_string());
    }
    Ok(options)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    let log_file = File::create("navbar-demo.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file).map_err(io::Error::other)?;

    let options = load_options()?;
    debug!("options: {options:?}");

    let mut terminal = TerminalGuard::new()?;
    let (cols, rows) = terminal.size()?;
    let mut demo = Demo::new(cols, rows, options).map_err(io::Error::other)?;
    info!("demo started at {cols}x{rows}");

    let mut events = EventStream::new();
    let mut pointer = Pointer::default();
    let mut ticker = tokio::time::interval(TICK);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last_tick = Instant::now();

    loop {
        demo.render(terminal.stdout())?;

        tokio::select! {
            next = events.next() => {
                let event = match next {
                    Some(Ok(event)) => event,
                    Some(Err(e)) => {
                        error!("Event stream error: {e}");
                        continue;
                    }
                    None => break,
                };
                match input::handle(&mut demo, &mut pointer, event) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => warn!("{e}"),
                }
            }

            _ = ticker.tick() => {
                let now = Instant::now();
                if let Err(e) = demo.sidebars.advance(now - last_tick) {
                    warn!("{e}");
                }
                last_tick = now;
            }
        }
    }

    info!("demo stopped");
    Ok(())
}
