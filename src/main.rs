pub(crate) mod color;
pub(crate) mod effects;
pub(crate) mod intervaltimer;
pub(crate) mod listener;
pub(crate) mod olaoutput;
pub(crate) mod options;
pub(crate) mod renderer;
pub(crate) mod settings;
pub(crate) mod strip;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use intervaltimer::IntervalTimer;
use listener::RequestListener;
use olaoutput::OlaOutput;
use renderer::TreeRenderer;
use settings::{Cli, Settings};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    let settings = match Settings::load(&args) {
        Ok(settings) => settings,
        Err(msg) => panic!("Cannot load settings: {}", msg),
    };

    let listen_addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = match RequestListener::new(listen_addr) {
        Ok(listener) => listener,
        Err(msg) => panic!("Cannot set up request listener: {}", msg),
    };
    match listener.local_addr() {
        Ok(addr) => log::info!("Listening on {addr}"),
        Err(msg) => log::warn!("Listening on unknown address: {msg}"),
    }

    let mut strip = match OlaOutput::new(
        settings.ola,
        settings.universe,
        settings.pixels,
        settings.brightness,
        settings.order,
    ) {
        Ok(strip) => strip,
        Err(msg) => panic!("Cannot set up OLA output: {}", msg),
    };
    log::info!(
        "Driving {} pixels through OLA at {}, universe {}",
        settings.pixels,
        settings.ola,
        settings.universe
    );

    let running = Arc::new(AtomicBool::new(true));
    let handler_running = Arc::clone(&running);
    if let Err(err) = ctrlc::set_handler(move || handler_running.store(false, Ordering::SeqCst)) {
        panic!("Cannot install signal handler: {}", err);
    }

    // Written only by the listener and read only by the renderer, both from
    // this loop, so it needs no lock.
    let mut options = settings.initial.clone();
    log::info!("Starting with {}", options.describe());
    let mut renderer = TreeRenderer::new(settings.pixels);
    let mut timer = settings.fps.map(IntervalTimer::new);
    let mut output_failing = false;
    let start = Instant::now();

    while running.load(Ordering::SeqCst) {
        listener.poll(&mut options);

        let now_ms = start.elapsed().as_millis() as u64;
        match renderer.render_frame(&options, now_ms, &mut strip) {
            Ok(()) if output_failing => {
                log::info!("Output recovered");
                output_failing = false;
            }
            Ok(()) => {}
            Err(msg) if !output_failing => {
                log::warn!("{msg}");
                output_failing = true;
            }
            Err(_) => {}
        }

        if let Some(timer) = timer.as_mut() {
            timer.sleep_until_next_tick();
        }
    }

    log::info!("Shutting down");
    if let Err(msg) = strip.blackout() {
        log::warn!("Cannot blank the strip: {msg}");
    }
}
