use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use config_file::FromConfigFile;
use serde::Deserialize;

use crate::olaoutput::last_universe;
use crate::options::{ConfigUpdate, TreeOptions};
use crate::strip::ChannelOrder;

const DEFAULT_PORT: u16 = 80;
const DEFAULT_PIXELS: usize = 300;
const DEFAULT_BRIGHTNESS: f32 = 0.5;
const DEFAULT_ORDER: ChannelOrder = ChannelOrder::Grb;
const DEFAULT_OLA_ADDR: &str = "127.0.0.1:7770";

#[derive(Parser, Debug, Default)]
#[command(about = "Animate an LED strip in holiday colors, controlled over HTTP")]
pub struct Cli {
    /// TOML file with any of the settings below plus the starting animation
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// TCP port to accept control requests on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Number of LEDs on the strip
    #[arg(short = 'n', long)]
    pub pixels: Option<usize>,

    /// Global brightness, 0.0 to 1.0
    #[arg(short, long)]
    pub brightness: Option<f32>,

    /// Channel order the LEDs expect
    #[arg(long, value_enum)]
    pub order: Option<ChannelOrder>,

    /// OLA daemon OSC address
    #[arg(long, value_name = "ADDR")]
    pub ola: Option<SocketAddr>,

    /// First DMX universe of the strip
    #[arg(long)]
    pub universe: Option<u32>,

    /// Cap the frame rate. Renders as fast as possible when unset.
    #[arg(long, value_name = "HZ")]
    pub fps: Option<f32>,
}

/// Contents of the optional config file. Every key may be left out.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub port: Option<u16>,
    pub pixels: Option<usize>,
    pub brightness: Option<f32>,
    pub order: Option<ChannelOrder>,
    pub ola: Option<SocketAddr>,
    pub universe: Option<u32>,
    pub fps: Option<f32>,

    pub scheme: Option<usize>,
    pub pattern: Option<usize>,
    pub width: Option<usize>,
    pub speed: Option<usize>,
    pub glitter: Option<usize>,
}

/// Everything fixed for the lifetime of the process.
#[derive(Debug, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub pixels: usize,
    pub brightness: f32,
    pub order: ChannelOrder,
    pub ola: SocketAddr,
    pub universe: u32,
    pub fps: Option<f32>,
    pub initial: TreeOptions,
}

impl Settings {
    pub fn load(cli: &Cli) -> Result<Settings, String> {
        let file = match &cli.config {
            Some(path) => match FileSettings::from_config_file(path) {
                Ok(file) => file,
                Err(err) => return Err(format!("Cannot read {}: {}", path.display(), err)),
            },
            None => FileSettings::default(),
        };

        Settings::merge(cli, file)
    }

    /// Command line wins over the file, the file wins over built-in defaults.
    pub fn merge(cli: &Cli, file: FileSettings) -> Result<Settings, String> {
        let ola = match cli.ola.or(file.ola) {
            Some(addr) => addr,
            None => DEFAULT_OLA_ADDR.parse().map_err(|err| format!("{err}"))?,
        };

        let pixels = cli.pixels.or(file.pixels).unwrap_or(DEFAULT_PIXELS);
        if pixels == 0 {
            return Err("The strip needs at least one pixel".to_string());
        }

        let universe = cli.universe.or(file.universe).unwrap_or(0);
        if last_universe(universe, pixels).is_none() {
            return Err(format!(
                "{} pixels starting at universe {} run past the last universe",
                pixels, universe
            ));
        }

        let fps = cli.fps.or(file.fps).filter(|fps| *fps > 0.0);

        let mut initial = TreeOptions::new();
        let starting = [
            ("scheme", file.scheme),
            ("pattern", file.pattern),
            ("width", file.width),
            ("speed", file.speed),
            ("glitter", file.glitter),
        ];
        for (key, value) in starting {
            let Some(value) = value else { continue };
            if let Some(update) = ConfigUpdate::from_key_value(key, value) {
                if let Err(msg) = initial.apply(update) {
                    log::warn!("Ignoring starting {key}: {msg}");
                }
            }
        }

        Ok(Settings {
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
            pixels,
            brightness: cli
                .brightness
                .or(file.brightness)
                .unwrap_or(DEFAULT_BRIGHTNESS)
                .clamp(0.0, 1.0),
            order: cli.order.or(file.order).unwrap_or(DEFAULT_ORDER),
            ola,
            universe,
            fps,
            initial,
        })
    }
}
