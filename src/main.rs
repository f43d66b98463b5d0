use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use pixels::{Pixels, SurfaceTexture};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::dpi::LogicalSize;
use winit::event::{Event, VirtualKeyCode};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;
use winit_input_helper::WinitInputHelper;

use kolor::{FileStore, Game, Layout, Screen, Settings, Ticker, HEIGHT, WIDTH};

const DEFAULT_SETTINGS: &str = "kolor.ron";

#[derive(Parser, Debug)]
#[command(author, version, about = "KOLOR, a timed color-matching quiz", long_about = None)]
struct Args {
    /// RON settings file; defaults to kolor.ron when that exists
    settings: Option<PathBuf>,
}

fn load_settings(args: &Args) -> Result<Settings> {
    let path = match &args.settings {
        Some(path) => path.clone(),
        None => {
            let path = PathBuf::from(DEFAULT_SETTINGS);
            if !path.exists() {
                return Ok(Settings::default());
            }
            path
        }
    };
    let settings = Settings::load(&path)
        .with_context(|| format!("loading settings from {}", path.display()))?;
    info!("loaded settings from {}", path.display());
    Ok(settings)
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let settings = load_settings(&args)?;
    let screen = match &settings.font_path {
        Some(path) => Screen::load_font(path).unwrap_or_else(|e| {
            warn!("no text, could not load font {}: {}", path.display(), e);
            Screen::without_font()
        }),
        None => Screen::without_font(),
    };
    let store = FileStore::new(&settings.best_score_path);
    let mut game = Game::with_rng(settings.rules.clone(), store, StdRng::from_entropy());

    let event_loop = EventLoop::new();
    let mut input = WinitInputHelper::new();
    let window = {
        let size = LogicalSize::new(WIDTH as f64, HEIGHT as f64);
        WindowBuilder::new()
            .with_title("KOLOR")
            .with_inner_size(size)
            .with_min_inner_size(size)
            .build(&event_loop)
            .context("creating window")?
    };

    let mut pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        Pixels::new(WIDTH, HEIGHT, surface_texture).context("creating pixel buffer")?
    };

    let mut ticker = Ticker::new(settings.tick_interval(), Instant::now());
    let tick_seconds = ticker.period().as_secs_f64();

    event_loop.run(move |event, _, control_flow| {
        // Draw the current frame
        if let Event::RedrawRequested(_) = event {
            screen.draw(&game.view(), pixels.get_frame());
            if let Err(e) = pixels.render() {
                warn!("pixels.render() failed: {}", e);
                *control_flow = ControlFlow::Exit;
                return;
            }
        }

        // Handle input events
        if input.update(&event) {
            // Close events
            if input.key_pressed(VirtualKeyCode::Escape) || input.quit() {
                *control_flow = ControlFlow::Exit;
                return;
            }

            // Resize the window
            if let Some(size) = input.window_resized() {
                pixels.resize_surface(size.width, size.height);
            }

            if input.mouse_pressed(0) {
                let clicked = input
                    .mouse()
                    .and_then(|pos| pixels.window_pos_to_pixel(pos).ok())
                    .and_then(|(x, y)| Layout::option_at(x, y));
                if let Some(index) = clicked {
                    let color = game.round().options()[index];
                    game.submit_guess(color);
                }
            }

            // Run the clock and request a redraw
            for _ in 0..ticker.due(Instant::now()) {
                game.tick(tick_seconds);
            }
            window.request_redraw();
            *control_flow = ControlFlow::WaitUntil(ticker.deadline());
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_path_is_optional() {
        let args = Args::try_parse_from(["kolor"]).unwrap();
        assert_eq!(args.settings, None);
        let args = Args::try_parse_from(["kolor", "custom.ron"]).unwrap();
        assert_eq!(args.settings, Some(PathBuf::from("custom.ron")));
        assert!(Args::try_parse_from(["kolor", "a.ron", "b.ron"]).is_err());
    }

    #[test]
    fn explicit_missing_settings_is_an_error() {
        let path = std::env::temp_dir().join("kolor-no-such-settings.ron");
        let args = Args {
            settings: Some(path),
        };
        assert!(load_settings(&args).is_err());
    }
}
