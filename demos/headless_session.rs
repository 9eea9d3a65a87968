//! Headless session: Drive a full init/flush/poll/close cycle without a
//! display.
//!
//! A worker thread swaps the tile manager and changes the scale through a
//! `DriverHandle` while the owning thread renders frames and forwards
//! input messages.
//!
//! Run with `RUST_LOG=tilewin=debug cargo run --example headless_session`
//! to see the driver's own logging.

use crossbeam_channel::unbounded;
use std::sync::Arc;
use std::thread;
use tilewin::{
    cancellation, Cell, Driver, DriverConfig, Frame, HeadlessBackend, KeyMod, Keycode, Msg, NativeButton, NativeEvent,
    Point, Rgb, SolidTiles, WindowEvent,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn scene(width: i32, height: i32, player: Point) -> Frame {
    Frame::filled(width, height, |p| {
        if p == player {
            Cell::new('@').with_fg(Rgb::new(255, 220, 0))
        } else if p.x == 0 || p.y == 0 || p.x == width - 1 || p.y == height - 1 {
            Cell::new('#').with_fg(Rgb::from_u32(0x00_80_80))
        } else {
            Cell::new('.').with_fg(Rgb::new(90, 90, 90))
        }
    })
}

fn main() -> tilewin::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DriverConfig {
        window_title: "headless session".into(),
        ..DriverConfig::with_tiles(Arc::new(SolidTiles::new(16, 16)))
    };
    let mut driver = Driver::new(HeadlessBackend::new(), config);
    driver.init()?;

    let mut player = Point::new(10, 10);
    driver.flush(&scene(80, 24, player));
    info!(textures = driver.cached_textures(), "first frame drawn");

    let handle = driver.handle();
    thread::spawn(move || {
        handle.set_tile_manager(Arc::new(SolidTiles::new(8, 12)));
        handle.set_scale(2.0, 2.0);
        handle.set_window_title("headless session (rescaled)");
    })
    .join()
    .expect("worker thread panicked");

    driver.flush(&scene(80, 24, player));
    if let Some(window) = driver.backend().window() {
        info!(width = window.width, height = window.height, title = %window.title, "window reconfigured");
    }

    driver.backend_mut().push_events([
        NativeEvent::key_down(Keycode::Right, KeyMod::empty()),
        NativeEvent::text("x"),
        NativeEvent::button_down(NativeButton::Left, 100, 100),
        NativeEvent::button_up(NativeButton::Left, 100, 100),
        NativeEvent::Window(WindowEvent::Exposed),
        NativeEvent::Quit,
    ]);

    let (canceller, token) = cancellation();
    let (tx, rx) = unbounded();
    let consumer = thread::spawn(move || {
        let mut moves = 0;
        for msg in rx.iter() {
            info!(?msg, "message");
            match msg {
                Msg::KeyDown { .. } => moves += 1,
                Msg::Quit(_) => break,
                _ => {}
            }
        }
        canceller.cancel();
        moves
    });
    driver.poll_msgs(&token, &tx)?;
    let moves = consumer.join().expect("consumer thread panicked");

    player.x += moves;
    driver.flush(&scene(80, 24, player));
    info!(player = ?player, textures = driver.cached_textures(), "final frame drawn");

    driver.close();
    Ok(())
}
