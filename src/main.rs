//! emoji-overlay demo
//!
//! Drives an overlay from stdin commands and prints the rendered grid:
//!
//! - `o` show/hide the overlay
//! - `n` reveal the next category
//! - `<number>` tap the emoji at that index
//! - `t <x> <y>` tap a terminal cell
//! - `x` tap outside the grid
//! - `q` quit

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use emoji_overlay::dataset::prepare;
use emoji_overlay::paths;
use emoji_overlay::render::{overlay_lines, GridLayout, Rect};
use emoji_overlay::{Catalog, CategoryIndex, Overlay, OverlayView, PickerConfig, PickerProps};

/// Terminal area the demo lays the grid out in
const AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 40,
    height: 12,
};

/// Events from picker callbacks, printed by the main loop
enum HostEvent {
    Selected(String),
    TapOutside,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("emoji_overlay=info".parse()?),
        )
        .init();

    paths::log_paths();
    let config = PickerConfig::load(paths::config_path()).context("failed to load config")?;
    let platform = config.platform();
    info!(platform = platform.as_str(), "preparing emoji dataset");

    let index = match paths::catalog_path().or_else(|| config.catalog_path.clone()) {
        Some(path) => {
            let catalog = Catalog::load(&path)?;
            Arc::new(prepare(catalog.records(), platform))
        }
        None => CategoryIndex::shared(platform)?,
    };
    info!("{} emoji available", index.len());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let tx_outside = tx.clone();
    let props = PickerProps::new(move |emoji| {
        let _ = tx.send(HostEvent::Selected(emoji.to_string()));
    })
    .on_tap_outside(move || {
        let _ = tx_outside.send(HostEvent::TapOutside);
    })
    .with_config(&config);

    let style = props.resolved_style();
    let mut overlay = Overlay::new(props, index);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("q") => break,
            Some("o") => {
                overlay.toggle()?;
                if let Some(picker) = overlay.picker_mut() {
                    picker.ready().await;
                }
            }
            Some("n") => match overlay.picker_mut() {
                Some(picker) => {
                    if !picker.advance_category() {
                        println!("all categories revealed");
                    }
                }
                None => println!("overlay is hidden"),
            },
            Some("x") => {
                overlay.tap_outside();
            }
            Some("t") => {
                let coords: Vec<u16> = words.filter_map(|w| w.parse().ok()).collect();
                let view = overlay.render();
                match (coords.as_slice(), &view) {
                    ([x, y], OverlayView::Visible { picker }) => {
                        if let Some(layout) = GridLayout::for_view(AREA, picker, &style) {
                            let outcome = overlay.tap_at(&layout, *x, *y);
                            info!(?outcome, "tap at {},{}", x, y);
                        }
                    }
                    ([_, _], OverlayView::Hidden) => println!("overlay is hidden"),
                    _ => println!("usage: t <x> <y>"),
                }
            }
            Some(word) => match word.parse::<usize>() {
                Ok(n) => {
                    if let Err(e) = overlay.tap_emoji(n) {
                        warn!("tap ignored: {}", e);
                    }
                }
                Err(_) => println!("unknown command: {}", word),
            },
            None => {}
        }

        while let Ok(event) = rx.try_recv() {
            match event {
                HostEvent::Selected(emoji) => println!("selected {}", emoji),
                HostEvent::TapOutside => {
                    println!("dismissed");
                    overlay.set_visible(false)?;
                }
            }
        }

        for line in overlay_lines(&overlay.render(), &style, AREA) {
            println!("{}", line);
        }
    }

    Ok(())
}
