//! Typewriter Demo: reveals a static string inside an auto-sizing
//! disclosure.
//!
//! The reveal driver types the sample text out chunk by chunk; the host
//! measures the revealed prefix after every snapshot and the disclosure's
//! animated extent follows the growing measure. When the reveal completes
//! the panel is collapsed to show the eased close transition.
//!
//! Run with: `cargo run --example typewriter_demo`

#![allow(clippy::cast_precision_loss)]

use crossbeam_channel::unbounded;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use unfurl::{
    measure, ChangeFlags, Disclosure, DisclosureConfig, MeasuredRegion, RevealDriver, RevealMode,
    RevealOptions, TextSource,
};

/// Sample text to reveal (simulating pre-written marketing copy).
const SAMPLE_TEXT: &str = "Unfurl reveals text the way a person would read it being written: \
a fixed-interval clock advances the visible prefix a few characters at a time, \
while the disclosure container underneath grows smoothly to fit whatever has \
appeared so far.\n\nNothing here is rendered ahead of time. The extent figure \
below is the animated value a host would apply to its clipped region.";

fn main() -> io::Result<()> {
    println!("Unfurl Typewriter Demo");
    println!("======================\n");

    let source = TextSource::text(SAMPLE_TEXT);
    let options = RevealOptions {
        mode: RevealMode::Typewriter,
        speed: 50,
        chunk_size: 2,
        ..RevealOptions::default()
    };

    let region = MeasuredRegion::new();
    let mut panel = Disclosure::new(DisclosureConfig::default());
    panel.attach(&region);

    let (snap_tx, snap_rx) = unbounded();
    let driver = RevealDriver::spawn(
        source,
        options,
        move |snapshot| {
            let _ = snap_tx.send(snapshot);
        },
        || {},
    );

    let (cols, _) = crossterm::terminal::size().unwrap_or((80, 24));
    let wrap = cols.clamp(20, 72);

    let mut stdout = io::stdout();
    execute!(stdout, cursor::SavePosition)?;

    while let Ok(snapshot) = snap_rx.recv() {
        region.set_size(measure::text_rows(&snapshot.text, wrap) as f32);

        execute!(stdout, cursor::RestorePosition, Clear(ClearType::FromCursorDown))?;
        writeln!(stdout, "{}", snapshot.text)?;
        writeln!(
            stdout,
            "\n[extent {:>5.2} rows -> target {:>2.0}]",
            panel.visible_extent(),
            panel.extent_target(),
        )?;
        stdout.flush()?;

        if snapshot.flags.contains(ChangeFlags::COMPLETED) {
            break;
        }
    }
    driver.join();

    // Collapse the panel and watch the eased extent settle back to zero.
    writeln!(stdout, "\nReveal complete. Collapsing...")?;
    panel.set_open(false);
    loop {
        let now = Instant::now();
        write!(stdout, "\r[extent {:>5.2} rows]", panel.visible_extent_at(now))?;
        stdout.flush()?;
        if panel.is_settled_at(now) {
            break;
        }
        std::thread::sleep(Duration::from_millis(30));
    }
    writeln!(stdout, "\nDone.")?;

    Ok(())
}
