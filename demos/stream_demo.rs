//! Stream Demo: fade-mode reveal of a simulated token stream.
//!
//! A producer thread delivers word fragments at its own pace, the way an
//! agent backend streams tokens; the reveal driver surfaces one segment at
//! a time on its own cadence. Midway through, the disclosure is toggled
//! closed and reopened to show that reveal progress is preserved while
//! only the visible extent collapses.
//!
//! Run with: `cargo run --example stream_demo`

#![allow(clippy::cast_precision_loss)]

use crossbeam_channel::unbounded;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use unfurl::{
    measure, ChangeFlags, Disclosure, DisclosureConfig, MeasuredRegion, RevealDriver, RevealMode,
    RevealOptions, TextSource,
};

/// Fragments delivered by the simulated backend, one send each.
const FRAGMENTS: &[&str] = &[
    "Analyzing ",
    "the request... ",
    "breaking it ",
    "into steps. ",
    "Each fragment ",
    "you see ",
    "arrived as ",
    "one delivery ",
    "and fades in ",
    "as one segment.",
];

fn main() -> io::Result<()> {
    println!("Unfurl Stream Demo");
    println!("==================\n");

    let (sender, source) = TextSource::stream();
    let options = RevealOptions {
        mode: RevealMode::Fade,
        segment_delay: Duration::from_millis(150),
        fade_duration: Duration::from_millis(250),
        ..RevealOptions::default()
    };

    // Simulated backend: fragments arrive slower than the reveal cadence,
    // so the session spends part of its time waiting on arrivals.
    let producer = thread::spawn(move || {
        for fragment in FRAGMENTS {
            if !sender.send(*fragment) {
                return;
            }
            thread::sleep(Duration::from_millis(220));
        }
        sender.finish();
    });

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

    let mut toggled = false;
    while let Ok(snapshot) = snap_rx.recv() {
        region.set_size(measure::text_rows(&snapshot.text, wrap) as f32);

        // Close the panel midway through the stream. Reveal keeps going:
        // only the visible extent collapses.
        if !toggled && snapshot.revealed_segments >= 4 {
            panel.set_open(false);
            toggled = true;
        }
        if toggled && !panel.is_open() && snapshot.revealed_segments >= 7 {
            panel.set_open(true);
        }

        execute!(stdout, cursor::RestorePosition, Clear(ClearType::FromCursorDown))?;
        writeln!(stdout, "{}", snapshot.text)?;
        writeln!(
            stdout,
            "\n[{} segments | panel {} | extent {:>5.2} -> {:>2.0}]",
            snapshot.revealed_segments,
            if panel.is_open() { "open" } else { "closed" },
            panel.visible_extent(),
            panel.extent_target(),
        )?;
        stdout.flush()?;

        if snapshot.flags.contains(ChangeFlags::COMPLETED) {
            break;
        }
    }

    driver.join();
    let _ = producer.join();

    writeln!(
        stdout,
        "\nStream complete: every fragment was revealed, in order, despite the mid-stream toggle."
    )?;

    Ok(())
}
