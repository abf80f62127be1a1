//! Terminal rendering of the boot view model.
//!
//! The progress line is redrawn in place; the fallback screens are plain
//! blocks of text. Writes go to stdout and are best-effort: a closed pipe
//! must not bring the boot down.

use std::io::Write;

use splash_core::{BootViewModel, Phase};
use splash_engine::InjectedDocument;

use super::constants::{AUTO_RECOVERY_HINT, BAR_EMPTY, BAR_FILLED, BAR_WIDTH, RETRY_HINT};

pub fn render(view: &BootViewModel) {
    match &view.phase {
        Phase::Init => {}
        Phase::Fetching | Phase::Injecting => {
            draw_progress(view.percent);
        }
        Phase::Done => {
            println!();
            println!("Loaded.");
        }
        Phase::Offline | Phase::Failed(_) => {
            println!();
            println!();
            if let Some(message) = &view.message {
                println!("{message}");
            }
            if view.auto_recovery {
                println!("{AUTO_RECOVERY_HINT}");
            }
            if view.retry_available {
                println!("{RETRY_HINT}");
            }
        }
    }

    if let Some(notice) = view.notice {
        println!();
        println!("[{notice}]");
    }
    let _ = std::io::stdout().flush();
}

fn draw_progress(percent: u8) {
    let filled = (percent as usize * BAR_WIDTH) / 100;
    let mut bar = String::with_capacity(BAR_WIDTH);
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { BAR_FILLED } else { BAR_EMPTY });
    }
    print!("\rLoading [{bar}] {percent:>3}%");
    let _ = std::io::stdout().flush();
}

/// The host-side "document swap": reports what was assembled. The markup
/// itself lives in the [`InjectedDocument`] the caller holds.
pub fn apply_document(doc: &InjectedDocument) {
    println!();
    println!("Document ready ({} bytes of markup).", doc.html.len());
    if let Some(base) = &doc.base_href {
        println!("Relative assets resolve against {base}");
    }
    if !doc.external_scripts.is_empty() {
        println!(
            "External scripts queued in order: {}",
            doc.external_scripts.join(", ")
        );
    }
    if !doc.inline_scripts.is_empty() {
        println!(
            "{} inline script(s) handed to the host sink.",
            doc.inline_scripts.len()
        );
    }
}

pub fn navigate(url: &str) {
    println!();
    println!("Falling back to direct navigation: {url}");
}
