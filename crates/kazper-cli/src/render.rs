//! SessionSnapshot -> 端末表示

use std::fmt::Write;

use kazper_core::app::SessionSnapshot;
use kazper_core::domain::DeckPhase;
use kazper_core::{Bucket, EntityId, Locale};

/// The pick listed as `number` (1-based): rejected names first, then kept.
pub fn pick_at(snapshot: &SessionSnapshot, number: usize) -> Option<(EntityId, Bucket)> {
    let rejected = snapshot
        .rejected
        .iter()
        .map(|entity| (entity.id().clone(), Bucket::Rejected));
    let kept = snapshot
        .kept
        .iter()
        .map(|entity| (entity.id().clone(), Bucket::Kept));
    rejected.chain(kept).nth(number.checked_sub(1)?)
}

fn locale_label(locale: Locale) -> String {
    locale.as_str().to_uppercase()
}

fn card(snapshot: &SessionSnapshot, out: &mut String) -> std::fmt::Result {
    match snapshot.phase {
        DeckPhase::Loading => {
            writeln!(out, "[Loading] Loading names...")?;
            writeln!(out, "  Please wait while the CSV file is parsed.")
        }
        DeckPhase::Error => {
            writeln!(out, "[Error] Data unavailable")?;
            if let Some(error) = &snapshot.error {
                writeln!(out, "  {error}")?;
            }
            writeln!(out, "  Type `retry` to load again.")
        }
        DeckPhase::Empty => {
            writeln!(out, "[Empty] No names match these filters")?;
            writeln!(out, "  Try changing gender or locale.")
        }
        DeckPhase::Complete => {
            writeln!(out, "[Done] Deck complete")?;
            writeln!(
                out,
                "  You reviewed {} names with current filters. Type `restart` for another pass.",
                snapshot.progress.total
            )
        }
        DeckPhase::Active => {
            let Some(current) = &snapshot.current else {
                return Ok(());
            };
            let entity = &current.entity;
            writeln!(
                out,
                "[{} | {}] {}",
                entity.gender().code(),
                locale_label(snapshot.locale),
                current.display_name
            )?;
            writeln!(out, "  KK: {} | RU: {} | EN: {}", entity.kk(), entity.ru(), entity.en())?;
            writeln!(out, "  {} names remaining in this deck.", snapshot.remaining)
        }
    }
}

fn lists(snapshot: &SessionSnapshot, out: &mut String) -> std::fmt::Result {
    let mut number = 0;
    for (title, entities) in [("Rejected", &snapshot.rejected), ("Kept", &snapshot.kept)] {
        writeln!(out, "{title} ({}):", entities.len())?;
        if entities.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for entity in entities.iter() {
            number += 1;
            writeln!(
                out,
                "  {number:>3}. {} [{}]",
                entity.display(snapshot.locale),
                entity.gender().code()
            )?;
        }
    }
    Ok(())
}

fn write_frame(snapshot: &SessionSnapshot, out: &mut String) -> std::fmt::Result {
    writeln!(
        out,
        "== {} | locale {} | gender {} ==",
        snapshot.progress,
        locale_label(snapshot.locale),
        snapshot.gender_mode.as_str()
    )?;
    if snapshot.invalid_rows > 0 {
        writeln!(
            out,
            "! Skipped {} malformed row(s) while loading.",
            snapshot.invalid_rows
        )?;
    }
    card(snapshot, out)?;
    lists(snapshot, out)
}

/// One full screen for `snapshot`.
pub fn frame(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_frame(snapshot, &mut out);
    out
}
