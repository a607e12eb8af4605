//! Append-only CSV sink for perception snapshots.
//!
//! The file is opened lazily on the first write of a session and appended
//! to afterwards; the header is written only when the file is empty, so
//! one file carries exactly one header no matter how many sessions append
//! to it. Every tick batch is flushed synchronously: a crash loses at
//! most the in-flight tick. A failed open or write abandons the batch and
//! drops the handle so the next tick starts with a clean reopen.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::sampling::agent::{self, ARMOR_SLOTS, HOTBAR_SLOTS, MAIN_SLOTS};
use crate::sampling::snapshot::PerceptionSnapshot;

/// CSV sink with lazy open and per-batch flush.
pub struct CsvSink {
    path: PathBuf,
    writer: Option<BufWriter<std::fs::File>>,
}

/// Quotes a field when it embeds a delimiter or quote character.
///
/// Inner quotes are escaped by doubling, standard CSV style.
fn quote_field(value: &str) -> String {
    if value.contains([',', '"', ';', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Builds the fixed header row.
fn header() -> String {
    let mut columns = vec![
        "id".to_string(),
        "pos_x".to_string(),
        "pos_y".to_string(),
        "pos_z".to_string(),
        "gaze_x".to_string(),
        "gaze_y".to_string(),
        "gaze_z".to_string(),
        "health".to_string(),
        "food".to_string(),
        "oxygen".to_string(),
        "biome".to_string(),
        "outdoors".to_string(),
        "night".to_string(),
        "surface_highlighted".to_string(),
        "highlighted_surface".to_string(),
        "visible_surfaces".to_string(),
        "mob_visible".to_string(),
        "closest_mob".to_string(),
        "visible_mobs".to_string(),
    ];
    for i in 0..HOTBAR_SLOTS {
        columns.push(format!("hotbar_{i}"));
    }
    for i in 0..MAIN_SLOTS {
        columns.push(format!("inv_{i}"));
    }
    for i in 0..ARMOR_SLOTS {
        columns.push(format!("armor_{i}"));
    }
    columns.push("offhand".to_string());
    columns.join(",")
}

/// Serializes one snapshot as a CSV row.
pub fn format_row(snap: &PerceptionSnapshot) -> String {
    let mut fields = vec![
        quote_field(&snap.id),
        snap.pos.x.to_string(),
        snap.pos.y.to_string(),
        snap.pos.z.to_string(),
        snap.gaze.x.to_string(),
        snap.gaze.y.to_string(),
        snap.gaze.z.to_string(),
        snap.health.to_string(),
        snap.food.to_string(),
        snap.oxygen.map_or_else(|| "none".to_string(), |o| o.to_string()),
        quote_field(&snap.biome),
        (snap.outdoors as u8).to_string(),
        snap.night
            .map_or_else(|| "none".to_string(), |night| (night as u8).to_string()),
        (snap.surface_highlighted as u8).to_string(),
        quote_field(snap.highlighted_material.as_deref().unwrap_or("none")),
        quote_field(snap.surface_summary.as_deref().unwrap_or("none")),
        (snap.mob_visible as u8).to_string(),
        quote_field(&snap.closest_mob),
        quote_field(&snap.mob_summary),
    ];

    let empty = agent::Inventory::empty();
    let inventory = snap.inventory.as_ref().unwrap_or(&empty);
    let slots = inventory
        .hotbar
        .iter()
        .chain(inventory.main.iter())
        .chain(inventory.armor.iter())
        .chain(std::iter::once(&inventory.offhand));
    for slot in slots {
        fields.push(quote_field(&agent::format_slot(slot)));
    }

    fields.join(",")
}

impl CsvSink {
    /// Creates a sink writing to the given path. Nothing is opened until
    /// the first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: None,
        }
    }

    /// Returns the output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true while no file handle is held.
    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    fn open_writer(&mut self) -> std::io::Result<()> {
        if self.writer.is_some() {
            return Ok(());
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;
        let mut writer = BufWriter::new(file);
        if needs_header {
            writeln!(writer, "{}", header())?;
        }
        self.writer = Some(writer);
        Ok(())
    }

    /// Appends one tick's batch of snapshots and flushes.
    ///
    /// On failure the handle is dropped so the next call reopens the
    /// file from scratch; the failed batch is not retried.
    pub fn write_batch(&mut self, snapshots: &[PerceptionSnapshot]) -> std::io::Result<()> {
        let result = self.try_write_batch(snapshots);
        if result.is_err() {
            self.writer = None;
        }
        result
    }

    fn try_write_batch(&mut self, snapshots: &[PerceptionSnapshot]) -> std::io::Result<()> {
        self.open_writer()?;
        if let Some(writer) = self.writer.as_mut() {
            for snap in snapshots {
                writeln!(writer, "{}", format_row(snap))?;
            }
            writer.flush()?;
        }
        Ok(())
    }

    /// Flushes and closes the file. The next write reopens it.
    pub fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(err) = writer.flush() {
                log::error!("flush on close failed: {}", err);
            }
        }
    }
}

impl Drop for CsvSink {
    fn drop(&mut self) {
        self.close();
    }
}
