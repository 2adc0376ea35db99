/// Card image lifecycle and sector I/O

use super::{CardManager, OpenImage};
use crate::error::{CardError, FatalSink, Result};
use crate::format::constants::*;
use crate::format::path::{card_dir, legacy_boot_card_path};
use crate::format::template::gen_sector;
use crate::io::{FileHandle, OpenMode};
use crate::selection::CardMode;
use std::time::{Duration, Instant};

/// Outcome of opening a card image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenReport {
    /// Storage path of the image
    pub path: String,
    /// Was the image created by this open?
    pub created: bool,
    /// Time spent creating or loading the image
    pub elapsed: Duration,
}

impl OpenReport {
    /// Transfer rate in kB/s over the whole image
    pub fn throughput_kbps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            CARD_SIZE as f64 / secs / 1024.0
        } else {
            f64::INFINITY
        }
    }
}

impl CardManager {
    /// Open the selected card image, creating it if it does not exist
    ///
    /// Any previously open image is closed first. Directory setup, image
    /// creation and image loading failures are fatal.
    pub fn open(&mut self) -> Result<OpenReport> {
        self.close()?;
        self.ensure_dirs()?;

        let path = self.resolve_path();
        tracing::info!("Switching to card path = {}", path);

        let start = Instant::now();
        let created = !self.storage.exists(&path);
        let handle = if created {
            self.create_image(&path)?
        } else {
            self.load_image(&path)?
        };
        let report = OpenReport {
            path: path.clone(),
            created,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            "{} {} in {:.2} s ({:.2} kB/s)",
            if created { "Created" } else { "Loaded" },
            path,
            report.elapsed.as_secs_f64(),
            report.throughput_kbps()
        );

        self.image = Some(OpenImage { handle, path });
        self.persist_selection();
        self.needs_update = false;
        Ok(report)
    }

    /// Open the selected card image, handing fatal errors to `sink`
    ///
    /// Recoverable errors are still returned to the caller.
    pub fn open_or_fatal(&mut self, sink: &mut dyn FatalSink) -> Result<OpenReport> {
        match self.open() {
            Err(e) if e.is_fatal() => sink.fatal(&e),
            other => other,
        }
    }

    /// Read one sector of the open image
    pub fn read_sector(&mut self, sector: usize, buf: &mut [u8; SECTOR_SIZE]) -> Result<()> {
        let handle = self.sector_handle(sector)?;

        let count = self.storage.read(handle, buf)?;
        if count != SECTOR_SIZE {
            return Err(CardError::ShortRead {
                sector,
                expected: SECTOR_SIZE,
                actual: count,
            });
        }
        Ok(())
    }

    /// Write one sector of the open image
    pub fn write_sector(&mut self, sector: usize, buf: &[u8; SECTOR_SIZE]) -> Result<()> {
        let handle = self.sector_handle(sector)?;

        let count = self.storage.write(handle, buf)?;
        if count != SECTOR_SIZE {
            return Err(CardError::ShortWrite {
                sector,
                expected: SECTOR_SIZE,
                actual: count,
            });
        }
        Ok(())
    }

    /// Flush pending writes of the open image; the image stays open
    pub fn flush(&mut self) -> Result<()> {
        match &self.image {
            Some(image) => self.storage.flush(image.handle),
            None => Ok(()),
        }
    }

    /// Flush and close the open image; does nothing if none is open
    pub fn close(&mut self) -> Result<()> {
        let image = match self.image.take() {
            Some(image) => image,
            None => return Ok(()),
        };

        let flushed = self.storage.flush(image.handle);
        let closed = self.storage.close(image.handle);
        tracing::debug!("Closed {}", image.path);
        flushed.and(closed)
    }

    /// Image path for the current selection, honoring the legacy boot card
    pub fn resolve_path(&self) -> String {
        let path = self.selection.image_path();

        if self.selection.card() == CardMode::Boot && self.selection.channel() == CHAN_MIN {
            // Boot cards without channels lived at BOOT/BootCard.mcd
            if !self.storage.exists(&path) {
                let legacy = legacy_boot_card_path();
                if self.storage.exists(&legacy) {
                    return legacy;
                }
            }
        }

        path
    }

    fn sector_handle(&mut self, sector: usize) -> Result<FileHandle> {
        let handle = self.image.as_ref().ok_or(CardError::NotOpen)?.handle;

        if sector >= SECTOR_COUNT {
            return Err(CardError::InvalidSector {
                sector,
                max: SECTOR_COUNT - 1,
            });
        }

        let offset = sector_offset(sector);
        self.storage
            .seek(handle, offset)
            .map_err(|_| CardError::Seek { sector, offset })?;
        Ok(handle)
    }

    fn ensure_dirs(&mut self) -> Result<()> {
        let folder_dir = card_dir(self.selection.folder_name());
        let dirs = [MEMORY_CARDS_DIR, PS1_CARDS_DIR, folder_dir.as_str()];

        for dir in dirs {
            if let Err(e) = self.storage.mkdir(dir) {
                tracing::debug!("mkdir {} failed: {}", dir, e);
            }
        }

        if dirs.iter().all(|dir| self.storage.exists(dir)) {
            Ok(())
        } else {
            Err(CardError::fatal("error creating directories"))
        }
    }

    fn create_image(&mut self, path: &str) -> Result<FileHandle> {
        let handle = self
            .storage
            .open(path, OpenMode::Create)
            .map_err(|e| CardError::fatal(format!("cannot open for creating new card: {}", e)))?;

        tracing::info!("Creating new image at {}", path);

        let mut buf = [0u8; SECTOR_SIZE];
        for sector in 0..SECTOR_COUNT {
            gen_sector(sector, &mut buf);

            if let Some(mirror) = self.mirror.as_mut() {
                mirror.write_async(sector * SECTOR_SIZE, &buf);
            }
            let written = self.storage.write(handle, &buf);
            // The staging buffer is regenerated next iteration
            if let Some(mirror) = self.mirror.as_mut() {
                mirror.wait();
            }

            if !matches!(written, Ok(SECTOR_SIZE)) {
                self.abandon(handle);
                return Err(CardError::fatal("cannot init memcard"));
            }
        }

        if let Err(e) = self.storage.flush(handle) {
            self.abandon(handle);
            return Err(CardError::fatal(format!("cannot flush new card: {}", e)));
        }

        self.notify_changed();
        Ok(handle)
    }

    fn load_image(&mut self, path: &str) -> Result<FileHandle> {
        let handle = self
            .storage
            .open(path, OpenMode::Existing)
            .map_err(|e| CardError::fatal(format!("cannot open card: {}", e)))?;

        if self.mirror.is_some() {
            tracing::info!("Reading card {} into fast memory", path);

            let mut buf = [0u8; SECTOR_SIZE];
            for sector in 0..SECTOR_COUNT {
                if !matches!(self.storage.read(handle, &mut buf), Ok(SECTOR_SIZE)) {
                    self.abandon(handle);
                    return Err(CardError::fatal("cannot read memcard"));
                }

                if let Some(mirror) = self.mirror.as_mut() {
                    mirror.write_async(sector * SECTOR_SIZE, &buf);
                    mirror.wait();
                }
            }
        }

        // A different image is now active even without a mirror
        self.notify_changed();
        Ok(handle)
    }

    fn abandon(&mut self, handle: FileHandle) {
        if let Err(e) = self.storage.close(handle) {
            tracing::warn!("Failed to release card image handle: {}", e);
        }
    }

    fn persist_selection(&mut self) {
        let channel = self.selection.channel();
        match self.selection.card() {
            CardMode::Boot => self.settings.set_boot_channel(channel),
            CardMode::Normal { index } => {
                self.settings.set_card_index(index);
                self.settings.set_card_channel(channel);
            }
            CardMode::Named { .. } | CardMode::GameId => {}
        }
    }
}
