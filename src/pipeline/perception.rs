//! One detection tick: capture, locate icons, read numbers, reconcile.
//!
//! `Perception` owns everything that mutates per tick (anchors, region, the
//! reconciled state), so ticks never overlap. The runner moves it onto a
//! blocking thread for each tick and takes it back afterwards.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::capture::{CaptureProvider, Point, Raster};
use crate::config::AppConfig;
use crate::detection::{
    IconKey, IconTemplates, LockState, PairMatch, RegionLock, TickVerdict, find_pair,
    find_subimage,
};
use crate::error::CaptureError;
use crate::ocr::{FontSpec, GlyphReader, OcrBoxOffset};
use crate::stats::{LifeState, RawReadings, Reconciler, StatKind};

/// Tunables for the detection loop.
#[derive(Clone, Debug)]
pub struct PerceptionSettings {
    pub ocr_box: OcrBoxOffset,
    pub font: FontSpec,
    pub glyph_colors: Vec<[u8; 3]>,
    pub unlocked_poll: Duration,
    pub locked_poll: Duration,
    pub failure_threshold: u32,
}

impl From<&AppConfig> for PerceptionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            ocr_box: config.ocr_box,
            font: config.font.clone(),
            glyph_colors: config.glyph_colors.clone(),
            unlocked_poll: config.unlocked_poll(),
            locked_poll: config.locked_poll(),
            failure_threshold: config.failure_threshold,
        }
    }
}

/// What one tick produced.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub state: LifeState,
    pub ready: bool,
    pub lock_state: LockState,
    /// `None` when the tick was skipped because nothing could be captured.
    pub verdict: Option<TickVerdict>,
    pub capture_permitted: bool,
    pub parsed_fields: usize,
    pub next_poll: Duration,
}

pub struct Perception<C, R> {
    capture: C,
    reader: R,
    templates: IconTemplates,
    lock: RegionLock,
    reconciler: Reconciler,
    settings: PerceptionSettings,
    capture_permitted: bool,
}

impl<C: CaptureProvider, R: GlyphReader> Perception<C, R> {
    pub fn new(
        capture: C,
        reader: R,
        templates: IconTemplates,
        lock: RegionLock,
        settings: PerceptionSettings,
    ) -> Self {
        Self {
            capture,
            reader,
            templates,
            lock,
            reconciler: Reconciler::new(),
            settings,
            capture_permitted: true,
        }
    }

    pub fn state(&self) -> &LifeState {
        self.reconciler.state()
    }

    pub fn is_ready(&self) -> bool {
        self.reconciler.is_ready()
    }

    pub fn lock(&self) -> &RegionLock {
        &self.lock
    }

    pub fn tick(&mut self) -> TickReport {
        // Raster pixel (0, 0) sits here in window coordinates for this whole tick
        let origin = self.lock.capture_origin();
        let captured = match self.lock.capture_target() {
            Some(region) => self.capture.capture_region(region),
            None => self.capture.capture_full(),
        };

        let raster = match captured {
            Ok(raster) => {
                if !self.capture_permitted {
                    info!("Screen capture available again");
                }
                self.capture_permitted = true;
                raster
            }
            Err(CaptureError::PermissionDenied) => {
                if self.capture_permitted {
                    warn!("Screen capture permission not granted; detection paused");
                }
                self.capture_permitted = false;
                return self.report(None, 0);
            }
            Err(e) => {
                debug!("Capture failed, skipping tick: {}", e);
                return self.report(None, 0);
            }
        };

        let (adrenaline, prayer) = self.locate(&raster, origin);
        if self.lock.try_lock() {
            debug!("Switching to region capture");
        }

        let raw = RawReadings {
            hp: self.read(&raster, StatKind::Hp, origin),
            prayer: self.read(&raster, StatKind::Prayer, origin),
            summoning: self.read(&raster, StatKind::Summoning, origin),
            adrenaline: self.read(&raster, StatKind::Adrenaline, origin),
            adrenaline_active: adrenaline.primary_matched(),
            prayer_active: prayer.primary_matched(),
        };
        let outcome = self.reconciler.apply(&raw);
        let verdict = self.lock.record_tick(outcome.is_failed());
        if verdict == TickVerdict::Reset {
            info!("Region reset; rescanning the full window");
        }

        self.report(Some(verdict), outcome.parsed_fields)
    }

    /// Anchors icons not yet known and searches both icon pairs for this
    /// tick's active flags.
    fn locate(&mut self, raster: &Raster, origin: Point) -> (PairMatch, PairMatch) {
        for (kind, key) in [
            (StatKind::Hp, IconKey::Hp),
            (StatKind::Summoning, IconKey::Summoning),
        ] {
            if self.lock.anchors().get(kind).is_some() {
                continue;
            }
            if let Some(at) = find_subimage(raster, self.templates.get(key)).first() {
                self.lock.observe(kind, at.offset(origin));
            }
        }

        let adrenaline = find_pair(
            raster,
            self.templates.get(IconKey::AdrenalineOn),
            self.templates.get(IconKey::AdrenalineOff),
        );
        let prayer = find_pair(
            raster,
            self.templates.get(IconKey::PrayerOn),
            self.templates.get(IconKey::PrayerOff),
        );
        if let Some(at) = adrenaline.first() {
            self.lock.observe(StatKind::Adrenaline, at.offset(origin));
        }
        if let Some(at) = prayer.first() {
            self.lock.observe(StatKind::Prayer, at.offset(origin));
        }

        (adrenaline, prayer)
    }

    fn read(&self, raster: &Raster, kind: StatKind, origin: Point) -> String {
        let Some(anchor) = self.lock.anchors().get(kind) else {
            return String::new();
        };
        let rect = self.settings.ocr_box.box_for(anchor, origin);
        self.reader
            .read_line(raster, &self.settings.font, &self.settings.glyph_colors, rect)
            .text
    }

    fn report(&self, verdict: Option<TickVerdict>, parsed_fields: usize) -> TickReport {
        TickReport {
            state: self.reconciler.state().clone(),
            ready: self.reconciler.is_ready(),
            lock_state: self.lock.state(),
            verdict,
            capture_permitted: self.capture_permitted,
            parsed_fields,
            next_poll: self
                .lock
                .cadence(self.settings.unlocked_poll, self.settings.locked_poll),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Rect, crop_rect};
    use crate::detection::RegionMargins;
    use crate::ocr::OcrLine;
    use image::{ImageBuffer, Rgba};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    const HP: [u8; 4] = [255, 0, 0, 255];
    const ADRENALINE_ON: [u8; 4] = [0, 255, 0, 255];
    const ADRENALINE_OFF: [u8; 4] = [0, 128, 0, 255];
    const PRAYER_ON: [u8; 4] = [0, 0, 255, 255];
    const PRAYER_OFF: [u8; 4] = [0, 0, 128, 255];
    const SUMMONING: [u8; 4] = [255, 255, 0, 255];

    fn block(color: [u8; 4]) -> Raster {
        ImageBuffer::from_pixel(2, 2, Rgba(color))
    }

    fn templates() -> IconTemplates {
        IconTemplates {
            hp: block(HP),
            adrenaline_on: block(ADRENALINE_ON),
            adrenaline_off: block(ADRENALINE_OFF),
            prayer_on: block(PRAYER_ON),
            prayer_off: block(PRAYER_OFF),
            summoning: block(SUMMONING),
        }
    }

    /// 300x200 frame with the HP, prayer (lit), adrenaline (unlit) and summoning
    /// icons stacked at x = 20.
    fn frame() -> Raster {
        let mut img: Raster = ImageBuffer::from_pixel(300, 200, Rgba([0, 0, 0, 255]));
        for (y, color) in [(30, HP), (60, PRAYER_ON), (90, ADRENALINE_OFF), (120, SUMMONING)] {
            for dy in 0..2 {
                for dx in 0..2 {
                    img.put_pixel(20 + dx, y + dy, Rgba(color));
                }
            }
        }
        img
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Call {
        Full,
        Region(Rect),
    }

    #[derive(Clone, Default)]
    struct FakeCapture {
        calls: Arc<Mutex<Vec<Call>>>,
        denied: Arc<Mutex<bool>>,
    }

    impl FakeCapture {
        fn last_call(&self) -> Option<Call> {
            self.calls.lock().unwrap().last().copied()
        }
    }

    impl CaptureProvider for FakeCapture {
        fn capture_full(&mut self) -> Result<Raster, CaptureError> {
            if *self.denied.lock().unwrap() {
                return Err(CaptureError::PermissionDenied);
            }
            self.calls.lock().unwrap().push(Call::Full);
            Ok(frame())
        }

        fn capture_region(&mut self, rect: Rect) -> Result<Raster, CaptureError> {
            if *self.denied.lock().unwrap() {
                return Err(CaptureError::PermissionDenied);
            }
            self.calls.lock().unwrap().push(Call::Region(rect));
            Ok(crop_rect(&frame(), rect))
        }
    }

    /// Answers reads in order from a queue and records the boxes asked for.
    #[derive(Clone, Default)]
    struct ScriptedReader {
        answers: Arc<Mutex<VecDeque<String>>>,
        boxes: Arc<Mutex<Vec<Rect>>>,
    }

    impl ScriptedReader {
        fn script(&self, lines: &[&str]) {
            let mut answers = self.answers.lock().unwrap();
            answers.extend(lines.iter().map(|s| s.to_string()));
        }

        fn take_boxes(&self) -> Vec<Rect> {
            std::mem::take(&mut *self.boxes.lock().unwrap())
        }
    }

    impl GlyphReader for ScriptedReader {
        fn read_line(&self, _: &Raster, _: &FontSpec, _: &[[u8; 3]], rect: Rect) -> OcrLine {
            self.boxes.lock().unwrap().push(rect);
            OcrLine::new(self.answers.lock().unwrap().pop_front().unwrap_or_default())
        }
    }

    fn settings() -> PerceptionSettings {
        PerceptionSettings::from(&AppConfig::default())
    }

    fn perception() -> (
        Perception<FakeCapture, ScriptedReader>,
        FakeCapture,
        ScriptedReader,
    ) {
        let capture = FakeCapture::default();
        let reader = ScriptedReader::default();
        let perception = Perception::new(
            capture.clone(),
            reader.clone(),
            templates(),
            RegionLock::new(RegionMargins::default(), 4),
            settings(),
        );
        (perception, capture, reader)
    }

    // Reads happen in the order hp, prayer, summoning, adrenaline
    const GOOD: [&str; 4] = ["9,900/9,900", "990/990", "60/60", "35%"];

    #[test]
    fn test_first_tick_anchors_locks_and_reads() {
        let (mut perception, capture, reader) = perception();
        reader.script(&GOOD);

        let report = perception.tick();

        assert_eq!(capture.last_call(), Some(Call::Full));
        assert_eq!(report.lock_state, LockState::Locked);
        assert_eq!(perception.lock().region(), Some(Rect::new(5, 10, 185, 160)));
        assert!(report.ready);
        assert_eq!(report.parsed_fields, 7);
        assert_eq!(report.verdict, Some(TickVerdict::Healthy));
        assert_eq!(report.next_poll, Duration::from_millis(600));
        assert_eq!((report.state.hp, report.state.hp_max), (9900, 9900));
        assert_eq!(report.state.adrenaline, 35);
        assert_eq!(report.state.prayer_active, Some(true));
        assert_eq!(report.state.adrenaline_active, Some(false));

        // Full-window boxes: anchor + (22, -5)
        assert_eq!(reader.take_boxes()[0], Rect::new(42, 25, 100, 25));
    }

    #[test]
    fn test_locked_tick_captures_region() {
        let (mut perception, capture, reader) = perception();
        reader.script(&GOOD);
        perception.tick();
        reader.take_boxes();

        reader.script(&["9,000/9,900", "", "", ""]);
        let report = perception.tick();

        let region = Rect::new(5, 10, 185, 160);
        assert_eq!(capture.last_call(), Some(Call::Region(region)));
        // Boxes are relative to the region's origin
        assert_eq!(reader.take_boxes()[0], Rect::new(37, 15, 100, 25));
        assert_eq!(report.state.hp, 9000);
        assert_eq!(report.state.prayer, 990, "unparsed fields keep their value");
    }

    #[test]
    fn test_four_blank_ticks_reset_to_full_window() {
        let (mut perception, capture, reader) = perception();
        reader.script(&GOOD);
        perception.tick();

        let verdicts: Vec<_> = (0..4).map(|_| perception.tick().verdict).collect();
        assert_eq!(
            verdicts,
            vec![
                Some(TickVerdict::Failed { consecutive: 1 }),
                Some(TickVerdict::Failed { consecutive: 2 }),
                Some(TickVerdict::Failed { consecutive: 3 }),
                Some(TickVerdict::Reset),
            ]
        );
        assert_eq!(perception.lock().region(), None);
        assert!(perception.lock().anchors().is_empty());
        assert_eq!(perception.state().hp, 9900, "last good values survive a reset");

        let fifth = perception.tick();
        assert_eq!(capture.last_call(), Some(Call::Full));
        assert_eq!(fifth.next_poll, Duration::from_millis(600), "re-anchored and locked");
    }

    #[test]
    fn test_permission_denied_skips_tick() {
        let (mut perception, capture, _) = perception();
        *capture.denied.lock().unwrap() = true;

        let report = perception.tick();
        assert!(!report.capture_permitted);
        assert_eq!(report.verdict, None);
        assert_eq!(report.lock_state, LockState::Unlocked);
        assert_eq!(report.next_poll, Duration::from_millis(1000));

        *capture.denied.lock().unwrap() = false;
        assert!(perception.tick().capture_permitted);
    }

    #[test]
    fn test_no_icons_reads_nothing() {
        let capture = FakeCapture::default();
        let reader = ScriptedReader::default();
        let mut blank = templates();
        blank.hp = block([1, 2, 3, 255]);
        blank.prayer_on = block([1, 2, 4, 255]);
        blank.prayer_off = block([1, 2, 5, 255]);
        blank.adrenaline_on = block([1, 2, 6, 255]);
        blank.adrenaline_off = block([1, 2, 7, 255]);
        blank.summoning = block([1, 2, 8, 255]);
        let mut perception = Perception::new(
            capture,
            reader.clone(),
            blank,
            RegionLock::new(RegionMargins::default(), 4),
            settings(),
        );

        let report = perception.tick();
        assert_eq!(report.lock_state, LockState::Unlocked);
        assert!(reader.take_boxes().is_empty());
        assert!(!report.ready);
        assert_eq!(report.state.prayer_active, Some(false));
    }
}
