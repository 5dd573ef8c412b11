use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use image::RgbaImage;

use quickshot::config::QuickAccessStyle;
use quickshot::error::{Error, Result};
use quickshot::geometry::Point;
use quickshot::quick_access::thumbnail::Thumbnail;
use quickshot::quick_access::{AfterDismiss, Dispatch, QuickAccessController, QuickAction};
use quickshot::services::{Clipboard, Pinboard, Services, TextRecognizer, Workspace};
use quickshot::storage::CaptureStore;
use quickshot::storage::model::{CaptureItem, CaptureType};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Image(u32, u32),
    Text(String),
    Pin(String),
    Reveal(PathBuf),
    Delete(String),
}

type Log = Rc<RefCell<Vec<Call>>>;

struct Store {
    dir: PathBuf,
    log: Log,
}

impl CaptureStore for Store {
    fn base_dir(&self) -> PathBuf {
        self.dir.clone()
    }

    fn delete(&self, item: &CaptureItem) -> Result<()> {
        self.log.borrow_mut().push(Call::Delete(item.id.clone()));
        Ok(())
    }
}

struct Board {
    log: Log,
}

impl Clipboard for Board {
    fn set_image(&self, image: &RgbaImage) -> Result<()> {
        self.log.borrow_mut().push(Call::Image(image.width(), image.height()));
        Ok(())
    }

    fn set_text(&self, text: &str) -> Result<()> {
        self.log.borrow_mut().push(Call::Text(text.to_string()));
        Ok(())
    }
}

impl Pinboard for Board {
    fn pin(&self, _image: RgbaImage, title: &str) {
        self.log.borrow_mut().push(Call::Pin(title.to_string()));
    }
}

struct Desk {
    desktop: Option<PathBuf>,
    log: Log,
}

impl Workspace for Desk {
    fn desktop_dir(&self) -> Option<PathBuf> {
        self.desktop.clone()
    }

    fn reveal(&self, path: &Path) -> Result<()> {
        self.log.borrow_mut().push(Call::Reveal(path.to_path_buf()));
        Ok(())
    }
}

/// Blocks until the test releases it, then answers with the queued result.
struct GatedRecognizer {
    gate: Mutex<Receiver<Result<String>>>,
    started: AtomicUsize,
}

impl TextRecognizer for GatedRecognizer {
    fn recognize(&self, _bitmap: RgbaImage) -> Result<String> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap();
        gate.recv().unwrap_or_else(|_| Err(Error::Ocr("gate closed".into())))
    }
}

struct Fixture {
    dir: tempfile::TempDir,
    log: Log,
    release: Sender<Result<String>>,
    recognizer: Arc<GatedRecognizer>,
    services: Services,
}

impl Fixture {
    fn new() -> Self {
        Self::with_desktop(|root| {
            let desktop = root.join("Desktop");
            std::fs::create_dir(&desktop).unwrap();
            Some(desktop)
        })
    }

    /// `desktop` picks the desktop directory given the store directory.
    fn with_desktop(desktop: impl FnOnce(&Path) -> Option<PathBuf>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let desktop = desktop(dir.path());
        let log: Log = Rc::default();
        let (release, gate) = crossbeam_channel::unbounded();
        let board = Rc::new(Board { log: log.clone() });
        let recognizer = Arc::new(GatedRecognizer {
            gate: Mutex::new(gate),
            started: AtomicUsize::new(0),
        });
        let services = Services {
            store: Rc::new(Store { dir: dir.path().to_path_buf(), log: log.clone() }),
            clipboard: board.clone(),
            workspace: Rc::new(Desk { desktop, log: log.clone() }),
            pinboard: board,
            recognizer: recognizer.clone(),
        };
        Fixture { dir, log, release, recognizer, services }
    }

    fn stored_capture(&self) -> CaptureItem {
        let item = CaptureItem::new_screenshot("shot.png".into());
        RgbaImage::new(64, 48).save(self.dir.path().join(&item.filename)).unwrap();
        item
    }

    fn missing_capture(&self) -> CaptureItem {
        CaptureItem::new_screenshot("gone.png".into())
    }

    fn controller(&self, item: CaptureItem) -> QuickAccessController {
        QuickAccessController::new(item, self.services.clone(), &QuickAccessStyle::default())
    }

    fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }
}

fn poll_until_done(controller: &mut QuickAccessController) -> Dispatch {
    for _ in 0..500 {
        if let Some(dispatch) = controller.poll() {
            return dispatch;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("OCR never finished");
}

#[test]
fn copy_puts_image_on_clipboard_and_dismisses() {
    let fx = Fixture::new();
    let mut c = fx.controller(fx.stored_capture());
    assert_eq!(c.perform(QuickAction::Copy), Dispatch::Dismiss(AfterDismiss::Nothing));
    assert_eq!(fx.calls(), vec![Call::Image(64, 48)]);
}

#[test]
fn every_synchronous_action_dismisses_even_when_the_file_is_missing() {
    for action in QuickAction::ALL.into_iter().filter(|a| *a != QuickAction::Ocr) {
        let fx = Fixture::new();
        let mut c = fx.controller(fx.missing_capture());
        match c.perform(action) {
            Dispatch::Dismiss(_) => {}
            other => panic!("{action:?} returned {other:?}"),
        }
        assert!(c.is_dismissed());
    }
}

#[test]
fn copy_and_pin_are_silent_without_an_image() {
    let fx = Fixture::new();
    fx.controller(fx.missing_capture()).perform(QuickAction::Copy);
    fx.controller(fx.missing_capture()).perform(QuickAction::Pin);
    assert!(fx.calls().is_empty());
}

#[test]
fn save_copies_file_to_desktop() {
    let fx = Fixture::new();
    let item = fx.stored_capture();
    fx.controller(item.clone()).perform(QuickAction::Save);
    assert!(fx.dir.path().join("Desktop").join(&item.filename).exists());
}

#[test]
fn save_keeps_an_existing_desktop_file_and_picks_a_new_name() {
    let fx = Fixture::new();
    let item = fx.stored_capture();
    let desktop = fx.dir.path().join("Desktop");
    std::fs::write(desktop.join(&item.filename), b"someone else's file").unwrap();

    fx.controller(item.clone()).perform(QuickAction::Save);

    assert_eq!(std::fs::read(desktop.join(&item.filename)).unwrap(), b"someone else's file");
    let copy = image::open(desktop.join("shot (2).png")).unwrap();
    assert_eq!((copy.width(), copy.height()), (64, 48));
}

#[test]
fn save_when_captures_already_live_on_the_desktop_leaves_the_file_intact() {
    let fx = Fixture::with_desktop(|root| Some(root.to_path_buf()));
    let item = fx.stored_capture();
    let path = fx.dir.path().join(&item.filename);
    let before = std::fs::read(&path).unwrap();

    let mut c = fx.controller(item);
    assert_eq!(c.perform(QuickAction::Save), Dispatch::Dismiss(AfterDismiss::Nothing));

    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert!(image::open(&path).is_ok());
    assert!(!fx.dir.path().join("shot (2).png").exists());
}

#[test]
fn save_without_a_desktop_still_dismisses() {
    let fx = Fixture::with_desktop(|_| None);
    let item = fx.stored_capture();
    let mut c = fx.controller(item.clone());

    assert_eq!(c.perform(QuickAction::Save), Dispatch::Dismiss(AfterDismiss::Nothing));
    assert!(c.is_dismissed());
    assert!(fx.dir.path().join(&item.filename).exists());
    assert!(fx.calls().is_empty());
}

#[test]
fn annotate_asks_host_to_activate_after_teardown() {
    let fx = Fixture::new();
    let mut c = fx.controller(fx.stored_capture());
    assert_eq!(
        c.perform(QuickAction::Annotate),
        Dispatch::Dismiss(AfterDismiss::ActivateHost)
    );
    assert!(fx.calls().is_empty());
}

#[test]
fn pin_delete_and_reveal_reach_their_collaborators() {
    let fx = Fixture::new();
    let item = fx.stored_capture();

    fx.controller(item.clone()).perform(QuickAction::Pin);
    fx.controller(item.clone()).perform(QuickAction::Delete);
    fx.controller(item.clone()).perform(QuickAction::Reveal);

    assert_eq!(
        fx.calls(),
        vec![
            Call::Pin(item.filename.clone()),
            Call::Delete(item.id.clone()),
            Call::Reveal(fx.dir.path().join(&item.filename)),
        ]
    );
}

#[test]
fn ocr_dismisses_only_after_the_result_arrives() {
    let fx = Fixture::new();
    let mut c = fx.controller(fx.stored_capture());

    assert_eq!(c.perform(QuickAction::Ocr), Dispatch::Pending);
    assert!(!c.is_dismissed());
    assert!(c.status().is_some());
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(c.poll(), None);
    assert!(!c.is_dismissed());

    fx.release.send(Ok("hello world".into())).unwrap();
    assert_eq!(poll_until_done(&mut c), Dispatch::Dismiss(AfterDismiss::Nothing));
    assert!(c.is_dismissed());
    assert_eq!(fx.calls(), vec![Call::Text("hello world".into())]);
}

#[test]
fn ocr_failure_dismisses_without_touching_clipboard() {
    let fx = Fixture::new();
    let mut c = fx.controller(fx.stored_capture());

    assert_eq!(c.perform(QuickAction::Ocr), Dispatch::Pending);
    fx.release.send(Err(Error::Ocr("no text".into()))).unwrap();
    assert_eq!(poll_until_done(&mut c), Dispatch::Dismiss(AfterDismiss::Nothing));
    assert!(fx.calls().is_empty());
}

#[test]
fn ocr_without_an_image_dismisses_at_once() {
    let fx = Fixture::new();
    let mut c = fx.controller(fx.missing_capture());

    assert_eq!(c.perform(QuickAction::Ocr), Dispatch::Dismiss(AfterDismiss::Nothing));
    assert!(c.is_dismissed());
    assert!(!c.is_busy());
    assert_eq!(c.poll(), None);
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(fx.recognizer.started.load(Ordering::SeqCst), 0);
    assert!(fx.calls().is_empty());
}

#[test]
fn actions_while_ocr_runs_or_after_dismissal_are_ignored() {
    let fx = Fixture::new();
    let mut c = fx.controller(fx.stored_capture());

    c.perform(QuickAction::Ocr);
    assert_eq!(c.perform(QuickAction::Copy), Dispatch::Ignored);

    fx.release.send(Ok("text".into())).unwrap();
    poll_until_done(&mut c);
    assert_eq!(c.perform(QuickAction::Close), Dispatch::Ignored);
    assert_eq!(c.poll(), None);
}

#[test]
fn hover_and_click_follow_the_layout() {
    let fx = Fixture::new();
    let mut c = fx.controller(fx.stored_capture());
    let frame = c.layout().frame_of(QuickAction::Close).unwrap();
    let center = Point::new(frame.mid_x(), frame.mid_y());

    assert!(c.hover(Some(center)));
    assert_eq!(c.hovered(), Some(QuickAction::Close));
    assert!(!c.hover(Some(center)));
    assert!(c.hover(None));

    assert_eq!(c.click(Point::new(-10.0, -10.0)), Dispatch::Ignored);
    assert_eq!(c.click(center), Dispatch::Dismiss(AfterDismiss::Nothing));
}

#[test]
fn thumbnail_loads_once_or_falls_back_to_placeholder() {
    let fx = Fixture::new();
    let mut c = fx.controller(fx.stored_capture());
    assert!(c.thumbnail().is_none());
    assert!(matches!(c.appear(), Thumbnail::Image(_)));

    let mut missing = fx.controller(fx.missing_capture());
    assert_eq!(
        missing.appear(),
        &Thumbnail::Placeholder(CaptureType::Screenshot.placeholder_glyph())
    );
}
