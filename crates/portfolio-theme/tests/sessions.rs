//! End-to-end sessions against a file-backed store.
//!
//! Each mount models one page load; the JSON file plays the role of the
//! browser's origin storage and survives between them.

use std::cell::Cell;
use std::fs;

use portfolio_theme::{
    render_stylesheet, DocumentRoot, FileStore, ManualPreference, OsPreference, ResolvedFrom,
    ThemeController, ThemeMode, ThemeToggle, DARK, DEFAULT_STORAGE_KEY,
};

#[test]
fn choice_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let first = ThemeController::builder()
        .store(FileStore::new(&path))
        .system(ManualPreference::new(Some(false)))
        .mount();
    assert_eq!(first.mode(), ThemeMode::Light);
    assert_eq!(first.resolved_from(), ResolvedFrom::System);
    first.toggle();
    first.unmount();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains(r#""portfolio-theme": "dark""#));

    let second = ThemeController::builder()
        .store(FileStore::new(&path))
        .system(ManualPreference::new(Some(false)))
        .default_mode(ThemeMode::Light)
        .mount();
    assert_eq!(second.mode(), ThemeMode::Dark);
    assert_eq!(second.resolved_from(), ResolvedFrom::Stored);
}

#[test]
fn corrupt_storage_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    fs::write(&path, "{ definitely not json").unwrap();

    let controller = ThemeController::builder()
        .store(FileStore::new(&path))
        .system(ManualPreference::new(Some(true)))
        .mount();
    assert_eq!(controller.mode(), ThemeMode::Dark);

    // Writes fail against the corrupt file; the session keeps working.
    controller.toggle();
    assert_eq!(controller.mode(), ThemeMode::Light);
    assert!(controller.handle().has_explicit_choice());
}

#[test]
fn system_changes_follow_os_until_user_chooses() {
    thread_local! {
        static OS_DARK: Cell<bool> = const { Cell::new(false) };
    }
    fn detector() -> Option<bool> {
        Some(OS_DARK.with(|d| d.get()))
    }

    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("storage.json"));
    let os = OsPreference::with_detector(detector);
    let root = DocumentRoot::new();

    let controller = ThemeController::builder()
        .store(store.clone())
        .system(os.clone())
        .sink(root.clone())
        .mount();
    let theme = controller.handle();
    assert_eq!(theme.mode(), ThemeMode::Light);

    OS_DARK.with(|d| d.set(true));
    assert!(os.poll());
    assert_eq!(theme.mode(), ThemeMode::Dark);
    assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));

    ThemeToggle::new().activate(&theme);
    assert_eq!(theme.mode(), ThemeMode::Light);

    OS_DARK.with(|d| d.set(false));
    os.poll();
    OS_DARK.with(|d| d.set(true));
    os.poll();
    assert_eq!(theme.mode(), ThemeMode::Light);

    use portfolio_theme::PreferenceStore;
    assert_eq!(
        store.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
        Some("light")
    );
}

#[test]
fn framework_and_global_exports_agree() {
    let root = DocumentRoot::new();
    let controller = ThemeController::builder()
        .sink(root.clone())
        .default_mode(ThemeMode::Dark)
        .mount();
    let snapshot = controller.handle().snapshot();

    assert_eq!(snapshot.tokens, &DARK);
    for (name, value) in snapshot.tokens.css_variables() {
        assert_eq!(root.variable(&name).as_deref(), Some(value));
    }

    let css = render_stylesheet(snapshot.mode).unwrap();
    for (name, value) in snapshot.tokens.css_variables() {
        assert!(css.contains(&format!("{}: {};", name, value)));
    }
}
