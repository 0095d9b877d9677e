use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use floatdom::{Document, Event, Key, Modifiers, Viewport};
use tabula::keybinds::{
    HandlerId, KeyCombo, Keybinds, Platform, mount_focus_search, mount_keybinds,
};

fn document() -> Document {
    Document::new(Viewport::new(80, 24))
}

// ============================================================================
// Platform
// ============================================================================

#[test]
fn test_sniff_apple_platforms() {
    for platform in ["MacIntel", "iPhone", "iPad", "macos", "ios", "Darwin"] {
        assert_eq!(Platform::sniff(platform), Platform::Apple, "{platform}");
    }
}

#[test]
fn test_sniff_other_platforms() {
    for platform in ["Win32", "Linux x86_64", "linux", "windows", ""] {
        assert_eq!(Platform::sniff(platform), Platform::Other, "{platform}");
    }
}

#[test]
fn test_primary_modifier() {
    assert_eq!(Platform::Apple.primary_modifier(), Modifiers::meta());
    assert_eq!(Platform::Other.primary_modifier(), Modifiers::ctrl());
}

// ============================================================================
// Key combos
// ============================================================================

#[test]
fn test_focus_search_combo() {
    let apple = KeyCombo::focus_search(Platform::Apple);
    assert!(apple.matches(Key::Char('k'), Modifiers::meta()));
    assert!(!apple.matches(Key::Char('k'), Modifiers::ctrl()));
    assert_eq!(apple.label(Platform::Apple), "⌘K");

    let other = KeyCombo::focus_search(Platform::Other);
    assert!(other.matches(Key::Char('K'), Modifiers::ctrl()));
    assert!(!other.matches(Key::Char('k'), Modifiers::NONE));
    assert_eq!(other.label(Platform::Other), "Ctrl+K");
}

#[test]
fn test_modifiers_must_match_exactly() {
    let combo = KeyCombo::key(Key::Char('p')).ctrl();
    let ctrl_shift = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };
    assert!(!combo.matches(Key::Char('p'), ctrl_shift));
    assert!(combo.shift().matches(Key::Char('p'), ctrl_shift));
}

#[test]
fn test_label_for_named_keys() {
    let combo = KeyCombo::key(Key::Enter).alt();
    assert_eq!(combo.label(Platform::Other), "Alt+Enter");
    assert_eq!(combo.label(Platform::Apple), "⌥Enter");
}

#[test]
fn test_keybinds_lookup_and_merge() {
    let mut binds = Keybinds::new();
    binds.bind(KeyCombo::key(Key::Char('q')).ctrl(), "quit");

    let mut extra = Keybinds::new();
    extra.bind(KeyCombo::key(Key::F(1)), "help");
    binds.merge(extra);

    assert_eq!(binds.len(), 2);
    assert_eq!(
        binds.lookup(Key::Char('q'), Modifiers::ctrl()),
        Some(&HandlerId::new("quit"))
    );
    assert_eq!(
        binds.lookup(Key::F(1), Modifiers::NONE),
        Some(&HandlerId::from("help"))
    );
    assert!(binds.lookup(Key::Char('q'), Modifiers::NONE).is_none());
}

#[test]
fn test_lookup_prefers_exact_letter_case() {
    let mut binds = Keybinds::new();
    binds.bind(KeyCombo::key(Key::Char('n')).ctrl(), "next");
    binds.bind(KeyCombo::key(Key::Char('N')).ctrl(), "new");
    binds.bind(KeyCombo::key(Key::Char('p')).ctrl(), "previous");

    for _ in 0..20 {
        assert_eq!(
            binds.lookup(Key::Char('n'), Modifiers::ctrl()),
            Some(&HandlerId::new("next"))
        );
        assert_eq!(
            binds.lookup(Key::Char('N'), Modifiers::ctrl()),
            Some(&HandlerId::new("new"))
        );
    }
    // Letters still match either case when only one bind exists
    assert_eq!(
        binds.lookup(Key::Char('P'), Modifiers::ctrl()),
        Some(&HandlerId::new("previous"))
    );
    assert!(binds.lookup(Key::Char('x'), Modifiers::ctrl()).is_none());
}

// ============================================================================
// Mounted shortcuts
// ============================================================================

#[test]
fn test_focus_search_fires_until_unmounted() {
    let doc = document();
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let subscription = mount_focus_search(&doc, Platform::Other, move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(doc.listeners().len(), 1);

    doc.dispatch(Event::key(Key::Char('k'), Modifiers::ctrl()));
    doc.dispatch(Event::key(Key::Char('k'), Modifiers::meta()));
    doc.dispatch(Event::key(Key::Char('j'), Modifiers::ctrl()));
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    drop(subscription);
    assert!(doc.listeners().is_empty());
    doc.dispatch(Event::key(Key::Char('k'), Modifiers::ctrl()));
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn test_focus_search_runs_regardless_of_focus() {
    let doc = document();
    doc.insert_element("field", None, floatdom::Rect::new(0, 0, 10, 1));
    doc.focus("field");

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let _subscription = mount_focus_search(&doc, Platform::Apple, move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    doc.dispatch(Event::key(Key::Char('k'), Modifiers::meta()));
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn test_mounted_keybinds_dispatch_handler() {
    let doc = document();
    let mut binds = Keybinds::new();
    binds.bind(KeyCombo::key(Key::Char('n')).ctrl(), "new");
    binds.bind(KeyCombo::key(Key::Escape), "back");

    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let subscription = mount_keybinds(&doc, binds, move |handler| {
        log.lock().unwrap().push(handler.0.clone());
    });

    doc.dispatch(Event::key(Key::Char('n'), Modifiers::ctrl()));
    doc.dispatch(Event::key(Key::Char('x'), Modifiers::NONE));
    doc.dispatch(Event::key(Key::Escape, Modifiers::NONE));
    assert_eq!(*seen.lock().unwrap(), vec!["new", "back"]);

    subscription.unsubscribe();
    assert!(doc.listeners().is_empty());
}
