//! Key combinations and document-level shortcuts.
//!
//! Global shortcuts are not ambient: they are mounted into the document's
//! listener registry and live exactly as long as the returned
//! [`Subscription`].

use std::collections::HashMap;

use floatdom::{Document, Event, EventKind, Key, Modifiers, Phase, Subscription};

/// Host platform, for modifier conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// macOS, iOS, iPadOS: Command is the primary modifier
    Apple,
    /// Everything else: Control is the primary modifier
    Other,
}

impl Platform {
    /// Detect the platform from a platform or user-agent string
    /// (`"MacIntel"`, `"iPhone"`, `"Win32"`, `"Linux x86_64"`, `"macos"`).
    pub fn sniff(platform: &str) -> Self {
        let platform = platform.to_lowercase();
        let apple = ["mac", "iphone", "ipad", "ipod", "darwin"]
            .iter()
            .any(|marker| platform.contains(marker))
            || platform == "ios";
        if apple { Platform::Apple } else { Platform::Other }
    }

    /// The platform this binary was built for.
    pub fn current() -> Self {
        Self::sniff(std::env::consts::OS)
    }

    /// Cmd on Apple platforms, Ctrl elsewhere.
    pub fn primary_modifier(self) -> Modifiers {
        match self {
            Platform::Apple => Modifiers::meta(),
            Platform::Other => Modifiers::ctrl(),
        }
    }
}

/// A key combination (key + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    /// The key code
    pub key: Key,
    /// Modifier keys
    pub modifiers: Modifiers,
}

impl KeyCombo {
    /// Create a new key combo
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a key combo without modifiers
    pub const fn key(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Add ctrl modifier
    pub const fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    /// Add shift modifier
    pub const fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    /// Add alt modifier
    pub const fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    /// Add meta (Cmd/Super) modifier
    pub const fn meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }

    /// The platform's "focus search" shortcut: Cmd+K or Ctrl+K.
    pub fn focus_search(platform: Platform) -> Self {
        Self::new(Key::Char('k'), platform.primary_modifier())
    }

    /// Whether a key press matches. Letters compare case-insensitively.
    pub fn matches(&self, key: Key, modifiers: Modifiers) -> bool {
        let key_matches = match (self.key, key) {
            (Key::Char(a), Key::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        key_matches && self.modifiers == modifiers
    }

    /// Human-readable label, e.g. `⌘K` or `Ctrl+K`.
    pub fn label(&self, platform: Platform) -> String {
        let key = match self.key {
            Key::Char(c) => c.to_ascii_uppercase().to_string(),
            other => format!("{:?}", other),
        };
        match platform {
            Platform::Apple => {
                let mut label = String::new();
                if self.modifiers.ctrl {
                    label.push('⌃');
                }
                if self.modifiers.alt {
                    label.push('⌥');
                }
                if self.modifiers.shift {
                    label.push('⇧');
                }
                if self.modifiers.meta {
                    label.push('⌘');
                }
                label + &key
            }
            Platform::Other => {
                let mut parts = Vec::new();
                if self.modifiers.ctrl {
                    parts.push("Ctrl".to_string());
                }
                if self.modifiers.alt {
                    parts.push("Alt".to_string());
                }
                if self.modifiers.shift {
                    parts.push("Shift".to_string());
                }
                if self.modifiers.meta {
                    parts.push("Super".to_string());
                }
                parts.push(key);
                parts.join("+")
            }
        }
    }
}

/// Handler identifier (used to reference shell actions)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerId(pub String);

impl HandlerId {
    /// Create a new handler ID
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl From<&str> for HandlerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Collection of keybinds
#[derive(Debug, Clone, Default)]
pub struct Keybinds {
    binds: HashMap<KeyCombo, HandlerId>,
}

impl Keybinds {
    /// Create empty keybinds
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a simple key -> handler binding
    pub fn bind(&mut self, key: KeyCombo, handler: impl Into<HandlerId>) {
        self.binds.insert(key, handler.into());
    }

    /// Look up the handler for a key press.
    ///
    /// An exact combo wins; otherwise letters match case-insensitively,
    /// preferring the lowercase bind.
    pub fn lookup(&self, key: Key, modifiers: Modifiers) -> Option<&HandlerId> {
        if let Some(handler) = self.binds.get(&KeyCombo::new(key, modifiers)) {
            return Some(handler);
        }
        match key {
            Key::Char(c) => [c.to_ascii_lowercase(), c.to_ascii_uppercase()]
                .into_iter()
                .find_map(|c| self.binds.get(&KeyCombo::new(Key::Char(c), modifiers))),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.binds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }

    /// Merge another keybinds collection into this one
    pub fn merge(&mut self, other: Keybinds) {
        self.binds.extend(other.binds);
    }
}

/// Mount a keybind table on the document.
///
/// Runs in the capture phase so shortcuts work regardless of which element
/// has focus. `dispatch` receives the matched handler.
pub fn mount_keybinds(
    document: &Document,
    keybinds: Keybinds,
    dispatch: impl Fn(&HandlerId) + Send + Sync + 'static,
) -> Subscription {
    document
        .listeners()
        .subscribe(&[EventKind::Key], Phase::Capture, move |event| {
            if let Event::Key { key, modifiers, .. } = event
                && let Some(handler) = keybinds.lookup(*key, *modifiers)
            {
                log::debug!("[keybinds] matched {:?}", handler);
                dispatch(handler);
            }
        })
}

/// Mount the platform-aware focus-search shortcut.
pub fn mount_focus_search(
    document: &Document,
    platform: Platform,
    on_trigger: impl Fn() + Send + Sync + 'static,
) -> Subscription {
    let combo = KeyCombo::focus_search(platform);
    document
        .listeners()
        .subscribe(&[EventKind::Key], Phase::Capture, move |event| {
            if let Event::Key { key, modifiers, .. } = event
                && combo.matches(*key, *modifiers)
            {
                log::debug!("[shortcut] focus search ({:?})", platform);
                on_trigger();
            }
        })
}
