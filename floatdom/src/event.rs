/// Input events with optional element targeting.
///
/// `target` is the id of the element the event was delivered to. Pointer
/// events with no target are resolved by hit testing when dispatched through
/// a [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Key press, targeted at the focused element
    Key {
        target: Option<String>,
        key: Key,
        modifiers: Modifiers,
    },
    /// Mouse/pen button pressed
    PointerDown {
        target: Option<String>,
        x: i32,
        y: i32,
        button: MouseButton,
    },
    /// Touch contact started
    TouchStart { target: Option<String>, x: i32, y: i32 },
    /// Scroll of the page (`target: None`) or of a scrollable element
    Scroll {
        target: Option<String>,
        delta_x: i32,
        delta_y: i32,
    },
    /// Window resized
    Resize { width: i32, height: i32 },
    /// Element gained focus
    Focus { target: String },
    /// Element lost focus
    Blur { target: String },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Key { .. } => EventKind::Key,
            Event::PointerDown { .. } => EventKind::PointerDown,
            Event::TouchStart { .. } => EventKind::TouchStart,
            Event::Scroll { .. } => EventKind::Scroll,
            Event::Resize { .. } => EventKind::Resize,
            Event::Focus { .. } => EventKind::Focus,
            Event::Blur { .. } => EventKind::Blur,
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Event::Key { target, .. }
            | Event::PointerDown { target, .. }
            | Event::TouchStart { target, .. }
            | Event::Scroll { target, .. } => target.as_deref(),
            Event::Focus { target } | Event::Blur { target } => Some(target),
            Event::Resize { .. } => None,
        }
    }

    /// Pointer position for pointer and touch events.
    pub fn position(&self) -> Option<(i32, i32)> {
        match self {
            Event::PointerDown { x, y, .. } | Event::TouchStart { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }

    /// Convenience constructor for an untargeted key press.
    pub fn key(key: Key, modifiers: Modifiers) -> Self {
        Event::Key {
            target: None,
            key,
            modifiers,
        }
    }

    /// Convenience constructor for an untargeted primary-button press.
    pub fn pointer_down(x: i32, y: i32) -> Self {
        Event::PointerDown {
            target: None,
            x,
            y,
            button: MouseButton::Left,
        }
    }

    /// Convert a crossterm event. Returns None for events with no counterpart
    /// (key releases, mouse moves, paste, focus changes of the terminal).
    pub fn from_crossterm(event: &crossterm::event::Event) -> Option<Self> {
        use crossterm::event::{Event as CtEvent, KeyEventKind, MouseEventKind};

        match event {
            CtEvent::Key(key) if key.kind != KeyEventKind::Release => Some(Event::Key {
                target: None,
                key: Key::from(key.code),
                modifiers: Modifiers::from(key.modifiers),
            }),
            CtEvent::Mouse(mouse) => {
                let x = i32::from(mouse.column);
                let y = i32::from(mouse.row);
                match mouse.kind {
                    MouseEventKind::Down(button) => Some(Event::PointerDown {
                        target: None,
                        x,
                        y,
                        button: button.into(),
                    }),
                    MouseEventKind::ScrollDown => Some(Event::Scroll {
                        target: None,
                        delta_x: 0,
                        delta_y: 1,
                    }),
                    MouseEventKind::ScrollUp => Some(Event::Scroll {
                        target: None,
                        delta_x: 0,
                        delta_y: -1,
                    }),
                    MouseEventKind::ScrollLeft => Some(Event::Scroll {
                        target: None,
                        delta_x: -1,
                        delta_y: 0,
                    }),
                    MouseEventKind::ScrollRight => Some(Event::Scroll {
                        target: None,
                        delta_x: 1,
                        delta_y: 0,
                    }),
                    _ => None,
                }
            }
            CtEvent::Resize(width, height) => Some(Event::Resize {
                width: i32::from(*width),
                height: i32::from(*height),
            }),
            _ => None,
        }
    }
}

/// Event channel used by listener subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Key,
    PointerDown,
    TouchStart,
    Scroll,
    Resize,
    Focus,
    Blur,
}

/// Simplified key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
    /// Keys with no mapping (media keys, lone modifiers)
    Unknown,
}

/// Key modifiers
///
/// `meta` is the Command key on Apple keyboards and the Super/Windows key
/// elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Default::default()
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Default::default()
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Default::default()
        }
    }

    pub fn none(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

// Conversion from crossterm types
impl From<crossterm::event::KeyCode> for Key {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode;
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Esc => Key::Escape,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Insert => Key::Insert,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Unknown,
        }
    }
}

impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(mods: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers;
        Self {
            shift: mods.contains(KeyModifiers::SHIFT),
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
            meta: mods.intersects(KeyModifiers::SUPER | KeyModifiers::META),
        }
    }
}

impl From<crossterm::event::MouseButton> for MouseButton {
    fn from(btn: crossterm::event::MouseButton) -> Self {
        use crossterm::event::MouseButton as CtBtn;
        match btn {
            CtBtn::Left => MouseButton::Left,
            CtBtn::Right => MouseButton::Right,
            CtBtn::Middle => MouseButton::Middle,
        }
    }
}
