pub mod document;
pub mod element;
pub mod event;
pub mod focus;
pub mod frame;
pub mod layout;
pub mod listener;

pub use document::{Document, OVERLAY_LAYER};
pub use element::ElementTree;
pub use event::{Event, EventKind, Key, Modifiers, MouseButton};
pub use focus::FocusState;
pub use frame::{FrameHandle, FrameScheduler};
pub use layout::{Rect, Size, Viewport};
pub use listener::{Listener, ListenerId, ListenerRegistry, Phase, Subscription};
