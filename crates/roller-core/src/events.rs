//! Notifications emitted by the engine and the listener list that fans them out.
//!
//! Listeners register per event kind and run synchronously in registration
//! order, so `change` is always observed before `enter:<to>` and `leave:<from>`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Page transition payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageChange {
    pub from: usize,
    pub to: usize,
}

/// Events emitted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RollerEvent {
    /// Displayed position changed
    Update { position: f64 },
    /// Drag moved toward the start of the axis past the deadzone
    Up,
    /// Drag moved toward the end of the axis past the deadzone
    Down,
    /// Current page changed
    Change(PageChange),
    /// A page became current
    Enter(PageChange),
    /// A page stopped being current
    Leave(PageChange),
}

impl RollerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RollerEvent::Update { .. } => EventKind::Update,
            RollerEvent::Up => EventKind::Up,
            RollerEvent::Down => EventKind::Down,
            RollerEvent::Change(_) => EventKind::Change,
            RollerEvent::Enter(change) => EventKind::Enter(change.to),
            RollerEvent::Leave(change) => EventKind::Leave(change.from),
        }
    }
}

impl fmt::Display for RollerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollerEvent::Update { position } => write!(f, "update {position:.3}"),
            RollerEvent::Up | RollerEvent::Down => write!(f, "{}", self.kind()),
            RollerEvent::Change(c) | RollerEvent::Enter(c) | RollerEvent::Leave(c) => {
                write!(f, "{} {} -> {}", self.kind(), c.from, c.to)
            }
        }
    }
}

/// Event name a listener subscribes to.
///
/// Textual form: `update`, `up`, `down`, `change`, `enter:<page>`, `leave:<page>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Update,
    Up,
    Down,
    Change,
    Enter(usize),
    Leave(usize),
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Update => f.write_str("update"),
            EventKind::Up => f.write_str("up"),
            EventKind::Down => f.write_str("down"),
            EventKind::Change => f.write_str("change"),
            EventKind::Enter(page) => write!(f, "enter:{page}"),
            EventKind::Leave(page) => write!(f, "leave:{page}"),
        }
    }
}

impl FromStr for EventKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let page = |rest: &str| {
            rest.parse::<usize>()
                .map_err(|_| crate::Error::Config(format!("invalid page index in event name: {s}")))
        };

        match s.trim() {
            "update" => Ok(EventKind::Update),
            "up" => Ok(EventKind::Up),
            "down" => Ok(EventKind::Down),
            "change" => Ok(EventKind::Change),
            other => {
                if let Some(rest) = other.strip_prefix("enter:") {
                    Ok(EventKind::Enter(page(rest)?))
                } else if let Some(rest) = other.strip_prefix("leave:") {
                    Ok(EventKind::Leave(page(rest)?))
                } else {
                    Err(crate::Error::Config(format!("unknown event name: {other}")))
                }
            }
        }
    }
}

/// Handle returned by registration, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&RollerEvent)>;

struct Listener {
    id: ListenerId,
    /// `None` receives every event
    kind: Option<EventKind>,
    callback: Callback,
}

/// Ordered listener list owned by the engine
#[derive(Default)]
pub struct Listeners {
    entries: Vec<Listener>,
    next_id: u64,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: EventKind, callback: impl FnMut(&RollerEvent) + 'static) -> ListenerId {
        self.push(Some(kind), Box::new(callback))
    }

    pub fn on_any(&mut self, callback: impl FnMut(&RollerEvent) + 'static) -> ListenerId {
        self.push(None, Box::new(callback))
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|l| l.id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn emit(&mut self, event: &RollerEvent) {
        let kind = event.kind();
        for listener in &mut self.entries {
            if listener.kind.map_or(true, |k| k == kind) {
                (listener.callback)(event);
            }
        }
    }

    fn push(&mut self, kind: Option<EventKind>, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Listener { id, kind, callback });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_event_kind_names() {
        for (kind, name) in [
            (EventKind::Update, "update"),
            (EventKind::Up, "up"),
            (EventKind::Down, "down"),
            (EventKind::Change, "change"),
            (EventKind::Enter(3), "enter:3"),
            (EventKind::Leave(0), "leave:0"),
        ] {
            assert_eq!(kind.to_string(), name);
            assert_eq!(name.parse::<EventKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_event_kind_rejects_garbage() {
        assert!("scroll".parse::<EventKind>().is_err());
        assert!("enter:x".parse::<EventKind>().is_err());
        assert!("leave:".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_enter_and_leave_are_keyed_by_page() {
        let change = PageChange { from: 1, to: 2 };
        assert_eq!(RollerEvent::Enter(change).kind(), EventKind::Enter(2));
        assert_eq!(RollerEvent::Leave(change).kind(), EventKind::Leave(1));
    }

    #[test]
    fn test_emit_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();

        let log = seen.clone();
        listeners.on_any(move |e| log.borrow_mut().push(format!("any {}", e.kind())));
        let log = seen.clone();
        listeners.on(EventKind::Up, move |_| log.borrow_mut().push("up".to_string()));
        let log = seen.clone();
        listeners.on(EventKind::Down, move |_| log.borrow_mut().push("down".to_string()));

        listeners.emit(&RollerEvent::Up);

        assert_eq!(*seen.borrow(), vec!["any up".to_string(), "up".to_string()]);
    }

    #[test]
    fn test_off_removes_listener() {
        let count = Rc::new(RefCell::new(0));
        let mut listeners = Listeners::new();

        let c = count.clone();
        let id = listeners.on(EventKind::Update, move |_| *c.borrow_mut() += 1);
        assert_eq!(listeners.len(), 1);
        listeners.emit(&RollerEvent::Update { position: 1.0 });
        assert!(listeners.off(id));
        assert!(!listeners.off(id));
        listeners.emit(&RollerEvent::Update { position: 2.0 });

        assert_eq!(*count.borrow(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&RollerEvent::Change(PageChange { from: 0, to: 1 })).unwrap();
        assert_eq!(json, r#"{"event":"change","from":0,"to":1}"#);
    }
}
