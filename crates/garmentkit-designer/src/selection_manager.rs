use crate::model::DesignId;
use std::fmt;
use uuid::Uuid;

/// A selection transition, delivered to every listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<DesignId>,
    pub current: Option<DesignId>,
}

/// Receives selection transitions synchronously from [`SelectionManager::select`].
pub trait SelectionListener {
    fn selection_changed(&mut self, change: SelectionChange);
}

impl<F> SelectionListener for F
where
    F: FnMut(SelectionChange),
{
    fn selection_changed(&mut self, change: SelectionChange) {
        self(change)
    }
}

/// Which view a listener drives. Notification follows this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObserverRole {
    /// Highlight drawn over the editing panel.
    Overlay,
    /// Property panel showing the selected element.
    Panel,
    /// Highlight in the 3D view.
    Model3d,
    /// Anything registered through `on_selection_changed`.
    External,
}

/// Token returned on registration, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(Uuid);

struct Registration {
    handle: ListenerHandle,
    role: ObserverRole,
    listener: Box<dyn SelectionListener>,
}

/// Owns the single selected-element slot and fans changes out to views.
///
/// `SelectionManager` is responsible for:
/// - Tracking which element is selected (at most one)
/// - Notifying every registered view before `select` returns
/// - Keeping notification order deterministic (overlay, panel, 3D, external)
///
/// # Selection Model
///
/// Selection is one mutable slot, not a set. Selecting an element replaces
/// the previous one, and every listener sees the previous id in the same
/// call so it can clear its highlight.
#[derive(Default)]
pub struct SelectionManager {
    /// The ID of the selected element, if any
    selected_id: Option<DesignId>,
    listeners: Vec<Registration>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection and no listeners.
    ///
    /// # Examples
    ///
    /// ```
    /// use garmentkit_designer::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new();
    /// assert_eq!(manager.selected_id(), None);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ID of the selected element.
    pub fn selected_id(&self) -> Option<DesignId> {
        self.selected_id
    }

    pub fn is_selected(&self, id: DesignId) -> bool {
        self.selected_id == Some(id)
    }

    /// Sets the selection and notifies listeners.
    ///
    /// Listeners run synchronously in role order, then registration order.
    /// Re-selecting the current element is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if the selection changed.
    pub fn select(&mut self, id: Option<DesignId>) -> bool {
        if self.selected_id == id {
            return false;
        }
        let change = SelectionChange {
            previous: self.selected_id,
            current: id,
        };
        self.selected_id = id;
        tracing::debug!("Selection changed: {:?} -> {:?}", change.previous, change.current);
        for registration in &mut self.listeners {
            registration.listener.selection_changed(change);
        }
        true
    }

    /// Clears the selection if it is one of `ids`.
    pub fn deselect_if_any(&mut self, ids: &[DesignId]) -> bool {
        match self.selected_id {
            Some(current) if ids.contains(&current) => self.select(None),
            _ => false,
        }
    }

    /// Registers a view listener.
    ///
    /// # Arguments
    ///
    /// * `role` - Determines where in the notification order the listener runs
    /// * `listener` - The view to notify
    pub fn register(
        &mut self,
        role: ObserverRole,
        listener: Box<dyn SelectionListener>,
    ) -> ListenerHandle {
        let handle = ListenerHandle(Uuid::new_v4());
        let at = self
            .listeners
            .iter()
            .position(|r| r.role > role)
            .unwrap_or(self.listeners.len());
        self.listeners.insert(
            at,
            Registration {
                handle,
                role,
                listener,
            },
        );
        handle
    }

    /// Registers a callback that runs after all built-in views.
    pub fn on_selection_changed<F>(&mut self, callback: F) -> ListenerHandle
    where
        F: FnMut(SelectionChange) + 'static,
    {
        self.register(ObserverRole::External, Box::new(callback))
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unregister(&mut self, handle: ListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|r| r.handle != handle);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for SelectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionManager")
            .field("selected_id", &self.selected_id)
            .field(
                "listeners",
                &self.listeners.iter().map(|r| r.role).collect::<Vec<_>>(),
            )
            .finish()
    }
}
