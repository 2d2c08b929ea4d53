//! Selection exclusivity and view synchronization

use crate::support::{session, upload, RecordingView};
use garmentkit_core::types::{shared, shared_none, Shared, SharedOption, SharedVec};
use garmentkit_designer::{DesignId, ObserverRole, SelectionChange};
use std::rc::Rc;

type Highlight = SharedOption<DesignId>;

fn views(
    session: &mut garmentkit_designer::CustomizerSession,
) -> (SharedVec<&'static str>, Vec<Highlight>) {
    let order: Shared<Vec<&'static str>> = shared(Vec::new());
    let mut highlights = Vec::new();
    // registered out of order on purpose
    for (name, role) in [
        ("3d", ObserverRole::Model3d),
        ("panel", ObserverRole::Panel),
        ("overlay", ObserverRole::Overlay),
    ] {
        let highlighted = shared_none();
        session.register_view(
            role,
            Box::new(RecordingView {
                name,
                order: Rc::clone(&order),
                highlighted: Rc::clone(&highlighted),
            }),
        );
        highlights.push(highlighted);
    }
    (order, highlights)
}

#[test]
fn test_selecting_b_clears_a_everywhere() {
    let (mut session, _) = session();
    let a = session.image_uploaded(upload(100, 100)).unwrap();
    let b = session.image_uploaded(upload(100, 100)).unwrap();
    let (_, highlights) = views(&mut session);

    session.select(Some(a));
    session.select(Some(b));

    assert_eq!(session.selected_id(), Some(b));
    for h in &highlights {
        assert_eq!(*h.borrow(), Some(b));
    }
    let selected: Vec<_> = session
        .summaries(session.current_zone())
        .into_iter()
        .filter(|s| s.selected)
        .map(|s| s.id)
        .collect();
    assert_eq!(selected, vec![b]);
}

#[test]
fn test_views_notified_in_fixed_order_before_select_returns() {
    let (mut session, _) = session();
    let a = session.image_uploaded(upload(100, 100)).unwrap();
    session.select(None);
    let (order, _) = views(&mut session);
    let external: SharedVec<SelectionChange> = shared(Vec::new());
    session.on_selection_changed({
        let external = Rc::clone(&external);
        let order = Rc::clone(&order);
        move |change: SelectionChange| {
            order.borrow_mut().push("external");
            external.borrow_mut().push(change);
        }
    });

    session.select(Some(a));
    assert_eq!(*order.borrow(), vec!["overlay", "panel", "3d", "external"]);
    assert_eq!(
        external.borrow().as_slice(),
        &[SelectionChange {
            previous: None,
            current: Some(a)
        }]
    );
}

#[test]
fn test_selecting_null_clears_highlights() {
    let (mut session, _) = session();
    session.image_uploaded(upload(100, 100)).unwrap();
    let (_, highlights) = views(&mut session);
    session.select(None);
    assert_eq!(session.selected_id(), None);
    assert!(highlights.iter().all(|h| h.borrow().is_none()));
    assert!(session.summaries(session.current_zone()).iter().all(|s| !s.selected));
}

#[test]
fn test_unknown_id_is_not_selected() {
    let (mut session, _) = session();
    let a = session.image_uploaded(upload(100, 100)).unwrap();
    session.select(Some(DesignId(9999)));
    assert_eq!(session.selected_id(), Some(a));
}
