use splinetree::{Document, DropAction, Group, Handle, ObjectId, PointObject, Subtree, Vec2};

fn names(doc: &Document, parent: Option<Handle>) -> Vec<String> {
    doc.children(parent).iter().filter_map(|h| doc.data(*h)).map(str::to_owned).collect()
}

#[test]
fn test_move_keeps_ids_and_adjusts_row() {
    let mut doc = Document::new();
    let a = doc.add_named("a", Group);
    doc.add_named("b", Group);
    let c = doc.add_named("c", Group);

    let session = doc.start_drag(&[a, c]).unwrap();
    let ok = doc
        .drop_mime_data(&session.payload, DropAction::Move, Some(1), 0, None, Some(&session))
        .unwrap();
    assert!(ok);
    assert_eq!(names(&doc, None), vec!["a", "c", "b"]);
    assert!(doc.check_invariants());

    let ids: Vec<Option<ObjectId>> = doc.children(None).iter().map(|h| doc.id_of(*h)).collect();
    assert_eq!(ids, vec![Some(ObjectId(1)), Some(ObjectId(3)), Some(ObjectId(2))]);
    assert_eq!(doc.ids().free_queue().count(), 0);
    assert_eq!(doc.add_object(Group).row, 3);
    assert_eq!(doc.id_of(doc.index(3, 0, None).unwrap()), Some(ObjectId(4)));
}

#[test]
fn test_move_to_end_keeps_nested_ids() {
    let mut doc = Document::new();
    let g = doc.insert_rows(
        0,
        None,
        vec![Subtree::new(Group).named("g").with_child(Subtree::new(PointObject::new()).named("p"))],
    )
    .unwrap()[0];
    doc.add_named("tail", Group);
    let before: Vec<ObjectId> = doc.tree().extract(g.node).unwrap().ids();

    let session = doc.start_drag(&[g]).unwrap();
    assert!(doc
        .drop_mime_data(&session.payload, DropAction::Move, None, 0, None, Some(&session))
        .unwrap());
    assert_eq!(names(&doc, None), vec!["tail", "g"]);
    let moved = doc.index(1, 0, None).unwrap();
    assert_eq!(doc.tree().extract(moved.node).unwrap().ids(), before);
    assert!(doc.check_invariants());
}

#[test]
fn test_refused_move_keeps_sources() {
    let mut doc = Document::new();
    let a = doc.add_named("a", Group);
    let session = doc.start_drag(&[a]).unwrap();
    assert!(doc
        .drop_mime_data(&session.payload, DropAction::Move, Some(5), 0, None, Some(&session))
        .is_err());
    assert_eq!(names(&doc, None), vec!["a"]);
    assert_eq!(doc.id_of(a), Some(ObjectId(1)));
}

#[test]
fn test_move_into_group() {
    let mut doc = Document::new();
    let g = doc.add_named("g", Group);
    let p = doc.add_named("p", PointObject::with_points([Vec2::new(1.0, 1.0)]));
    let session = doc.start_drag(&[p]).unwrap();
    assert!(doc
        .drop_mime_data(&session.payload, DropAction::Move, None, 0, Some(g), Some(&session))
        .unwrap());
    assert_eq!(names(&doc, None), vec!["g"]);
    assert_eq!(names(&doc, Some(g)), vec!["p"]);
    let moved = doc.index(0, 0, Some(g)).unwrap();
    assert_eq!(doc.parent(moved), Some(g));
    let pts = doc.object(moved).unwrap().as_points().unwrap().positions();
    assert_eq!(pts, vec![Vec2::new(1.0, 1.0)]);
}

#[test]
fn test_copy_keeps_sources_and_uses_one_bracket_per_object() {
    let mut doc = Document::new();
    let a = doc.add_named("a", Group);
    let b = doc.add_named("b", Group);
    let payload = doc.mime_data(&[a, b]).unwrap();
    doc.take_events();
    assert!(doc.drop_mime_data(&payload, DropAction::Copy, None, 0, None, None).unwrap());
    assert_eq!(names(&doc, None), vec!["a", "b", "a", "b"]);
    let inserts = doc
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, splinetree::ModelEvent::BeginInsert { .. }))
        .count();
    assert_eq!(inserts, 2);
}

#[test]
fn test_drop_between_documents_keeps_free_ids() {
    let mut src = Document::new();
    src.add_object(Group);
    let second = src.add_named("second", Group);
    let payload = src.copy(&[second]).unwrap();

    let mut dst = Document::new();
    assert!(dst.drop_mime_data(&payload, DropAction::Copy, None, 0, None, None).unwrap());
    let h = dst.index(0, 0, None).unwrap();
    assert_eq!(dst.id_of(h), Some(ObjectId(2)));
    assert_eq!(dst.add_object(Group).row, 1);
    assert_eq!(dst.id_of(dst.index(1, 0, None).unwrap()), Some(ObjectId(3)));
}

#[test]
fn test_malformed_payload_is_an_error() {
    let mut doc = Document::new();
    let mut payload = doc.mime_data(&[]).unwrap();
    payload.bytes.push(0xff);
    assert!(doc.drop_mime_data(&payload, DropAction::Copy, None, 0, None, None).is_err());
    assert_eq!(doc.object_count(), 0);
}
