//! End-to-end document behaviour through the public API.

use splinetree::svg::SvgPainter;
use splinetree::{
    Document, DocumentConfig, Error, Group, ModelEvent, ObjectId, PointObject, Spline, Subtree, TreeError, Vec2,
};

#[test]
fn test_save_and_load_point_object() {
    let mut doc = Document::new();
    let h = doc.add_object(PointObject::with_points([Vec2::new(0.0, 0.0)]));
    doc.select(h).unwrap();
    doc.edit(h, |o| o.as_points_mut().map_or(false, |p| p.select_all())).unwrap();
    let bytes = doc.save().unwrap();

    let loaded = Document::from_bytes(&bytes).unwrap();
    assert_eq!(loaded.row_count(None), 1);
    let child = loaded.index(0, 0, None).unwrap();
    let obj = loaded.object(child).unwrap();
    assert_eq!(obj.kind(), "PointObject");
    let points = obj.as_points().unwrap();
    assert_eq!(points.positions(), vec![Vec2::new(0.0, 0.0)]);
    assert!(points.selection().is_empty());
    assert!(loaded.selected().is_empty());
    assert!(loaded.check_invariants());
}

#[test]
fn test_point_hit_tolerance() {
    let obj = PointObject::with_points([Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]);
    let first = obj.points()[0].key;
    assert_eq!(obj.point_at(Vec2::new(1.0, 0.0)), Some(first));
    assert_eq!(obj.point_at(Vec2::new(5.0, 0.0)), None);
}

#[test]
fn test_removed_id_is_reused() {
    let mut doc = Document::new();
    doc.add_object(Group);
    doc.add_object(Group);
    let third = doc.add_object(Group);
    assert_eq!(doc.id_of(third), Some(ObjectId(3)));
    doc.remove_object(third).unwrap();
    let again = doc.add_object(Group);
    assert_eq!(doc.id_of(again), Some(ObjectId(3)));
}

#[test]
fn test_insert_rows_single_bracket() {
    let mut doc = Document::new();
    doc.add_named("x", Group);
    doc.add_named("y", Group);
    doc.take_events();

    let a = Subtree::new(Group).named("a");
    let b = Subtree::new(Group).named("b");
    doc.insert_rows(1, None, vec![a, b]).unwrap();

    assert_eq!(doc.data(doc.index(1, 0, None).unwrap()), Some("a"));
    assert_eq!(doc.data(doc.index(2, 0, None).unwrap()), Some("b"));
    assert_eq!(doc.data(doc.index(3, 0, None).unwrap()), Some("y"));
    let root = doc.tree().root();
    assert_eq!(
        doc.take_events(),
        vec![
            ModelEvent::BeginInsert { parent: root, first: 1, last: 2 },
            ModelEvent::EndInsert,
            ModelEvent::Changed,
        ]
    );
}

#[test]
fn test_insert_rows_keeps_free_ids_and_replaces_live_ones() {
    let mut doc = Document::new();
    doc.add_object(Group);
    let mut carried = Subtree::new(Group);
    carried.id = Some(ObjectId(7));
    let mut clash = Subtree::new(Group);
    clash.id = Some(ObjectId(1));
    let hs = doc.insert_rows(1, None, vec![carried, clash]).unwrap();
    assert_eq!(doc.id_of(hs[0]), Some(ObjectId(7)));
    assert_eq!(doc.id_of(hs[1]), Some(ObjectId(8)));
    assert!(doc.check_invariants());
}

#[test]
fn test_stale_handles_are_rejected() {
    let mut doc = Document::new();
    let h = doc.add_object(Group);
    doc.remove_object(h).unwrap();
    let replacement = doc.add_object(Group);
    assert_eq!(replacement.node.slot, h.node.slot);
    assert!(matches!(doc.remove_object(h), Err(Error::Tree(TreeError::StaleHandle(_)))));
    assert!(matches!(doc.insert_rows(0, Some(h), Vec::new()), Err(Error::Tree(TreeError::StaleHandle(_)))));
    assert_eq!(doc.data(h), None);
    assert_eq!(doc.object_count(), 1);
}

#[test]
fn test_row_out_of_range() {
    let mut doc = Document::new();
    let err = doc.insert_rows(2, None, vec![Subtree::new(Group)]).unwrap_err();
    assert!(matches!(err, Error::Tree(TreeError::RowOutOfRange { row: 2, len: 0 })));
    assert_eq!(doc.object_count(), 0);
}

#[test]
fn test_load_replaces_contents_with_brackets() {
    let mut source = Document::new();
    source.add_named("kept", Spline::with_points([Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0)], true));
    let bytes = source.save().unwrap();

    let mut doc = Document::new();
    let old = doc.add_object(Group);
    doc.add_object(Group);
    doc.take_events();
    doc.load(&bytes).unwrap();

    let root = doc.tree().root();
    assert_eq!(
        doc.take_events(),
        vec![
            ModelEvent::BeginRemove { parent: root, first: 0, last: 1 },
            ModelEvent::EndRemove,
            ModelEvent::BeginInsert { parent: root, first: 0, last: 0 },
            ModelEvent::EndInsert,
            ModelEvent::Changed,
        ]
    );
    assert_eq!(doc.data(old), None);
    let h = doc.index(0, 0, None).unwrap();
    assert_eq!(doc.data(h), Some("kept"));
    assert_eq!(doc.id_of(h), Some(ObjectId(1)));
    assert_eq!(doc.add_object(Group).row, 1);
}

#[test]
fn test_draw_brackets_objects() {
    let mut doc = Document::new();
    doc.add_object(Spline::with_points([Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)], false));
    doc.add_object(Group);
    let mut painter = SvgPainter::new();
    doc.draw(&mut painter);
    assert_eq!(painter.paths().len(), 1);
    assert_eq!(painter.paths()[0].0, ObjectId(1));
    assert!(painter.paths()[0].1.starts_with("M 0 0 C"));
    assert_eq!(painter.markers().len(), 3);
}

#[test]
fn test_config_drives_pick_radius() {
    let config = DocumentConfig::from_json_str(r#"{ "pick_radius": 6.0, "auto_name": false }"#).unwrap();
    let mut doc = Document::with_config(config).unwrap();
    let h = doc.add_object(PointObject::with_points([Vec2::new(0.0, 0.0)]));
    assert_eq!(doc.data(h), Some(""));
    doc.select(h).unwrap();
    assert!(doc.remove_at(Vec2::new(5.0, 0.0)));
    assert!(doc.check_invariants());
}
