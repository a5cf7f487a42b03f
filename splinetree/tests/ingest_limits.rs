use splinetree::codec::stream::StreamWriter;
use splinetree::geometry::limits;
use splinetree::{
    CodecError, Document, DropAction, Error, Group, Interaction, PointObject, Subtree, TransferPayload, TreeError, Vec2,
};

fn codec_err(bytes: &[u8]) -> CodecError {
    match Document::from_bytes(bytes) {
        Err(Error::Codec(e)) => e,
        other => panic!("expected codec error, got {:?}", other.map(|d| d.object_count())),
    }
}

fn header(w: &mut StreamWriter, kind: &str, id: u32) {
    w.write_str(kind);
    w.write_u32(id);
    w.write_str("");
}

#[test]
fn truncated_stream() {
    let mut doc = Document::new();
    doc.add_object(PointObject::with_points([Vec2::new(1.0, 2.0)]));
    let bytes = doc.save().unwrap();
    for cut in [1, 5, bytes.len() / 2, bytes.len() - 1] {
        assert_eq!(codec_err(&bytes[..cut]), CodecError::UnexpectedEnd);
    }
}

#[test]
fn unknown_tag_and_non_root() {
    let mut w = StreamWriter::new();
    header(&mut w, "Root", 0);
    w.write_u32(1);
    header(&mut w, "Ellipse", 1);
    w.write_u32(0);
    assert_eq!(codec_err(&w.into_bytes()), CodecError::UnknownKind("Ellipse".into()));

    let mut w = StreamWriter::new();
    header(&mut w, "Group", 0);
    w.write_u32(0);
    assert_eq!(codec_err(&w.into_bytes()), CodecError::NotRoot("Group".into()));
}

#[test]
fn trailing_bytes() {
    let mut bytes = Document::new().save().unwrap();
    bytes.extend_from_slice(&[0, 0]);
    assert_eq!(codec_err(&bytes), CodecError::TrailingBytes(2));
}

#[test]
fn point_count_cap() {
    let mut w = StreamWriter::new();
    header(&mut w, "Root", 0);
    w.write_u32(1);
    header(&mut w, "PointObject", 1);
    w.write_len(limits::MAX_POINTS_PER_OBJECT + 1);
    assert_eq!(codec_err(&w.into_bytes()), CodecError::LimitExceeded("points per object"));
}

#[test]
fn non_finite_coordinates() {
    let mut w = StreamWriter::new();
    header(&mut w, "Root", 0);
    w.write_u32(1);
    header(&mut w, "PointObject", 1);
    w.write_u32(1);
    w.write_f32(f32::INFINITY);
    w.write_f32(0.0);
    w.write_u32(0);
    assert_eq!(codec_err(&w.into_bytes()), CodecError::InvalidCoordinate);
}

#[test]
fn child_count_cap() {
    let mut w = StreamWriter::new();
    header(&mut w, "Root", 0);
    w.write_len(limits::MAX_OBJECTS + 1);
    assert_eq!(codec_err(&w.into_bytes()), CodecError::LimitExceeded("child count"));
}

#[test]
fn failed_load_keeps_document() {
    let mut doc = Document::new();
    let h = doc.add_named("keep me", Group);
    doc.take_events();
    assert!(doc.load(b"garbage").is_err());
    assert_eq!(doc.data(h), Some("keep me"));
    assert!(doc.take_events().is_empty());
}

#[test]
fn object_id_past_ceiling() {
    let mut w = StreamWriter::new();
    header(&mut w, "Root", 0);
    w.write_u32(1);
    header(&mut w, "Group", u32::MAX);
    w.write_u32(0);
    assert_eq!(codec_err(&w.into_bytes()), CodecError::LimitExceeded("object id"));

    let mut w = StreamWriter::new();
    w.write_u32(1);
    header(&mut w, "Group", limits::MAX_OBJECT_ID + 1);
    w.write_u32(0);
    let payload = TransferPayload::new(w.into_bytes());
    let mut doc = Document::new();
    let err = doc.drop_mime_data(&payload, DropAction::Copy, None, 0, None, None).unwrap_err();
    assert!(matches!(err, Error::Codec(CodecError::LimitExceeded("object id"))));
    assert_eq!(doc.object_count(), 0);
}

#[test]
fn edited_documents_still_load() {
    let mut doc = Document::new();
    doc.add_named(&"n".repeat(limits::MAX_STRING_BYTES * 2), Group);
    let p = doc.add_object(PointObject::with_points([Vec2::new(2e7, -2e7), Vec2::new(9_999_999.0, 0.0)]));
    doc.edit(p, |o| o.as_points_mut().map_or(false, PointObject::select_all)).unwrap();
    doc.select(p).unwrap();
    assert!(doc.process_interaction(&Interaction::moved(Vec2::ZERO, Vec2::new(100.0, 0.0))));
    doc.edit(p, |o| o.as_points_mut().map_or(false, PointObject::deselect_all)).unwrap();
    let xs: Vec<f32> = doc.object(p).unwrap().as_points().unwrap().positions().iter().map(|v| v.x).collect();
    assert_eq!(xs, vec![limits::COORD_MAX, limits::COORD_MAX]);

    let mut parent = None;
    let mut refused = false;
    for _ in 0..limits::MAX_DEPTH + 2 {
        match doc.insert_rows(0, parent, vec![Subtree::new(Group)]) {
            Ok(handles) => parent = Some(handles[0]),
            Err(Error::Tree(TreeError::LimitExceeded("nesting depth"))) => {
                refused = true;
                break;
            }
            Err(e) => panic!("unexpected error {}", e),
        }
    }
    assert!(refused);

    let back = Document::from_bytes(&doc.save().unwrap()).unwrap();
    assert_eq!(back.object_count(), doc.object_count());
    assert_eq!(back.to_json_value()["root"], doc.to_json_value()["root"]);
}
