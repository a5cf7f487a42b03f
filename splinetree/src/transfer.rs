//! Clipboard and drag-and-drop payloads.

use crate::codec;
use crate::document::{Document, Handle};
use crate::error::{CodecError, Result, TreeError};
use crate::events::ModelEvent;
use crate::tree::{NodeKey, Subtree};
use serde::{Deserialize, Serialize};

/// Media type tag of encoded object sequences.
pub const MIME_TYPE: &str = "application/x-splinetree-object";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPayload {
    pub format: String,
    pub bytes: Vec<u8>,
}

impl TransferPayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        TransferPayload { format: MIME_TYPE.to_owned(), bytes }
    }

    pub fn is_supported(&self) -> bool {
        self.format == MIME_TYPE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropAction {
    Ignore,
    Copy,
    Move,
    Link,
}

/// State captured when a drag starts and consumed by the matching drop.
#[derive(Clone, Debug)]
pub struct DragSession {
    pub sources: Vec<NodeKey>,
    pub payload: TransferPayload,
}

impl Document {
    /// Encode the objects behind `handles`, each with its subtree. The root
    /// and repeated handles are skipped.
    pub fn mime_data(&self, handles: &[Handle]) -> Result<TransferPayload> {
        Ok(TransferPayload::new(codec::encode_transfer(&self.tree, &self.transfer_keys(handles)?)))
    }

    fn transfer_keys(&self, handles: &[Handle]) -> Result<Vec<NodeKey>> {
        let mut keys = Vec::with_capacity(handles.len());
        for h in handles {
            let key = self.resolve(*h)?;
            if key != self.tree.root() && !keys.contains(&key) {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    pub fn start_drag(&self, handles: &[Handle]) -> Result<DragSession> {
        let sources = self.transfer_keys(handles)?;
        let payload = TransferPayload::new(codec::encode_transfer(&self.tree, &sources));
        log::debug!("event=start_drag module=transfer sources={}", sources.len());
        Ok(DragSession { sources, payload })
    }

    /// Drop `payload` into `parent` at `row` (`None` appends). Returns
    /// `Ok(false)` when the drop is refused; malformed payloads, stale
    /// handles and insertions past the limits are errors and change nothing.
    ///
    /// A move removes the session's sources first and then inserts at the
    /// row the target had among the remaining siblings, so moved objects
    /// keep their ids.
    pub fn drop_mime_data(
        &mut self,
        payload: &TransferPayload,
        action: DropAction,
        row: Option<usize>,
        column: usize,
        parent: Option<Handle>,
        session: Option<&DragSession>,
    ) -> Result<bool> {
        match action {
            DropAction::Ignore => return Ok(true),
            DropAction::Copy | DropAction::Move => {}
            DropAction::Link => {
                log::warn!("event=drop_refused module=transfer reason=action action={:?}", action);
                return Ok(false);
            }
        }
        if !payload.is_supported() {
            log::warn!("event=drop_refused module=transfer reason=format format={}", payload.format);
            return Ok(false);
        }
        if column > 0 {
            log::warn!("event=drop_refused module=transfer reason=column column={}", column);
            return Ok(false);
        }
        let parent = self.resolve_parent(parent)?;
        let moving: &[NodeKey] = match (action, session) {
            (DropAction::Move, Some(s)) => s.sources.as_slice(),
            _ => &[],
        };
        if moving.iter().any(|s| self.tree.is_ancestor_or_self(*s, parent)) {
            log::warn!("event=drop_refused module=transfer reason=into_source");
            return Ok(false);
        }

        let mut objects = codec::decode_transfer(&payload.bytes, &self.registry)?;
        let siblings = self.tree.children(parent);
        let len = siblings.len();
        let shifted = match row {
            Some(r) if r > len => return Err(TreeError::RowOutOfRange { row: r, len }.into()),
            Some(r) => siblings[..r].iter().filter(|k| moving.contains(*k)).count(),
            None => 0,
        };
        self.check_insert(parent, &objects)?;

        let mut removed = 0;
        for key in moving {
            if *key != self.tree.root() && self.remove_key(*key) {
                removed += 1;
            }
        }
        if removed > 0 {
            self.events.push(ModelEvent::Changed);
        }

        for sub in &mut objects {
            self.forget_live_ids(sub);
        }
        let start = match row {
            Some(r) => r - shifted,
            None => self.tree.children(parent).len(),
        };
        let count = objects.len();
        for (i, sub) in objects.into_iter().enumerate() {
            self.insert_at(parent, start + i, vec![sub])?;
        }
        log::debug!("event=drop module=transfer action={:?} inserted={} removed={}", action, count, removed);
        Ok(true)
    }

    /// Ids already in use here would collide, so those objects get fresh
    /// ones on insertion.
    fn forget_live_ids(&self, sub: &mut Subtree) {
        if sub.id.map_or(false, |id| self.ids.is_live(id)) {
            sub.id = None;
        }
        for child in &mut sub.children {
            self.forget_live_ids(child);
        }
    }

    pub fn copy(&self, handles: &[Handle]) -> Result<TransferPayload> {
        self.mime_data(handles)
    }

    /// Copy, then remove the copied objects.
    pub fn cut(&mut self, handles: &[Handle]) -> Result<TransferPayload> {
        let keys = self.transfer_keys(handles)?;
        let payload = TransferPayload::new(codec::encode_transfer(&self.tree, &keys));
        let mut removed = false;
        for key in keys {
            removed |= self.remove_key(key);
        }
        if removed {
            self.events.push(ModelEvent::Changed);
        }
        Ok(payload)
    }

    /// Insert clipboard contents under `parent` at `row` (`None` appends).
    /// Pasted objects always receive fresh ids.
    pub fn paste(&mut self, payload: &TransferPayload, parent: Option<Handle>, row: Option<usize>) -> Result<Vec<Handle>> {
        if !payload.is_supported() {
            return Err(CodecError::WrongFormat(payload.format.clone()).into());
        }
        let parent = self.resolve_parent(parent)?;
        let mut objects = codec::decode_transfer(&payload.bytes, &self.registry)?;
        objects.iter_mut().for_each(Subtree::clear_ids);
        let row = row.unwrap_or_else(|| self.tree.children(parent).len());
        let keys = self.insert_at(parent, row, objects)?;
        log::debug!("event=paste module=transfer objects={}", keys.len());
        Ok(keys.into_iter().filter_map(|k| self.handle_for(k)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectId;
    use crate::objects::{Group, PointObject};

    fn names(doc: &Document) -> Vec<String> {
        doc.children(None).iter().filter_map(|h| doc.data(*h)).map(str::to_owned).collect()
    }

    #[test]
    fn test_refused_drops() {
        let mut doc = Document::new();
        let a = doc.add_named("a", Group);
        let payload = doc.mime_data(&[a]).unwrap();
        assert!(doc.drop_mime_data(&payload, DropAction::Ignore, None, 0, None, None).unwrap());
        assert!(!doc.drop_mime_data(&payload, DropAction::Link, None, 0, None, None).unwrap());
        assert!(!doc.drop_mime_data(&payload, DropAction::Copy, None, 1, None, None).unwrap());
        let foreign = TransferPayload { format: "text/plain".into(), bytes: payload.bytes.clone() };
        assert!(!doc.drop_mime_data(&foreign, DropAction::Copy, None, 0, None, None).unwrap());
        assert_eq!(doc.object_count(), 1);
    }

    #[test]
    fn test_copy_drop_gets_fresh_ids() {
        let mut doc = Document::new();
        let a = doc.add_named("a", PointObject::new());
        let payload = doc.copy(&[a]).unwrap();
        assert!(doc.drop_mime_data(&payload, DropAction::Copy, Some(0), 0, None, None).unwrap());
        assert_eq!(names(&doc), vec!["a", "a"]);
        let first = doc.index(0, 0, None).unwrap();
        assert_eq!(doc.id_of(first), Some(ObjectId(2)));
    }

    #[test]
    fn test_move_into_own_subtree_is_refused() {
        let mut doc = Document::new();
        let g = doc.add_named("g", Group);
        let session = doc.start_drag(&[g]).unwrap();
        let ok = doc
            .drop_mime_data(&session.payload, DropAction::Move, None, 0, Some(g), Some(&session))
            .unwrap();
        assert!(!ok);
        assert_eq!(doc.row_count(Some(g)), 0);
    }

    #[test]
    fn test_cut_then_paste() {
        let mut doc = Document::new();
        let a = doc.add_named("a", Group);
        doc.add_named("b", Group);
        let payload = doc.cut(&[a]).unwrap();
        assert_eq!(names(&doc), vec!["b"]);
        let pasted = doc.paste(&payload, None, None).unwrap();
        assert_eq!(names(&doc), vec!["b", "a"]);
        assert_eq!(doc.id_of(pasted[0]), Some(ObjectId(1)));

        let bad = TransferPayload { format: "image/png".into(), bytes: Vec::new() };
        assert!(doc.paste(&bad, None, None).is_err());
    }
}
