use std::fmt;

const HEADER: &[u8] = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n";

/// An indirect object number. Generation is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0 R", self.0)
    }
}

/// A PDF dictionary under construction.
///
/// References added through [`Dict::reference`] and [`Dict::reference_array`]
/// are remembered so the table can check that every one of them resolves.
#[derive(Debug, Default, Clone)]
pub struct Dict {
    entries: Vec<(String, Vec<u8>)>,
    references: Vec<ObjectId>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dictionary whose first entry is `/Type /<kind>`.
    pub fn typed(kind: &str) -> Self {
        Self::new().name("Type", kind)
    }

    /// Adds `/key <raw>`. The value is written verbatim.
    pub fn entry(mut self, key: &str, raw: impl AsRef<[u8]>) -> Self {
        self.entries.push((key.to_string(), raw.as_ref().to_vec()));
        self
    }

    pub fn name(self, key: &str, name: &str) -> Self {
        self.entry(key, format!("/{name}"))
    }

    pub fn number(self, key: &str, value: impl fmt::Display) -> Self {
        self.entry(key, value.to_string())
    }

    pub fn reference(mut self, key: &str, id: ObjectId) -> Self {
        self.references.push(id);
        self.entry(key, id.to_string())
    }

    pub fn reference_array(mut self, key: &str, ids: &[ObjectId]) -> Self {
        self.references.extend_from_slice(ids);
        let inner: Vec<String> = ids.iter().map(ObjectId::to_string).collect();
        self.entry(key, format!("[{}]", inner.join(" ")))
    }

    /// Nests another dictionary, carrying over its references.
    pub fn dict(mut self, key: &str, nested: Dict) -> Self {
        let (bytes, refs) = nested.into_parts();
        self.references.extend(refs);
        self.entry(key, bytes)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = b"<<".to_vec();
        for (key, value) in &self.entries {
            out.extend_from_slice(format!(" /{key} ").as_bytes());
            out.extend_from_slice(value);
        }
        out.extend_from_slice(b" >>");
        out
    }

    fn into_parts(self) -> (Vec<u8>, Vec<ObjectId>) {
        (self.to_bytes(), self.references)
    }
}

/// An arena of indirect objects, numbered sequentially from 1.
///
/// Stream lengths, cross-reference offsets and the trailer `/Size` are all
/// derived from the table itself. A reserved id that is never filled is
/// written as a `null` object, so [`ObjectTable::finish`] cannot emit a
/// dangling reference for an id the table handed out.
#[derive(Debug, Default)]
pub struct ObjectTable {
    objects: Vec<Option<Vec<u8>>>,
    references: Vec<ObjectId>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an id to be filled later with [`ObjectTable::set`].
    /// Needed for forward references such as a page pointing at its parent.
    pub fn reserve(&mut self) -> ObjectId {
        self.objects.push(None);
        ObjectId(self.objects.len() as u32)
    }

    pub fn add(&mut self, dict: Dict) -> ObjectId {
        let id = self.reserve();
        self.set(id, dict);
        id
    }

    /// Fills a reserved slot. Ids from another table are ignored.
    pub fn set(&mut self, id: ObjectId, dict: Dict) {
        let (bytes, refs) = dict.into_parts();
        self.put(id, bytes, refs);
    }

    /// Adds a stream object whose `/Length` is the exact payload size.
    pub fn add_stream(&mut self, dict: Dict, payload: &[u8]) -> ObjectId {
        let (head, refs) = dict.number("Length", payload.len()).into_parts();
        let mut body = head;
        body.extend_from_slice(b"\nstream\n");
        body.extend_from_slice(payload);
        body.extend_from_slice(b"\nendstream");
        let id = self.reserve();
        self.put(id, body, refs);
        id
    }

    fn put(&mut self, id: ObjectId, body: Vec<u8>, refs: Vec<ObjectId>) {
        let Some(slot) = (id.0 as usize).checked_sub(1).and_then(|i| self.objects.get_mut(i)) else {
            log::warn!("[PDF-WRITER] Ignoring object for unknown id {}", id.0);
            return;
        };
        *slot = Some(body);
        self.references.extend(refs);
    }

    /// Number of objects defined, excluding the implicit object 0.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The trailer `/Size`: every defined object plus object 0.
    pub fn trailer_size(&self) -> usize {
        self.objects.len() + 1
    }

    /// References recorded by dictionaries that point at no filled object.
    pub fn unresolved_references(&self) -> Vec<ObjectId> {
        self.references
            .iter()
            .copied()
            .filter(|id| !self.is_defined(*id))
            .collect()
    }

    fn is_defined(&self, id: ObjectId) -> bool {
        (id.0 as usize)
            .checked_sub(1)
            .and_then(|i| self.objects.get(i))
            .is_some_and(Option::is_some)
    }

    /// Serializes header, objects, cross-reference table and trailer.
    pub fn finish(self, root: ObjectId, info: Option<ObjectId>) -> Vec<u8> {
        let unresolved = self.unresolved_references();
        if !unresolved.is_empty() {
            log::warn!("[PDF-WRITER] {} reference(s) resolve to null objects", unresolved.len());
        }

        let size = self.trailer_size();
        let mut out = HEADER.to_vec();
        let mut offsets = Vec::with_capacity(self.objects.len());

        for (index, body) in self.objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
            match body {
                Some(bytes) => out.extend_from_slice(bytes),
                None => out.extend_from_slice(b"null"),
            }
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        out.extend_from_slice(format!("xref\n0 {size}\n").as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }

        let mut trailer = Dict::new().number("Size", size).reference("Root", root);
        if let Some(info) = info {
            trailer = trailer.reference("Info", info);
        }
        out.extend_from_slice(b"trailer\n");
        out.extend_from_slice(&trailer.to_bytes());
        out.extend_from_slice(format!("\nstartxref\n{xref_offset}\n%%EOF\n").as_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_object_table() -> (ObjectTable, ObjectId) {
        let mut table = ObjectTable::new();
        let pages = table.reserve();
        let catalog = table.add(Dict::typed("Catalog").reference("Pages", pages));
        table.set(pages, Dict::typed("Pages").reference_array("Kids", &[]).number("Count", 0));
        (table, catalog)
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let mut table = ObjectTable::new();
        assert_eq!(table.reserve().number(), 1);
        assert_eq!(table.add(Dict::new()).number(), 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.trailer_size(), 3);
    }

    #[test]
    fn stream_length_matches_payload() {
        let mut table = ObjectTable::new();
        let payload = b"BT (a\\)b) Tj ET";
        let id = table.add_stream(Dict::new(), payload);
        let bytes = table.finish(id, None);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains(&format!("/Length {}", payload.len())));
        assert!(text.contains("stream\nBT (a\\)b) Tj ET\nendstream"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let (table, catalog) = two_object_table();
        let bytes = table.finish(catalog, None);
        let text = String::from_utf8_lossy(&bytes).into_owned();

        let startxref: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert!(bytes[startxref..].starts_with(b"xref\n0 3\n"));

        // The binary marker line is not UTF-8, so slice the raw bytes.
        let xref = String::from_utf8_lossy(&bytes[startxref..]).into_owned();
        let entries: Vec<&str> = xref.lines().skip(3).take(2).collect();
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.len(), 19, "entries are 20 bytes with the newline");
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[offset..].starts_with(expected.as_bytes()));
        }
        assert!(text.contains("/Size 3 /Root 2 0 R"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn unfilled_reservation_is_reported_and_written_as_null() {
        let mut table = ObjectTable::new();
        let missing = table.reserve();
        let root = table.add(Dict::typed("Catalog").reference("Pages", missing));
        assert_eq!(table.unresolved_references(), vec![missing]);

        let bytes = table.finish(root, None);
        assert!(String::from_utf8_lossy(&bytes).contains("1 0 obj\nnull\nendobj"));
    }

    #[test]
    fn nested_dict_references_are_tracked() {
        let mut table = ObjectTable::new();
        let font = table.reserve();
        let resources = Dict::new().dict("Font", Dict::new().reference("F1", font));
        table.add(Dict::typed("Page").dict("Resources", resources));
        assert_eq!(table.unresolved_references(), vec![font]);
        table.set(font, Dict::typed("Font"));
        assert!(table.unresolved_references().is_empty());
    }
}
