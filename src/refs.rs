use pdf_writer::Ref;
use std::collections::HashMap;

/// The kinds of indirect objects a document is made of. A document only ever has one
/// font, so the font objects aren't indexed.
#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
pub enum RefType {
    Catalog,
    Info,
    PageTree,
    Page(usize),
    ContentForPage(usize),
    Font,
    CidFont,
    FontDescriptor,
    FontData,
    ToUnicode,
}

/// Hands out object ids as the document is written. Each kind of object may only be
/// generated once.
pub struct ObjectReferences {
    refs: HashMap<RefType, Ref>,
    next_id: i32,
}

impl ObjectReferences {
    pub fn new() -> ObjectReferences {
        ObjectReferences {
            refs: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn gen(&mut self, ref_type: RefType) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        let previous = self.refs.insert(ref_type, id);
        debug_assert!(previous.is_none(), "{ref_type:?} generated twice");
        id
    }
}
