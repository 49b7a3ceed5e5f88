use std::collections::BTreeMap;

use crate::geometry_indices::MaterialId;

/// Assigns material ids to the material symbols of one geometry.
///
/// Ids are handed out from zero in order of first use. The empty symbol is a
/// symbol like any other.
#[derive(Debug, Clone, Default)]
pub struct MaterialIdInfo {
    ids: BTreeMap<String, MaterialId>,
    next_id: u64,
}

impl MaterialIdInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn material_id(&mut self, symbol: &str) -> MaterialId {
        if let Some(&id) = self.ids.get(symbol) {
            return id;
        }
        let id = MaterialId(self.next_id);
        self.next_id += 1;
        self.ids.insert(symbol.to_string(), id);
        id
    }

    pub fn find(&self, symbol: &str) -> Option<MaterialId> {
        self.ids.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

}
