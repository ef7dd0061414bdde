//! Links to other universes and drill-down hierarchies.

/// A reference from this universe to another universe file.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    pub linked_universe: Option<String>,
}

/// A named ordered sequence of object ids defining drill levels.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    pub levels: Vec<u32>,
}
