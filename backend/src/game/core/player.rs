use serde::Serialize;

/// A football player from the catalog. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    pub name: String,
    pub career_path: String,
    pub position: String,
    pub nationality: String,
    pub birth_year: Option<u16>,
    pub nickname: String,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>, career_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            career_path: career_path.into(),
            ..Self::default()
        }
    }

    pub fn has_nickname(&self) -> bool {
        !self.nickname.is_empty()
    }
}
