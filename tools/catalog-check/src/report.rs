use careerguess::game::Catalog;
use std::fmt;

/// Coverage statistics for a loaded catalog
#[derive(Debug, Default, PartialEq)]
pub struct CatalogReport {
    pub players: usize,
    pub with_nickname: usize,
    pub with_birth_year: usize,
    /// Players with no position, nationality or birth year, so no hints at all
    pub without_hints: usize,
    pub duplicate_names: usize,
    pub dimension: usize,
}

impl CatalogReport {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let records = catalog.records();
        let mut names = std::collections::HashSet::new();

        Self {
            players: records.len(),
            with_nickname: records.iter().filter(|r| r.has_nickname()).count(),
            with_birth_year: records.iter().filter(|r| r.birth_year.is_some()).count(),
            without_hints: records
                .iter()
                .filter(|r| careerguess::game::core::hints::available_hints(r).is_empty())
                .count(),
            duplicate_names: records
                .iter()
                .filter(|r| !names.insert(r.name.to_lowercase()))
                .count(),
            dimension: catalog.dimension(),
        }
    }
}

impl fmt::Display for CatalogReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Catalog summary:")?;
        writeln!(f, "  Players:              {}", self.players)?;
        writeln!(f, "  With nickname:        {}", self.with_nickname)?;
        writeln!(f, "  With birth year:      {}", self.with_birth_year)?;
        writeln!(f, "  Without any hint:     {}", self.without_hints)?;
        writeln!(f, "  Duplicate names:      {}", self.duplicate_names)?;
        write!(f, "  Embedding dimension:  {}", self.dimension)
    }
}
