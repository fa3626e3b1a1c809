use std::fmt;

use super::model::Table;

// ---------------------------------------------------------------------------
// Column names of the joined dataset
// ---------------------------------------------------------------------------

pub const COL_REGION: &str = "Region";
pub const COL_ESTABLISHMENT_TYPE: &str = "Type_etablissement";
pub const COL_DEPARTMENT: &str = "Libelle_departement";
pub const COL_COMMUNE: &str = "Nom_commune";
pub const COL_ESTABLISHMENT: &str = "Nom_etablissement";
pub const COL_YEAR: &str = "Annee";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";

/// Prefix shared by every per-specialty success-rate column.
pub const RATE_PREFIX: &str = "Taux de reussite - ";

// ---------------------------------------------------------------------------
// Specialty – the closed enumeration of academic tracks
// ---------------------------------------------------------------------------

/// Baccalauréat series / track. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specialty {
    AllSeries,
    L,
    Es,
    S,
    General,
    Sti2d,
    Std2a,
    Stmg,
    Stl,
    St2s,
    S2tmd,
    Sthr,
}

impl Specialty {
    pub const ALL: [Specialty; 12] = [
        Specialty::AllSeries,
        Specialty::L,
        Specialty::Es,
        Specialty::S,
        Specialty::General,
        Specialty::Sti2d,
        Specialty::Std2a,
        Specialty::Stmg,
        Specialty::Stl,
        Specialty::St2s,
        Specialty::S2tmd,
        Specialty::Sthr,
    ];

    /// Label as it appears in the data files and in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Specialty::AllSeries => "Toutes series",
            Specialty::L => "L",
            Specialty::Es => "ES",
            Specialty::S => "S",
            Specialty::General => "Gnle",
            Specialty::Sti2d => "STI2D",
            Specialty::Std2a => "STD2A",
            Specialty::Stmg => "STMG",
            Specialty::Stl => "STL",
            Specialty::St2s => "ST2S",
            Specialty::S2tmd => "S2TMD",
            Specialty::Sthr => "STHR",
        }
    }

    /// Name of the success-rate column for this specialty.
    pub fn rate_column(self) -> String {
        format!("{RATE_PREFIX}{}", self.label())
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SpecialtyColumns – specialty → column, resolved against a schema
// ---------------------------------------------------------------------------

/// Rate column for each specialty, or `None` when the table lacks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialtyColumns {
    columns: [Option<String>; 12],
}

impl SpecialtyColumns {
    pub fn resolve(table: &Table) -> Self {
        let columns = Specialty::ALL.map(|s| {
            let name = s.rate_column();
            table.has_column(&name).then_some(name)
        });
        SpecialtyColumns { columns }
    }

    pub fn column(&self, specialty: Specialty) -> Option<&str> {
        self.columns[specialty.index()].as_deref()
    }

    /// Specialties whose column is missing from the schema.
    pub fn missing(&self) -> Vec<Specialty> {
        Specialty::ALL
            .into_iter()
            .filter(|s| self.column(*s).is_none())
            .collect()
    }
}
