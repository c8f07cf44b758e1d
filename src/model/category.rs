//! Folder categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category tag on folders and users.
///
/// A new user is automatically granted access to every folder of the
/// category they are created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Independent professionals.
    #[default]
    ProfesionalIndependiente,
    /// School transport operators.
    TransporteEscolar,
    /// Insurance agents.
    EncargadorSeguros,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [
        Category::ProfesionalIndependiente,
        Category::TransporteEscolar,
        Category::EncargadorSeguros,
    ];

    /// Wire representation used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ProfesionalIndependiente => "profesional_independiente",
            Category::TransporteEscolar => "transporte_escolar",
            Category::EncargadorSeguros => "encargador_seguros",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}
