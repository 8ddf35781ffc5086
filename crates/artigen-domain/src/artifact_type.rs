//! Conjunto cerrado de tipos de artifact.
//!
//! El tag textual (`snake_case`) es a la vez clave de partición en el
//! `ContentStore` y referencia de dependencia dentro de un `PromptTemplate`.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    Questionnaire,
    Stakeholder,
    EmpathyMap,
    ValueProposition,
    UserStory,
    UseCase,
    ProcessModel,
    DataModel,
}

impl ArtifactType {
    pub const ALL: [ArtifactType; 8] = [ArtifactType::Questionnaire,
                                        ArtifactType::Stakeholder,
                                        ArtifactType::EmpathyMap,
                                        ArtifactType::ValueProposition,
                                        ArtifactType::UserStory,
                                        ArtifactType::UseCase,
                                        ArtifactType::ProcessModel,
                                        ArtifactType::DataModel];

    /// Tag estable usado en el almacenamiento.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactType::Questionnaire => "questionnaire",
            ArtifactType::Stakeholder => "stakeholder",
            ArtifactType::EmpathyMap => "empathy_map",
            ArtifactType::ValueProposition => "value_proposition",
            ArtifactType::UserStory => "user_story",
            ArtifactType::UseCase => "use_case",
            ArtifactType::ProcessModel => "process_model",
            ArtifactType::DataModel => "data_model",
        }
    }
}

impl FromStr for ArtifactType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactType::ALL.iter()
                         .copied()
                         .find(|t| t.as_str() == s)
                         .ok_or_else(|| DomainError::UnknownArtifactType(s.to_string()))
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_back_to_the_same_variant() {
        for t in ArtifactType::ALL {
            assert_eq!(t.as_str().parse::<ArtifactType>().unwrap(), t);
        }
    }

    #[test]
    fn serde_uses_the_storage_tag() {
        let v = serde_json::to_value(ArtifactType::EmpathyMap).unwrap();
        assert_eq!(v, serde_json::json!("empathy_map"));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "persona".parse::<ArtifactType>().unwrap_err();
        assert_eq!(err, DomainError::UnknownArtifactType("persona".into()));
        assert_eq!(err.to_string(), "Tipo de artifact desconocido: persona");
    }
}
