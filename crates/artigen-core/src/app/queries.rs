use artigen_domain::{ArtifactType, PromptTemplate};
use serde_json::Value;

use crate::content::{ContentStore, PromptTemplateStore, ARTIFACT_TYPE_KEY};
use crate::errors::RepositoryError;
use crate::repo::Criteria;

/// Consulta de plantillas: por id, por criterios o todas (en ese orden de
/// precedencia). Criterios vacíos equivalen a "todas".
#[derive(Debug, Clone, Default)]
pub struct GetPromptTemplateQuery {
    pub identifier: Option<String>,
    pub criteria: Option<Criteria>,
}

impl GetPromptTemplateQuery {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self { identifier: Some(id.into()), criteria: None }
    }

    pub fn by_artifact_type(kind: ArtifactType) -> Self {
        Self { identifier: None,
               criteria: Some(Criteria::new().with(ARTIFACT_TYPE_KEY, kind.as_str())) }
    }

    pub fn execute(&self, store: &PromptTemplateStore) -> Result<Vec<PromptTemplate>, RepositoryError> {
        if let Some(id) = &self.identifier {
            return Ok(store.load(id)?.into_iter().collect());
        }
        match &self.criteria {
            Some(c) if !c.is_empty() => store.find_by(c),
            _ => store.all(),
        }
    }
}

/// Contexto de un tipo de artifact, opcionalmente filtrado.
#[derive(Debug, Clone)]
pub struct GetContextQuery {
    pub artifact_type: ArtifactType,
    pub criteria: Option<Criteria>,
}

impl GetContextQuery {
    pub fn new(artifact_type: ArtifactType) -> Self {
        Self { artifact_type, criteria: None }
    }

    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    pub fn execute(&self, store: &ContentStore) -> Result<Vec<Value>, RepositoryError> {
        match &self.criteria {
            Some(c) => store.get_content_where(self.artifact_type, c),
            None => store.get_content(self.artifact_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::InMemoryRecordStore;
    use serde_json::{json, Map};

    #[test]
    fn template_query_precedence() {
        let store = PromptTemplateStore::new(Box::new(InMemoryRecordStore::new()));
        let a = PromptTemplate::new("a", "d", "i", vec![], json!({}));
        let b = PromptTemplate::new("b", "d", "i", vec![], json!({}));
        let id_a = store.register(ArtifactType::Stakeholder, &a).unwrap();
        store.register(ArtifactType::UseCase, &b).unwrap();

        assert_eq!(GetPromptTemplateQuery::by_id(&id_a).execute(&store).unwrap(), vec![a.clone()]);
        assert!(GetPromptTemplateQuery::by_id("nope").execute(&store).unwrap().is_empty());
        assert_eq!(GetPromptTemplateQuery::by_artifact_type(ArtifactType::UseCase).execute(&store).unwrap(),
                   vec![b.clone()]);
        assert_eq!(GetPromptTemplateQuery::default().execute(&store).unwrap(), vec![a, b]);
    }

    #[test]
    fn context_query_with_criteria() {
        let store = ContentStore::new(Box::new(InMemoryRecordStore::new()));
        let mut m = Map::new();
        m.insert("type".into(), json!("stakeholder"));
        m.insert("segment".into(), json!("interno"));
        store.save(json!("s-int"), m).unwrap();
        store.update_content(ArtifactType::UseCase, vec![json!("uc")]).unwrap();
        let mut m = Map::new();
        m.insert("type".into(), json!("stakeholder"));
        m.insert("segment".into(), json!("externo"));
        store.save(json!("s-ext"), m).unwrap();

        let all = GetContextQuery::new(ArtifactType::Stakeholder).execute(&store).unwrap();
        assert_eq!(all, vec![json!("s-int"), json!("s-ext")]);
        let ext = GetContextQuery::new(ArtifactType::Stakeholder).with_criteria(Criteria::new().with("segment", "externo"))
                                                                  .execute(&store)
                                                                  .unwrap();
        assert_eq!(ext, vec![json!("s-ext")]);
    }
}
