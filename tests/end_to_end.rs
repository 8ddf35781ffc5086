//! Pipeline completo sobre backends durables (JSON y SQLite).
use std::sync::Arc;
use std::thread;

use artigen_core::{GenerationError, PipelineStage};
use artigen_domain::GeneratedContent;
use artigen_rust::{content_service, ArtifactType, BackendKind, EchoGenerator, GenerationRequest, PipelineError, Project,
                   Prompt, PromptTemplate, StoreConfig, Stores};
use serde_json::{json, Value};
use tempfile::TempDir;

const BACKENDS: [BackendKind; 2] = [BackendKind::Json, BackendKind::Sql];

fn open(kind: BackendKind) -> (TempDir, Stores) {
    let dir = tempfile::tempdir().unwrap();
    let stores = Stores::open(&StoreConfig::new(kind, dir.path())).unwrap();
    (dir, stores)
}

fn use_case_template() -> PromptTemplate {
    PromptTemplate::new("Casos de uso",
                        "Un caso de uso por historia y proceso",
                        "Describe el caso de uso",
                        vec![ArtifactType::UserStory, ArtifactType::ProcessModel],
                        json!({"actor": "", "flujo": []}))
}

fn tag(p: &Prompt) -> Result<GeneratedContent, GenerationError> {
    Ok(GeneratedContent::new(p.id, json!({"desde": p.context})))
}

#[test]
fn generated_content_follows_context_order_on_every_backend() {
    for kind in BACKENDS {
        let (_dir, stores) = open(kind);
        stores.templates.register(ArtifactType::UseCase, &use_case_template()).unwrap();
        stores.content
              .update_content(ArtifactType::ProcessModel, vec![json!("p1")])
              .unwrap();
        stores.content
              .update_content(ArtifactType::UserStory, vec![json!("h1"), json!("h2")])
              .unwrap();

        let out = content_service(&stores, tag).generate_artifact_content(&GenerationRequest::new("proj",
                                                                                                  ArtifactType::UseCase))
                                               .unwrap();
        let sources: Vec<Value> = out.generated.iter().map(|g| g.content["desde"].clone()).collect();
        assert_eq!(sources, vec![json!("h1"), json!("h2"), json!("p1")], "{kind}");

        let persisted = stores.content.get_content(ArtifactType::UseCase).unwrap();
        let expected: Vec<Value> = out.generated.iter().map(GeneratedContent::to_value).collect();
        assert_eq!(persisted, expected, "{kind}");
        assert_eq!(out.persisted_ids.len(), 3, "{kind}");
    }
}

#[test]
fn rerun_replaces_previous_generation() {
    for kind in BACKENDS {
        let (_dir, stores) = open(kind);
        stores.templates.register(ArtifactType::UseCase, &use_case_template()).unwrap();
        stores.content
              .update_content(ArtifactType::UserStory, vec![json!("a"), json!("b")])
              .unwrap();
        let service = content_service(&stores, EchoGenerator);
        let request = GenerationRequest::new("proj", ArtifactType::UseCase);
        service.generate_artifact_content(&request).unwrap();

        stores.content.update_content(ArtifactType::UserStory, vec![json!("c")]).unwrap();
        let second = service.generate_artifact_content(&request).unwrap();

        let persisted = stores.content.get_content(ArtifactType::UseCase).unwrap();
        assert_eq!(persisted.len(), 1, "{kind}");
        assert_eq!(persisted[0]["id"], json!(second.generated[0].prompt_id.to_string()), "{kind}");
    }
}

#[test]
fn missing_template_leaves_store_untouched() {
    for kind in BACKENDS {
        let (_dir, stores) = open(kind);
        stores.content.update_content(ArtifactType::UserStory, vec![json!("h")]).unwrap();
        let before = stores.content.get_all().unwrap();

        let err = content_service(&stores, EchoGenerator).generate_artifact_content(&GenerationRequest::new("proj",
                                                                                                           ArtifactType::DataModel))
                                                         .unwrap_err();
        assert_eq!(err, PipelineError::NoTemplate(ArtifactType::DataModel), "{kind}");
        assert_eq!(stores.content.get_all().unwrap(), before, "{kind}");
    }
}

#[test]
fn generation_failure_persists_nothing() {
    let (_dir, stores) = open(BackendKind::Json);
    stores.templates.register(ArtifactType::UseCase, &use_case_template()).unwrap();
    stores.content.update_content(ArtifactType::UserStory, vec![json!("h")]).unwrap();
    stores.content.update_content(ArtifactType::UseCase, vec![json!("previo")]).unwrap();

    let failing = |_: &Prompt| -> Result<GeneratedContent, GenerationError> { Err(GenerationError::new("timeout")) };
    let err = content_service(&stores, failing).generate_artifact_content(&GenerationRequest::new("proj",
                                                                                                  ArtifactType::UseCase))
                                               .unwrap_err();
    assert!(matches!(err, PipelineError::Generation(_)));
    assert_eq!(stores.content.get_content(ArtifactType::UseCase).unwrap(), vec![json!("previo")]);
}

#[test]
fn questionnaire_seeds_downstream_artifacts() {
    let (dir, stores) = open(BackendKind::Sql);
    let project = Project::new("Tienda", "Tienda online", stores.content.clone());
    project.initialize_with_questionnaire(json!({"rubro": "retail"})).unwrap();
    project.initialize_with_questionnaire(json!({"rubro": "moda"})).unwrap();
    stores.templates
          .register(ArtifactType::Stakeholder,
                    &PromptTemplate::new("Stakeholders", "d", "i", vec![ArtifactType::Questionnaire], json!({})))
          .unwrap();

    let out = content_service(&stores, tag).generate_artifact_content(&GenerationRequest::new(project.id.to_string(),
                                                                                              ArtifactType::Stakeholder))
                                           .unwrap();
    assert_eq!(out.context_items, 1);
    assert_eq!(out.generated[0].content, json!({"desde": {"rubro": "moda"}}));
    drop(stores);

    // Lo persistido sobrevive a reabrir los stores.
    let reopened = Stores::open(&StoreConfig::new(BackendKind::Sql, dir.path())).unwrap();
    assert_eq!(reopened.content.get_content(ArtifactType::Stakeholder).unwrap().len(), 1);
}

#[test]
fn pipeline_stages_render_as_snake_case() {
    assert_eq!(PipelineStage::LookupTemplate.to_string(), "lookup_template");
    assert_eq!(PipelineStage::PersistContent.to_string(), "persist_content");
}

#[test]
fn concurrent_readers_never_see_a_mixed_collection() {
    let (_dir, stores) = open(BackendKind::Json);
    let content = stores.content.clone();
    let old = vec![json!("a"), json!("b"), json!("c")];
    let new = vec![json!("x"), json!("y")];
    content.update_content(ArtifactType::Stakeholder, old.clone()).unwrap();

    let writer = {
        let content = Arc::clone(&content);
        let (old, new) = (old.clone(), new.clone());
        thread::spawn(move || {
            for i in 0..20 {
                let items = if i % 2 == 0 { new.clone() } else { old.clone() };
                content.update_content(ArtifactType::Stakeholder, items).unwrap();
            }
        })
    };
    let readers: Vec<_> = (0..3).map(|_| {
                                    let content = Arc::clone(&content);
                                    let (old, new) = (old.clone(), new.clone());
                                    thread::spawn(move || {
                                        for _ in 0..20 {
                                            let seen = content.get_content(ArtifactType::Stakeholder).unwrap();
                                            assert!(seen == old || seen == new, "mixed read: {seen:?}");
                                        }
                                    })
                                })
                                .collect();
    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }
}
