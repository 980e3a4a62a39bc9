use super::*;
use crate::services::{ContentPart, GenerationReply, InlineData};
use crate::store::MemoryStore;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tempfile::TempDir;

/// Scripted image service: answers calls from a queue and records every
/// prompt it was given, in order.
struct MockImageService {
    script: Mutex<VecDeque<Result<GenerationReply>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockImageService {
    fn new(script: Vec<Result<GenerationReply>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageService for MockImageService {
    async fn generate_image(&self, prompt: &str) -> Result<GenerationReply> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(image_reply(b"unscripted", Some("image/png"))))
    }
}

fn image_reply(bytes: &[u8], mime: Option<&str>) -> GenerationReply {
    GenerationReply {
        parts: vec![
            ContentPart {
                text: Some("here you go".to_string()),
                inline_data: None,
            },
            ContentPart {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: mime.map(String::from),
                    bytes: bytes.to_vec(),
                }),
            },
        ],
    }
}

struct Fixture {
    _temp_dir: TempDir,
    ctx: SessionContext,
    session: Session,
    registry: PresetRegistry,
}

fn fixture(slot_count: usize, prompts: &[&str]) -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let ctx = SessionContext::at_root(temp_dir.path());
    std::fs::create_dir_all(&ctx.session_dir).unwrap();

    let mut session =
        Session::from_store(Box::new(MemoryStore::new()), ctx.images_dir()).unwrap();
    session.set_slot_count(slot_count).unwrap();
    for (index, prompt) in prompts.iter().enumerate() {
        session.set_prompt(index, *prompt).unwrap();
    }

    Fixture {
        _temp_dir: temp_dir,
        ctx,
        session,
        registry: PresetRegistry::builtin(),
    }
}

#[tokio::test]
async fn batch_skips_blank_slots_without_error() {
    let mut fx = fixture(3, &["a", "", "c"]);
    let service = MockImageService::new(vec![]);
    let mut orchestrator =
        Orchestrator::new(&mut fx.session, &fx.registry, &service, true);

    orchestrator.generate_all(&fx.ctx).await.unwrap();

    assert_eq!(orchestrator.state(), &BatchState::Completed);
    drop(orchestrator);
    let prompts = service.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains(". a."));
    assert!(prompts[1].contains(". c."));
    assert!(fx.session.slots.slot(0).image.is_some());
    assert!(fx.session.slots.slot(1).image.is_none());
    assert!(fx.session.slots.slot(2).image.is_some());
}

#[tokio::test]
async fn batch_is_fail_fast_and_keeps_earlier_results() {
    let mut fx = fixture(3, &["a", "b", "c"]);
    let service = MockImageService::new(vec![
        Ok(image_reply(b"first", Some("image/png"))),
        Err(CarouselError::Service("boom".to_string())),
    ]);
    let mut orchestrator =
        Orchestrator::new(&mut fx.session, &fx.registry, &service, true);

    let err = orchestrator.generate_all(&fx.ctx).await.unwrap_err();

    assert!(matches!(err, CarouselError::Service(_)));
    assert_eq!(orchestrator.state(), &BatchState::Aborted { at: 1 });
    drop(orchestrator);
    // Slot 0 keeps its image, slot 2 was never attempted.
    assert_eq!(service.calls(), 2);
    assert!(fx.session.slots.slot(0).image.is_some());
    assert!(fx.session.slots.slot(1).image.is_none());
    assert!(fx.session.slots.slot(2).image.is_none());
}

#[tokio::test]
async fn batch_only_covers_active_slots() {
    let mut fx = fixture(1, &["first", "second hidden", "third hidden"]);
    let service = MockImageService::new(vec![]);
    let mut orchestrator =
        Orchestrator::new(&mut fx.session, &fx.registry, &service, true);

    orchestrator.generate_all(&fx.ctx).await.unwrap();

    assert_eq!(service.calls(), 1);
}

#[tokio::test]
async fn batch_appends_one_snapshot_even_on_failure() {
    let mut fx = fixture(1, &["a"]);
    let service =
        MockImageService::new(vec![Err(CarouselError::Service("down".to_string()))]);
    let mut orchestrator =
        Orchestrator::new(&mut fx.session, &fx.registry, &service, true);

    let _ = orchestrator.generate_all(&fx.ctx).await;

    let snapshots = crate::session::read_snapshots(&fx.ctx).unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].prompts[0], "a");
}

#[tokio::test]
async fn missing_credential_is_rethrown_when_raising() {
    let mut fx = fixture(1, &["a"]);
    let service = MockImageService::new(vec![]);
    let mut orchestrator =
        Orchestrator::new(&mut fx.session, &fx.registry, &service, false);

    let err = orchestrator.generate_slot(0, true).await.unwrap_err();
    assert!(matches!(err, CarouselError::CredentialMissing));
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn handled_failure_is_not_rethrown() {
    let mut fx = fixture(1, &["a"]);
    let service =
        MockImageService::new(vec![Err(CarouselError::Service("down".to_string()))]);
    let mut orchestrator =
        Orchestrator::new(&mut fx.session, &fx.registry, &service, true);

    orchestrator.generate_slot(0, false).await.unwrap();
    drop(orchestrator);
    assert!(fx.session.slots.slot(0).image.is_none());
}

#[tokio::test]
async fn blank_prompt_on_direct_generate_is_empty_prompt() {
    let mut fx = fixture(3, &["", "", ""]);
    let service = MockImageService::new(vec![]);
    let mut orchestrator =
        Orchestrator::new(&mut fx.session, &fx.registry, &service, true);

    let err = orchestrator.generate_slot(1, true).await.unwrap_err();
    assert!(matches!(err, CarouselError::EmptyPrompt { slot: 2 }));
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn loading_flag_is_cleared_on_success_and_failure() {
    let mut fx = fixture(3, &["a", "b", ""]);
    let service = MockImageService::new(vec![
        Ok(image_reply(b"ok", Some("image/png"))),
        Err(CarouselError::Service("down".to_string())),
    ]);
    let mut orchestrator =
        Orchestrator::new(&mut fx.session, &fx.registry, &service, true);

    orchestrator.generate_slot(0, true).await.unwrap();
    let _ = orchestrator.generate_slot(1, true).await;
    drop(orchestrator);

    assert!(!fx.session.slots.slot(0).loading);
    assert!(!fx.session.slots.slot(1).loading);
}

#[tokio::test]
async fn missing_mime_defaults_to_png_on_disk() {
    let mut fx = fixture(1, &["a"]);
    let service = MockImageService::new(vec![Ok(image_reply(b"raw", None))]);
    let mut orchestrator =
        Orchestrator::new(&mut fx.session, &fx.registry, &service, true);

    orchestrator.generate_slot(0, true).await.unwrap();
    drop(orchestrator);

    assert_eq!(fx.session.slots.slot(0).image.as_ref().unwrap().mime, "image/png");
    assert!(fx.ctx.images_dir().join("slot_1.png").is_file());
}

#[tokio::test]
async fn regeneration_overwrites_previous_result() {
    let mut fx = fixture(1, &["a"]);
    let service = MockImageService::new(vec![
        Ok(image_reply(b"first", Some("image/png"))),
        Ok(image_reply(b"second", Some("image/png"))),
    ]);
    let mut orchestrator =
        Orchestrator::new(&mut fx.session, &fx.registry, &service, true);

    orchestrator.generate_slot(0, true).await.unwrap();
    orchestrator.generate_slot(0, true).await.unwrap();
    drop(orchestrator);

    assert_eq!(
        fx.session.slots.slot(0).image.as_ref().unwrap().bytes,
        b"second".to_vec()
    );
}
