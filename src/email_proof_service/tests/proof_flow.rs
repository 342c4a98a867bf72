use chrono::{TimeDelta, TimeZone, Utc};
use email_proof_adapters::{HashSetUserDirectory, ManualClock, MockEmailClient};
use email_proof_application::{
    KeyLayout, ProofPurpose, RequestProofCodeError, StoreOptions, VerifyProofCodeError, WriteMode,
};
use email_proof_core::{EmailAddress, ProofCodeStore};
use email_proof_service::{
    EmailProofService, InMemoryProofCodeStore, helpers::in_memory_proof_code_store_with_clock,
};
use fake::{Fake, faker::internet::en::SafeEmail};

type TestService =
    EmailProofService<InMemoryProofCodeStore<ManualClock>, HashSetUserDirectory, MockEmailClient>;

struct TestApp {
    service: TestService,
    clock: ManualClock,
    directory: HashSetUserDirectory,
    email_client: MockEmailClient,
}

impl TestApp {
    fn new(options: StoreOptions) -> Self {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        let directory = HashSetUserDirectory::new();
        let email_client = MockEmailClient::new();
        let store = in_memory_proof_code_store_with_clock(clock.clone(), options);

        Self {
            service: EmailProofService::new(store, directory.clone(), email_client.clone()),
            clock,
            directory,
            email_client,
        }
    }

    fn store(&self) -> &InMemoryProofCodeStore<ManualClock> {
        self.service.proof_code_store()
    }

    async fn last_code(&self) -> String {
        let sent = self.email_client.sent().await;
        let content = &sent.last().expect("no email was sent").content;
        content
            .strip_prefix("Your code: ")
            .expect("unexpected email content")
            .to_string()
    }
}

fn all_options() -> Vec<StoreOptions> {
    let mut options = Vec::new();
    for layout in [KeyLayout::Shared, KeyLayout::PerEmail] {
        for mode in [WriteMode::LastWriterWins, WriteMode::CompareAndSwap] {
            options.push(StoreOptions::default().with_key_layout(layout).with_write_mode(mode));
        }
    }
    options
}

fn next_in_range(code: u32) -> u32 {
    if code == 9999 { 1000 } else { code + 1 }
}

#[tokio::test]
async fn test_scenario_holds_for_every_layout_and_write_mode() {
    for options in all_options() {
        let app = TestApp::new(options.clone());
        let store = app.store();

        let c1 = store.generate_proof_code("a@x.com").await.unwrap().value();
        assert!((1000..=9999).contains(&c1), "{options:?}");
        assert!(store.contains("a@x.com").await.unwrap(), "{options:?}");
        assert!(store.validate_proof_code("a@x.com", c1).await.unwrap());
        assert!(!store.validate_proof_code("a@x.com", next_in_range(c1)).await.unwrap());

        store.delete_proof_code("a@x.com").await.unwrap();
        assert!(!store.contains("a@x.com").await.unwrap(), "{options:?}");
        assert!(!store.validate_proof_code("a@x.com", c1).await.unwrap());
    }
}

#[tokio::test]
async fn test_registration_flow_mails_a_code_that_verifies() {
    let app = TestApp::new(StoreOptions::default());
    let raw: String = SafeEmail().fake();
    let email = EmailAddress::parse(raw.clone()).unwrap();

    app.service
        .request_proof_code(ProofPurpose::Registration, email.clone())
        .await
        .unwrap();

    let sent = app.email_client.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, raw);

    let code = app.last_code().await;
    app.service.verify_proof_code(&email, &code).await.unwrap();
    // Verification does not consume the code.
    let shouted = EmailAddress::parse(format!("  {}", raw.to_uppercase())).unwrap();
    app.service.verify_proof_code(&shouted, &code).await.unwrap();
}

#[tokio::test]
async fn test_resend_is_refused_until_code_is_deleted_or_expired() {
    let app = TestApp::new(StoreOptions::default());
    let email = EmailAddress::parse("a@x.com").unwrap();

    app.service
        .request_proof_code(ProofPurpose::Registration, email.clone())
        .await
        .unwrap();

    let result = app
        .service
        .request_proof_code(ProofPurpose::Registration, email.clone())
        .await;
    assert!(matches!(result, Err(RequestProofCodeError::ResendTooSoon)));

    app.service.delete_proof_code("a@x.com").await.unwrap();
    app.service
        .request_proof_code(ProofPurpose::Registration, email.clone())
        .await
        .unwrap();

    app.clock.advance(TimeDelta::seconds(301));
    app.service
        .request_proof_code(ProofPurpose::Registration, email)
        .await
        .unwrap();

    assert_eq!(app.email_client.sent().await.len(), 3);
}

#[tokio::test]
async fn test_code_expires_after_validity_window() {
    let app = TestApp::new(StoreOptions::default());
    let email = EmailAddress::parse("a@x.com").unwrap();

    app.service
        .request_proof_code(ProofPurpose::Registration, email.clone())
        .await
        .unwrap();
    let code = app.last_code().await;

    app.clock.advance(TimeDelta::seconds(299));
    app.service.verify_proof_code(&email, &code).await.unwrap();

    app.clock.advance(TimeDelta::seconds(2));
    let result = app.service.verify_proof_code(&email, &code).await;
    assert!(matches!(result, Err(VerifyProofCodeError::InvalidProofCode)));
    assert!(app.service.list_valid_proof_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_directory_rules_per_purpose() {
    let app = TestApp::new(StoreOptions::default().with_key_layout(KeyLayout::PerEmail));
    let known = EmailAddress::parse("known@x.com").unwrap();
    let unknown = EmailAddress::parse("unknown@x.com").unwrap();
    app.directory.add_user(&known).await;

    let result = app
        .service
        .request_proof_code(ProofPurpose::Registration, known.clone())
        .await;
    assert!(matches!(result, Err(RequestProofCodeError::EmailAlreadyRegistered)));

    let result = app
        .service
        .request_proof_code(ProofPurpose::ChangePassword, unknown.clone())
        .await;
    assert!(matches!(result, Err(RequestProofCodeError::UserNotFound)));

    app.service
        .request_proof_code(ProofPurpose::ChangePassword, known)
        .await
        .unwrap();
    app.service
        .request_proof_code(ProofPurpose::ChangeEmail, unknown)
        .await
        .unwrap();

    let mut listed: Vec<String> = app
        .service
        .list_valid_proof_items()
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.email)
        .collect();
    listed.sort();
    assert_eq!(listed, ["known@x.com", "unknown@x.com"]);
}

#[tokio::test]
async fn test_malformed_submission_is_rejected_before_lookup() {
    let app = TestApp::new(StoreOptions::default());

    let email = EmailAddress::parse("a@x.com").unwrap();

    let result = app.service.verify_proof_code(&email, "12a4").await;
    assert!(matches!(result, Err(VerifyProofCodeError::MalformedProofCode(_))));
}
