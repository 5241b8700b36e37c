use anyhow::Result;
use std::io::Write;
use std::path::Path;

use crate::api::client::Publisher;
use crate::api::models::{CreatePost, Post};
use crate::commands::Context;
use crate::document::Document;
use crate::util::browser::Browser;

pub async fn run(ctx: &Context, path: &Path, out: &mut dyn Write) -> Result<()> {
    let document = Document::from_file(path)?;
    let client = ctx.connect()?;
    publish_document(&client, &document, ctx.browser.as_ref(), out).await?;
    Ok(())
}

/// Creates a draft from `document` for the token's owner, prints its URL and
/// tries to open it. Failing to open the browser does not fail the publish.
pub async fn publish_document<P: Publisher>(
    publisher: &P,
    document: &Document,
    browser: &dyn Browser,
    out: &mut dyn Write,
) -> Result<Post> {
    let user = publisher.current_user().await?;
    let post = publisher
        .create_post(&user.id, &CreatePost::draft(document))
        .await?;

    writeln!(out, "Post created. URL is {}", post.url)?;

    if let Err(e) = browser.open(&post.url) {
        log::warn!("could not open {} in the browser: {}", post.url, e);
    }

    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ClientError;
    use crate::api::models::{PublishStatus, User};
    use crate::config::settings::Config;
    use crate::util::browser::{BrowserError, MockBrowser};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::tempdir;

    // Records every create_post call
    struct FakePublisher {
        user_id: String,
        created: RefCell<Vec<(String, CreatePost)>>,
    }

    impl FakePublisher {
        fn new(user_id: &str) -> Self {
            Self {
                user_id: user_id.to_string(),
                created: RefCell::new(Vec::new()),
            }
        }
    }

    impl Publisher for FakePublisher {
        async fn current_user(&self) -> Result<User, ClientError> {
            Ok(User {
                id: self.user_id.clone(),
                username: "user".to_string(),
                name: "User".to_string(),
                url: "https://medium.com/@user".to_string(),
                image_url: None,
            })
        }

        async fn create_post(&self, user_id: &str, post: &CreatePost) -> Result<Post, ClientError> {
            let mut created = self.created.borrow_mut();
            created.push((user_id.to_string(), post.clone()));
            Ok(Post {
                id: Some(created.len().to_string()),
                url: format!("https://medium.com/@user/post-{}", created.len()),
                ..Post::default()
            })
        }
    }

    fn sample() -> Document {
        Document {
            title: "Test".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
            content: "Hi there".to_string(),
        }
    }

    fn quiet_browser() -> MockBrowser {
        let mut browser = MockBrowser::new();
        browser.expect_open().returning(|_| Ok(()));
        browser
    }

    #[tokio::test]
    async fn test_every_publish_creates_a_new_post() {
        let publisher = FakePublisher::new("42");
        let browser = quiet_browser();

        let first = publish_document(&publisher, &sample(), &browser, &mut Vec::new())
            .await
            .unwrap();
        let second = publish_document(&publisher, &sample(), &browser, &mut Vec::new())
            .await
            .unwrap();

        assert_ne!(first.url, second.url);
        let created = publisher.created.borrow();
        assert_eq!(created.len(), 2);
        for (user_id, post) in created.iter() {
            assert_eq!(user_id, "42");
            assert_eq!(post.publish_status(), PublishStatus::Draft);
        }
    }

    #[tokio::test]
    async fn test_browser_failure_is_ignored() {
        let publisher = FakePublisher::new("42");
        let mut browser = MockBrowser::new();
        browser.expect_open().times(1).returning(|_| {
            Err(BrowserError::Status {
                command: "xdg-open".to_string(),
                code: Some(4),
            })
        });

        let mut out = Vec::new();
        let post = publish_document(&publisher, &sample(), &browser, &mut out)
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Post created. URL is {}\n", post.url)
        );
    }

    fn context_with_token(dir: &Path, api_url: String, browser: MockBrowser) -> Context {
        let mut config = Config::defaults(dir);
        config.api_url = api_url;
        let ctx = Context::with_browser(config, Box::new(browser));
        ctx.tokens.set("integration-token").unwrap();
        ctx
    }

    async fn mock_medium(server: &MockServer) -> (httpmock::Mock<'_>, httpmock::Mock<'_>) {
        let me = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/me")
                    .header("authorization", "Bearer integration-token");
                then.status(200).json_body(json!({
                    "data": {
                        "id": "42",
                        "username": "user",
                        "name": "User",
                        "url": "https://medium.com/@user"
                    }
                }));
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/users/42/posts")
                    .json_body(json!({
                        "title": "Test",
                        "contentFormat": "markdown",
                        "content": "Hi there",
                        "tags": ["a", "b"],
                        "publishStatus": "draft"
                    }));
                then.status(201).json_body(json!({
                    "data": {
                        "id": "abc123",
                        "authorId": "42",
                        "url": "https://medium.com/@user/test-abc123",
                        "publishStatus": "draft"
                    }
                }));
            })
            .await;
        (me, create)
    }

    #[tokio::test]
    async fn test_publish_file_end_to_end() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("post.md");
        fs::write(&file, "---\ntitle: Test\ntags: [a,b]\n---\nHi there").unwrap();

        let server = MockServer::start_async().await;
        let (me, create) = mock_medium(&server).await;

        let mut browser = MockBrowser::new();
        browser
            .expect_open()
            .withf(|url| url == "https://medium.com/@user/test-abc123")
            .times(1)
            .returning(|_| Ok(()));
        let ctx = context_with_token(dir.path(), server.base_url(), browser);

        let mut out = Vec::new();
        run(&ctx, &file, &mut out).await.unwrap();

        me.assert_async().await;
        create.assert_async().await;
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed, "Post created. URL is https://medium.com/@user/test-abc123\n");
    }

    #[tokio::test]
    async fn test_publishing_twice_hits_the_api_twice() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("post.md");
        fs::write(&file, "---\ntitle: Test\ntags: [a,b]\n---\nHi there").unwrap();

        let server = MockServer::start_async().await;
        let (me, create) = mock_medium(&server).await;
        let ctx = context_with_token(dir.path(), server.base_url(), quiet_browser());

        run(&ctx, &file, &mut Vec::new()).await.unwrap();
        run(&ctx, &file, &mut Vec::new()).await.unwrap();

        me.assert_hits_async(2).await;
        create.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_bad_front_matter_stops_before_any_request() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("broken.md");
        fs::write(&file, "---\ntitle: [oops\n---\nbody").unwrap();

        let server = MockServer::start_async().await;
        let (me, create) = mock_medium(&server).await;
        let mut browser = MockBrowser::new();
        browser.expect_open().never();
        let ctx = context_with_token(dir.path(), server.base_url(), browser);

        let err = run(&ctx, &file, &mut Vec::new()).await.unwrap_err();

        assert!(err.to_string().starts_with("Invalid front matter"));
        me.assert_hits_async(0).await;
        create.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_missing_token_is_guided() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("post.md");
        fs::write(&file, "---\ntitle: Test\n---\nbody").unwrap();

        let server = MockServer::start_async().await;
        let (me, create) = mock_medium(&server).await;

        let mut browser = MockBrowser::new();
        browser
            .expect_open()
            .withf(|url| url == "https://medium.com/me/settings")
            .times(1)
            .returning(|_| Ok(()));
        let mut config = Config::defaults(dir.path());
        config.api_url = server.base_url();
        let ctx = Context::with_browser(config, Box::new(browser));

        let err = run(&ctx, &file, &mut Vec::new()).await.unwrap_err();

        assert!(err.to_string().contains("integration token"));
        me.assert_hits_async(0).await;
        create.assert_hits_async(0).await;
    }
}
