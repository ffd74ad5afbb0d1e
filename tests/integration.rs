use std::path::{Path, PathBuf};
use std::time::Duration;

use preview_render::render::template_url;
use preview_render::{render, Error, PreviewBrowser, PreviewFields, RenderConfig, RenderJob, SessionConfig};

fn fixture_template() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/template.html")
}

fn config(output: PathBuf) -> RenderConfig {
    RenderConfig {
        title: "T".into(),
        subtitle: "S".into(),
        time: "Tm".into(),
        output,
    }
}

#[tokio::test]
async fn test_render_writes_viewport_sized_png() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.png");

    render(&config(output.clone()), &fixture_template(), SessionConfig::default())
        .await
        .expect("Failed to render");

    let (width, height) = image::image_dimensions(&output).expect("Failed to read output");
    assert_eq!((width, height), (940, 550));
}

#[tokio::test]
async fn test_rendered_text_matches_config() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path().join("out.png"));

    let rendered = render(&cfg, &fixture_template(), SessionConfig::default())
        .await
        .expect("Failed to render");

    assert_eq!(
        rendered,
        PreviewFields {
            time: "Tm".into(),
            title: "T".into(),
            subtitle: "S".into(),
        }
    );
}

#[tokio::test]
async fn test_rerender_is_pixel_identical() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.png");
    let cfg = config(output.clone());

    render(&cfg, &fixture_template(), SessionConfig::default())
        .await
        .expect("First render failed");
    let first = image::open(&output).expect("Failed to open").to_rgba8();

    render(&cfg, &fixture_template(), SessionConfig::default())
        .await
        .expect("Second render failed");
    let second = image::open(&output).expect("Failed to open").to_rgba8();

    assert!(first == second, "re-render changed the image");
}

#[tokio::test]
async fn test_markup_is_injected_as_text() {
    let browser = PreviewBrowser::builder()
        .build()
        .await
        .expect("Failed to launch browser");

    let page = browser.new_page("about:blank").await.expect("Failed to open page");
    let url = template_url(&fixture_template()).unwrap();
    page.goto(url.as_str()).await.expect("Failed to navigate");
    page.wait_for_selector("#title").await.expect("Template never became ready");

    let fields = PreviewFields {
        time: "6 minutes read".into(),
        title: "<b>CRISP-DM</b>".into(),
        subtitle: "Machine Learning & \"Process\"".into(),
    };
    page.fill_fields(&fields).await.expect("Failed to fill fields");

    let title = page.text_content("#title").await.expect("Failed to get text");
    assert_eq!(title, "<b>CRISP-DM</b>");
    assert!(page.find_element("#title b").await.is_err());
    assert_eq!(page.read_fields().await.expect("Failed to read back"), fields);

    browser.close().await.expect("Failed to close browser");
}

#[tokio::test]
async fn test_missing_ready_selector_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("template.html");
    std::fs::write(&template, "<html><body><p id=\"subtitle\"></p></body></html>").unwrap();
    let output = dir.path().join("out.png");

    let session = PreviewBrowser::builder()
        .timeout(Duration::from_millis(500))
        .build_config();
    let err = render(&config(output.clone()), &template, session)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout(_)), "unexpected error: {err}");
    assert!(!output.exists());
}

#[tokio::test]
async fn test_missing_output_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing").join("out.png");

    let err = render(&config(output.clone()), &fixture_template(), SessionConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ScreenshotError(_)), "unexpected error: {err}");
    assert!(!output.exists());
}

#[tokio::test]
async fn test_job_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("post.png");
    std::fs::write(
        dir.path().join("post.json"),
        serde_json::to_string(&config(output.clone())).unwrap(),
    )
    .unwrap();

    let rendered = RenderJob::load(dir.path().join("post"))
        .await
        .expect("Failed to load config")
        .template(fixture_template())
        .run()
        .await
        .expect("Failed to render");

    assert_eq!(rendered.title, "T");
    assert!(output.exists());
}

#[tokio::test]
async fn test_unresolvable_config_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();

    let err = RenderJob::load(dir.path().join("absent")).await.err().expect("load should fail");
    assert!(matches!(err, Error::Config { .. }), "unexpected error: {err}");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
