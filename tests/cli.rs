use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::json;
use tibber_svg::cli::{self, Cli};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const BUNDLED_TEMPLATE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/template.svg.jinja2");

fn out_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tibber-svg-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn cli(api_url: &str, template: &Path, out_dir: Option<&Path>) -> Cli {
    let mut args = vec![
        "tibber-svg".to_owned(),
        "--access-token".to_owned(),
        "secret".to_owned(),
        "--template".to_owned(),
        template.display().to_string(),
        "--api-url".to_owned(),
        api_url.to_owned(),
    ];
    if let Some(out_dir) = out_dir {
        args.push("--split".to_owned());
        args.push("--out-dir".to_owned());
        args.push(out_dir.display().to_string());
    }

    Cli::try_parse_from(args).unwrap()
}

async fn price_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "viewer": { "homes": [{ "currentSubscription": { "priceInfo": {
                "current": { "total": 0.2567, "level": "NORMAL" },
                "today": [
                    { "total": 0.10, "startsAt": "2024-01-01T00:00:00.000+01:00" },
                    { "total": 0.40, "startsAt": "2024-01-01T01:00:00.000+01:00" }
                ],
                "tomorrow": []
            } } }] } }
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_single_chart_to_stdout() {
    let server = price_server().await;
    let mut stdout = Vec::new();

    cli::run_with_output(
        &cli(&server.uri(), Path::new(BUNDLED_TEMPLATE), None),
        &mut stdout,
    )
    .await
    .unwrap();

    let svg = String::from_utf8(stdout).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>\n"));
    assert!(svg.contains(r#"points="0,225 300,0""#));
    assert!(svg.contains(r#"class="now""#));
    assert!(svg.contains("26 ct/kWh (normal)"));
}

#[tokio::test]
async fn test_split_writes_both_charts() {
    let server = price_server().await;
    let dir = out_dir("split");
    let mut stdout = Vec::new();

    cli::run_with_output(
        &cli(&server.uri(), Path::new(BUNDLED_TEMPLATE), Some(dir.as_path())),
        &mut stdout,
    )
    .await
    .unwrap();

    let today = std::fs::read_to_string(dir.join("today.svg")).unwrap();
    let tomorrow = std::fs::read_to_string(dir.join("tomorrow.svg")).unwrap();

    assert!(stdout.is_empty());
    assert!(today.contains(r#"points="0,225 300,0""#));
    assert!(today.contains(r#"class="now""#));
    assert!(today.contains("26 ct/kWh (normal)"));
    assert!(tomorrow.contains(r#"points="""#));
    assert!(!tomorrow.contains(r#"class="now""#));
    assert!(tomorrow.contains("26 ct/kWh (normal)"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_split_writes_nothing_when_tomorrow_fails() {
    let server = price_server().await;
    let dir = out_dir("tomorrow-fails");
    // well-formed only while the now marker is shown
    let template = dir.join("broken.svg.jinja2");
    std::fs::write(
        &template,
        "<svg>{% if show_now %}<g/>{% else %}<g>{% endif %}</svg>",
    )
    .unwrap();

    let result = cli::run(&cli(&server.uri(), &template, Some(dir.as_path()))).await;

    assert!(result.is_err());
    assert!(!dir.join("today.svg").exists());
    assert!(!dir.join("tomorrow.svg").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_unauthorized_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let dir = out_dir("unauthorized");

    let result = cli::run(&cli(
        &server.uri(),
        Path::new(BUNDLED_TEMPLATE),
        Some(dir.as_path()),
    ))
    .await;

    assert!(result.is_err());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

    std::fs::remove_dir_all(&dir).unwrap();
}
