//! HTTP-level tests against a wiremock service: multipart ingestion, the
//! video listing and headless manifest loading.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use common::{drain, finished_count, percents, video_file, RecordingNotifier};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vidport::api::ApiEndpoints;
use vidport::catalog::VideoCatalog;
use vidport::config::Config;
use vidport::playback::{
    CapabilityProfile, ConsoleSink, HeadlessEnvironment, PlaybackSelector, PlaybackTarget,
};
use vidport::upload::{
    HttpTransport, ProgressReporter, UploadOutcome, UploadPipeline, UploadRequest,
};
use vidport_core::{Error, VideoId};
use vidport_hls::{
    generate_master_playlist, generate_media_playlist, MasterPlaylist, MediaPlaylist, Segment,
    Variant, HLS_MIME_TYPE,
};

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.upload.chunk_size = 1024;
    config
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn multipart_upload_is_stored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/videos"))
        .and(body_string_contains("name=\"title\""))
        .and(body_string_contains("name=\"description\""))
        .and(body_string_contains("filename=\"clip.mp4\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "videoId": "abc",
            "title": "Test",
            "description": "Desc",
            "contentType": "video/mp4"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let pipeline = UploadPipeline::new(
        Arc::new(HttpTransport::new(&config)),
        RecordingNotifier::new(),
    );
    let (reporter, mut rx) = ProgressReporter::new();

    let outcome = pipeline
        .submit(
            UploadRequest::new(Some(video_file(10 * 1024)), "Test", "Desc"),
            &reporter,
        )
        .await
        .unwrap();

    assert_eq!(outcome, UploadOutcome::Success(VideoId::new("abc")));

    let events = drain(&mut rx);
    let seen = percents(&events);
    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last(), Some(&100));
    assert_eq!(finished_count(&events), 1);
}

#[tokio::test]
async fn server_error_is_reported_with_its_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/videos"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "message": "Video not uploaded",
            "success": false
        })))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let notifier = RecordingNotifier::new();
    let pipeline = UploadPipeline::new(Arc::new(HttpTransport::new(&config)), notifier.clone());
    let (reporter, mut rx) = ProgressReporter::new();

    let outcome = pipeline
        .submit(UploadRequest::new(Some(video_file(64)), "", ""), &reporter)
        .await
        .unwrap();

    assert_matches!(outcome, UploadOutcome::Failure(ref reason) if reason.contains("Video not uploaded"));
    assert_eq!(finished_count(&drain(&mut rx)), 1);
    assert_eq!(notifier.errors(), vec!["File not uploaded".to_string()]);
}

#[tokio::test]
async fn unreachable_service_is_a_failure() {
    // Bind then release a port so nothing is listening on it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut config = Config::default();
    config.api.base_url = format!("http://127.0.0.1:{}", port);
    config.api.connect_timeout_secs = 2;

    let pipeline = UploadPipeline::new(
        Arc::new(HttpTransport::new(&config)),
        RecordingNotifier::new(),
    );
    let (reporter, mut rx) = ProgressReporter::new();

    let outcome = pipeline
        .submit(UploadRequest::new(Some(video_file(64)), "", ""), &reporter)
        .await
        .unwrap();

    assert!(!outcome.is_success());
    assert_eq!(finished_count(&drain(&mut rx)), 1);
    assert_eq!(reporter.percent(), 0);
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_videos_decodes_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"videoId": "abc", "title": "First", "description": "", "contentType": "video/mp4"},
            {"id": "def", "title": "Second"}
        ])))
        .mount(&server)
        .await;

    let videos = VideoCatalog::new(&config_for(&server))
        .list_videos()
        .await
        .unwrap();

    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].video_id.as_str(), "abc");
    assert_eq!(videos[0].content_type.as_deref(), Some("video/mp4"));
    assert_eq!(videos[1].video_id.as_str(), "def");
    assert_eq!(videos[1].description, "");
}

#[tokio::test]
async fn list_videos_surfaces_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/videos"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = VideoCatalog::new(&config_for(&server))
        .list_videos()
        .await
        .unwrap_err();

    assert_matches!(err, Error::ServerRejection { status: 503, ref message } if message == "maintenance");
}

// ---------------------------------------------------------------------------
// Headless playback
// ---------------------------------------------------------------------------

fn master() -> String {
    generate_master_playlist(&MasterPlaylist {
        variants: vec![
            Variant {
                bandwidth: 800_000,
                resolution: Some((640, 360)),
                codecs: "avc1.64001e,mp4a.40.2".into(),
                uri: "360p/index.m3u8".into(),
            },
            Variant {
                bandwidth: 2_500_000,
                resolution: Some((1280, 720)),
                codecs: "avc1.64001f,mp4a.40.2".into(),
                uri: "720p/index.m3u8".into(),
            },
        ],
    })
}

fn media(segments: usize) -> String {
    generate_media_playlist(&MediaPlaylist {
        target_duration: 6,
        media_sequence: 0,
        segments: (0..segments)
            .map(|i| Segment {
                duration: 6.0,
                uri: format!("segment{}.ts", i),
                title: None,
            })
            .collect(),
        ended: true,
        init_segment_uri: None,
    })
}

async fn mount_playlist(server: &MockServer, route: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", HLS_MIME_TYPE)
                .set_body_string(body),
        )
        .expect(hits)
        .mount(server)
        .await;
}

fn manifest_url(config: &Config) -> String {
    ApiEndpoints::from_config(&config.api).manifest(&VideoId::new("abc"))
}

#[tokio::test]
async fn headless_play_loads_highest_variant() {
    let server = MockServer::start().await;
    mount_playlist(&server, "/api/v1/videos/abc/master.m3u8", master(), 1).await;
    mount_playlist(&server, "/api/v1/videos/abc/720p/index.m3u8", media(3), 1).await;
    mount_playlist(&server, "/api/v1/videos/abc/360p/index.m3u8", media(3), 0).await;

    let config = config_for(&server);
    let notifier = RecordingNotifier::new();
    let selector = PlaybackSelector::new(
        Arc::new(HeadlessEnvironment::new(&config)),
        notifier.clone(),
        config.playback.clone(),
    );
    let sink = Arc::new(ConsoleSink::new());

    let profile = selector
        .attach(PlaybackTarget::new(sink.clone(), manifest_url(&config)))
        .await
        .unwrap();

    assert_eq!(profile, CapabilityProfile::NativeAdaptive);
    assert_eq!(sink.play_count(), 1);
    // The engine loads the manifest; the sink is never pointed at it.
    assert_eq!(sink.source(), None);
    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn headless_play_respects_bandwidth_cap() {
    let server = MockServer::start().await;
    mount_playlist(&server, "/api/v1/videos/abc/master.m3u8", master(), 1).await;
    mount_playlist(&server, "/api/v1/videos/abc/360p/index.m3u8", media(2), 1).await;
    mount_playlist(&server, "/api/v1/videos/abc/720p/index.m3u8", media(2), 0).await;

    let mut config = config_for(&server);
    config.playback.max_bandwidth = Some(1_000_000);
    let selector = PlaybackSelector::new(
        Arc::new(HeadlessEnvironment::new(&config)),
        RecordingNotifier::new(),
        config.playback.clone(),
    );
    let sink = Arc::new(ConsoleSink::new());

    selector
        .attach(PlaybackTarget::new(sink.clone(), manifest_url(&config)))
        .await
        .unwrap();

    assert_eq!(sink.play_count(), 1);
}

#[tokio::test]
async fn missing_manifest_never_plays() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/videos/abc/master.m3u8"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let notifier = RecordingNotifier::new();
    let selector = PlaybackSelector::new(
        Arc::new(HeadlessEnvironment::new(&config)),
        notifier.clone(),
        config.playback.clone(),
    );
    let sink = Arc::new(ConsoleSink::new());

    let err = selector
        .attach(PlaybackTarget::new(sink.clone(), manifest_url(&config)))
        .await
        .unwrap_err();

    assert_matches!(err, Error::Manifest { .. });
    assert_eq!(sink.play_count(), 0);
    assert_eq!(notifier.errors(), vec!["Video could not be loaded".to_string()]);
    assert!(!selector.is_attached());
}
