//! End-to-end install and launch against a wiremock server standing in for
//! the version manifest, the CDN and the resources host.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use mclaunch::core::config::LauncherConfig;
use mclaunch::core::downloader::sha1_hex;
use mclaunch::core::error::{LauncherError, LauncherResult};
use mclaunch::core::launch::{LaunchPlan, ProcessSpawner};
use mclaunch::core::pipeline::Pipeline;
use mclaunch::core::platform::Platform;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ICON: &[u8] = b"\x89PNG icon bytes";
const CLIENT: &[u8] = b"client jar bytes";
const LWJGL: &[u8] = b"lwjgl classes";

#[derive(Default)]
struct RecordingSpawner {
    plans: Mutex<Vec<LaunchPlan>>,
}

#[async_trait]
impl ProcessSpawner for RecordingSpawner {
    async fn run(&self, plan: &LaunchPlan) -> LauncherResult<i32> {
        self.plans.lock().unwrap().push(plan.clone());
        Ok(0)
    }
}

fn natives_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in [("liblwjgl.so", b"elf".as_slice()), ("META-INF/MANIFEST.MF", b"m".as_slice())] {
        writer.start_file(name, options).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn config(server: &MockServer, root: &Path) -> LauncherConfig {
    LauncherConfig {
        game_dir: root.to_path_buf(),
        manifest_url: format!("{}/mc/game/version_manifest.json", server.uri()),
        resources_url: format!("{}/objects", server.uri()),
        concurrency: 4,
        verify_hashes: true,
        retries: 1,
        java_binary: PathBuf::from("java"),
        max_memory: "1G".into(),
        platform: Platform::Linux,
    }
}

async fn serve(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Mount a complete release `1.0` with one asset and one library carrying
/// Linux natives.
async fn mount_release(server: &MockServer) {
    let uri = server.uri();
    let icon_hash = sha1_hex(ICON);
    let natives = natives_zip();

    let manifest = json!({
        "latest": { "release": "1.0" },
        "versions": [
            { "id": "1.1", "type": "snapshot", "url": format!("{uri}/v1/1.1.json") },
            { "id": "1.0", "type": "release", "url": format!("{uri}/v1/1.0.json") }
        ]
    });
    let index = json!({
        "objects": {
            "icons/icon_16x16.png": { "hash": icon_hash, "size": ICON.len() },
            "icons/icon_32x32.png": { "hash": icon_hash, "size": ICON.len() }
        }
    });
    let index_bytes = index.to_string().into_bytes();
    let descriptor = json!({
        "id": "1.0",
        "type": "release",
        "mainClass": "net.minecraft.client.main.Main",
        "downloads": {
            "client": { "url": format!("{uri}/client/1.0.jar"), "sha1": sha1_hex(CLIENT) }
        },
        "assetIndex": {
            "id": "1.0",
            "url": format!("{uri}/indexes/1.0.json"),
            "sha1": sha1_hex(&index_bytes)
        },
        "libraries": [{
            "name": "org.lwjgl:lwjgl:3.3.1",
            "downloads": {
                "artifact": {
                    "url": format!("{uri}/libs/lwjgl.jar"),
                    "path": "org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1.jar",
                    "sha1": sha1_hex(LWJGL)
                },
                "classifiers": {
                    "natives-linux": {
                        "url": format!("{uri}/libs/lwjgl-natives-linux.jar"),
                        "path": "org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1-natives-linux.jar",
                        "sha1": sha1_hex(&natives)
                    }
                }
            },
            "natives": { "linux": "natives-linux" },
            "extract": { "exclude": ["META-INF/"] }
        }]
    });

    serve(server, "/mc/game/version_manifest.json", manifest.to_string().into_bytes()).await;
    serve(server, "/v1/1.0.json", descriptor.to_string().into_bytes()).await;
    serve(server, "/indexes/1.0.json", index_bytes).await;
    serve(server, &format!("/objects/{}/{}", &icon_hash[..2], icon_hash), ICON.to_vec()).await;
    serve(server, "/client/1.0.jar", CLIENT.to_vec()).await;
    serve(server, "/libs/lwjgl.jar", LWJGL.to_vec()).await;
    serve(server, "/libs/lwjgl-natives-linux.jar", natives).await;
}

#[tokio::test]
async fn installs_and_launches_a_release() {
    let server = MockServer::start().await;
    mount_release(&server).await;
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    let pipeline = Pipeline::from_config(config(&server, root)).expect("pipeline");
    let spawner = RecordingSpawner::default();

    let code = pipeline.launch("1.0", "Steve", &spawner).await.expect("launch");
    assert_eq!(code, 0);

    let icon_hash = sha1_hex(ICON);
    assert_eq!(
        std::fs::read(root.join("assets/objects").join(&icon_hash[..2]).join(&icon_hash)).unwrap(),
        ICON
    );
    assert_eq!(std::fs::read(root.join("versions/1.0/1.0.jar")).unwrap(), CLIENT);
    assert!(root.join("versions/1.0/1.0.json").is_file());
    assert!(root.join("assets/indexes/1.0.json").is_file());
    assert!(root.join("versions/1.0/natives/liblwjgl.so").is_file());
    assert!(!root.join("versions/1.0/natives/META-INF").exists());

    let plans = spawner.plans.lock().unwrap();
    let plan = &plans[0];
    assert_eq!(
        plan.classpath,
        vec![
            root.join("libraries/org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1.jar"),
            root.join("versions/1.0/1.0.jar"),
        ]
    );
    assert_eq!(plan.main_class, "net.minecraft.client.main.Main");
    assert_eq!(plan.jvm_args[0], "-Xmx1G");
    assert!(plan.game_args.windows(2).any(|w| w[0] == "--assetIndex" && w[1] == "1.0"));
    assert!(plan.game_args.windows(2).any(|w| w[0] == "--versionType" && w[1] == "release"));
}

#[tokio::test]
async fn second_install_downloads_nothing_new() {
    let server = MockServer::start().await;
    mount_release(&server).await;
    let temp = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::from_config(config(&server, temp.path())).expect("pipeline");

    pipeline.prepare("1.0", "Steve").await.expect("first run");
    let first_count = server.received_requests().await.unwrap().len();
    pipeline.prepare("1.0", "Steve").await.expect("second run");

    let requests = server.received_requests().await.unwrap();
    let second_run: Vec<&str> = requests[first_count..]
        .iter()
        .map(|r| r.url.path())
        .collect();
    assert_eq!(
        second_run,
        vec!["/mc/game/version_manifest.json", "/v1/1.0.json", "/indexes/1.0.json"]
    );
}

#[tokio::test]
async fn unknown_release_is_reported_without_descriptor_fetch() {
    let server = MockServer::start().await;
    mount_release(&server).await;
    let temp = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::from_config(config(&server, temp.path())).expect("pipeline");

    let err = pipeline.prepare("0.0.1", "Steve").await.unwrap_err();

    assert!(matches!(err, LauncherError::VersionNotFound(_)));
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/mc/game/version_manifest.json");
}

#[tokio::test]
async fn corrupted_download_fails_the_run() {
    let server = MockServer::start().await;
    // Mounted first so it wins over the genuine client jar route.
    Mock::given(method("GET"))
        .and(path("/client/1.0.jar"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"tampered".to_vec()))
        .mount(&server)
        .await;
    mount_release(&server).await;
    let temp = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::from_config(config(&server, temp.path())).expect("pipeline");

    let err = pipeline.prepare("1.0", "Steve").await.unwrap_err();

    assert!(matches!(err, LauncherError::Sha1Mismatch { .. }));
    assert!(!temp.path().join("versions/1.0/1.0.jar").exists());
}
