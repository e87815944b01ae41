//! Fake game API for integration tests.
//!
//! Serves the timetable listing, accepts subscription registrations and
//! answers subscription reads with a fixed snapshot. Every request is
//! recorded as `"METHOD URL"`.

#![allow(dead_code)]

use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::TempDir;
use tiny_http::{Header, Request, Response, Server};

use tsw_connect::config::AppConfig;

pub const TEST_KEY: &str = "test-comm-key";

pub fn can_bind_local_port() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

#[derive(Debug, Clone, Default)]
pub struct FakeApiOptions {
    /// Number of subscription POSTs answered with 500 before accepting
    pub failing_posts: usize,
    /// Vehicle ids listed in the timetable
    pub vehicles: Vec<String>,
}

pub struct FakeApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

pub fn snapshot_body(vehicles: &[String]) -> Value {
    let mut entries = vec![
        json!({
            "Path": "DriverAid.PlayerInfo",
            "Values": {
                "currentServiceName": "2C45 Brighton",
                "currentTile": {"x": 3, "y": 4},
                "geoLocation": {"longitude": -0.1415, "latitude": 50.8289}
            }
        }),
        json!({
            "Path": "DriverAid.Data",
            "Values": {
                "trackMaxSpeed": {"value": 40.0},
                "nextSpeedLimit": {"value": 20.0},
                "distanceToNextSpeedLimit": 800.0,
                "nextSpeedLimitPosition": {"x": 1.0, "y": 2.0},
                "gradient": 1.5
            }
        }),
    ];
    for (i, vid) in vehicles.iter().enumerate() {
        entries.push(json!({
            "Path": format!("Timetable/{}.ObjectClass", vid),
            "Values": {"ObjectClass": format!("RVM_{}", i)}
        }));
        entries.push(json!({
            "Path": format!("Timetable/{}.LatLon", vid),
            "Values": {"Lat": 50.8 + i as f64 * 0.001, "Lon": -0.14 - i as f64 * 0.001}
        }));
    }
    json!({"RequestedSubscriptionID": 1, "Entries": entries})
}

fn json_response(status: u16, body: Value) -> Response<std::io::Cursor<Vec<u8>>> {
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("static header");
    Response::from_string(body.to_string())
        .with_status_code(status)
        .with_header(header)
}

fn has_key(req: &Request) -> bool {
    req.headers()
        .iter()
        .any(|h| h.field.equiv("DTGCommKey") && h.value.as_str() == TEST_KEY)
}

fn route(req: &Request, options: &FakeApiOptions, posts: &AtomicUsize) -> Response<std::io::Cursor<Vec<u8>>> {
    if !has_key(req) {
        return json_response(403, json!({"Result": "Error", "Message": "bad key"}));
    }
    let url = req.url().to_string();
    let method = req.method().as_str().to_string();

    match (method.as_str(), url.as_str()) {
        ("GET", "/list/Timetable") => {
            let nodes: Vec<Value> = options.vehicles.iter().map(|v| json!({"Name": v})).collect();
            json_response(200, json!({"Result": "Success", "Nodes": nodes}))
        }
        ("POST", u) if u.starts_with("/subscription/") => {
            let n = posts.fetch_add(1, Ordering::SeqCst);
            if n < options.failing_posts {
                json_response(500, json!({"Result": "Error"}))
            } else {
                json_response(200, json!({"Result": "Success"}))
            }
        }
        ("GET", "/subscription/?Subscription=1") => json_response(200, snapshot_body(&options.vehicles)),
        ("GET", "/get/DriverAid.PlayerInfo") => json_response(
            200,
            json!({"Result": "Success", "Values": snapshot_body(&[])["Entries"][0]["Values"]}),
        ),
        _ => json_response(404, json!({"Result": "Error", "Message": "not found"})),
    }
}

impl FakeApi {
    pub fn start(options: FakeApiOptions) -> FakeApi {
        let server = Server::http("127.0.0.1:0").expect("bind fake api");
        let port = server.server_addr().to_ip().expect("ip listener").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));

        let srv_requests = requests.clone();
        let srv_stop = stop.clone();
        let handle = thread::spawn(move || {
            let posts = AtomicUsize::new(0);
            while !srv_stop.load(Ordering::SeqCst) {
                let req = match server.recv_timeout(Duration::from_millis(20)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };
                srv_requests
                    .lock()
                    .unwrap()
                    .push(format!("{} {}", req.method(), req.url()));
                let response = route(&req, &options, &posts);
                let _ = req.respond(response);
            }
        });

        FakeApi {
            base_url: format!("http://127.0.0.1:{}", port),
            requests,
            stop,
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub fn vehicles(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Config pointing at `base_url`, with a key file and output files inside `dir`
pub fn test_config(dir: &TempDir, base_url: &str) -> AppConfig {
    let key_path: PathBuf = dir.path().join("CommAPIKey.txt");
    fs::write(&key_path, format!("{}\n", TEST_KEY)).unwrap();

    let mut config = AppConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.comm_key_path = Some(key_path);
    config.api.request_timeout_secs = 2;
    config.api.retry_delay_ms = 10;
    config.collection.interval_ms = 20;
    config.collection.join_timeout_ms = 1000;
    config.data.player.filename = dir.path().join("data").join("player.geojson");
    config.data.ai.filename = dir.path().join("data").join("ai.csv");
    config
}
