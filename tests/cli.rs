use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::process::Command;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;

struct Captured {
    authorization: Option<String>,
    body: String,
}

struct Stub {
    url: String,
    requests: mpsc::Receiver<Captured>,
}

impl Stub {
    fn request(&self) -> Captured {
        self.requests
            .recv_timeout(Duration::from_secs(10))
            .expect("stub received a request")
    }
}

/// Answer exactly one HTTP request with `status` and `reply`.
fn serve_once(status: &str, reply: &str) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let url = format!("http://{}", listener.local_addr().expect("local addr"));
    let (tx, rx) = mpsc::channel();
    let status = status.to_string();
    let reply = reply.to_string();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut content_length = 0;
        let mut authorization = None;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read header");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                match name.to_ascii_lowercase().as_str() {
                    "content-length" => content_length = value.trim().parse().expect("content length"),
                    "authorization" => authorization = Some(value.trim().to_string()),
                    _ => {}
                }
            }
        }
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).expect("read body");
        let _ = tx.send(Captured {
            authorization,
            body: String::from_utf8(body).expect("utf8 body"),
        });
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
            reply.len()
        )
        .expect("write reply");
    });
    Stub { url, requests: rx }
}

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_redis-rest-cli"));
    for var in [
        "UPSTASH_REDIS_REST_URL",
        "UPSTASH_REDIS_REST_TOKEN",
        "UPSTASH_REDIS_REST_TIMEOUT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn connected(stub: &Stub) -> Command {
    let mut cmd = cli();
    cmd.args(["--url", stub.url.as_str(), "--token", "tok", "--timeout", "10"]);
    cmd
}

#[test]
fn help_exits_zero() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:").and(predicate::str::contains("ZREVRANGEBYSCORE")));
}

#[test]
fn no_command_prints_usage_and_fails() {
    cli().assert().code(1).stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_exits_zero() {
    cli().arg("--version").assert().success();
}

#[test]
fn missing_credentials_fail_fast() {
    cli()
        .args(["FOOBAR", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Missing credentials"))
        .stderr(predicate::str::contains("UPSTASH_REDIS_REST_TOKEN"));
}

#[test]
fn unknown_command_fails() {
    cli()
        .args(["--url", "http://127.0.0.1:9", "--token", "tok", "FOOBAR"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Unknown or unsupported command: FOOBAR"));
}

#[test]
fn bad_flag_value_exits_one() {
    cli().args(["--limit", "ten", "ZRANGE", "k", "0", "1"]).assert().code(1);
}

#[test]
fn set_sends_command_and_prints_ok() {
    let stub = serve_once("200 OK", r#"{"result":"OK"}"#);
    connected(&stub)
        .args(["SET", "session:123", "data", "--ex", "3600", "--nx"])
        .assert()
        .success()
        .stdout("OK\n");
    let request = stub.request();
    assert_eq!(Some("Bearer tok".to_string()), request.authorization);
    assert_eq!(r#"["SET","session:123","data","NX","EX","3600"]"#, request.body);
}

#[test]
fn credentials_from_environment() {
    let stub = serve_once("200 OK", r#"{"result":"PONG"}"#);
    cli()
        .env("UPSTASH_REDIS_REST_URL", &stub.url)
        .env("UPSTASH_REDIS_REST_TOKEN", "from-env")
        .arg("ping")
        .assert()
        .success()
        .stdout("PONG\n");
    assert_eq!(Some("Bearer from-env".to_string()), stub.request().authorization);
}

#[test]
fn nil_result() {
    let stub = serve_once("200 OK", r#"{"result":null}"#);
    connected(&stub).args(["GET", "missing"]).assert().success().stdout("(nil)\n");
}

#[test]
fn hgetall_prints_object() {
    let stub = serve_once("200 OK", r#"{"result":["name","John","age","30"]}"#);
    connected(&stub)
        .args(["HGETALL", "user:1"])
        .assert()
        .success()
        .stdout("{\n  \"name\": \"John\",\n  \"age\": 30\n}\n");
}

#[test]
fn reverse_score_range_swaps_bounds() {
    let stub = serve_once("200 OK", r#"{"result":["b","a"]}"#);
    connected(&stub)
        .args(["ZREVRANGEBYSCORE", "board", "0", "100", "--limit", "5,10"])
        .assert()
        .success()
        .stdout("[\n  \"b\",\n  \"a\"\n]\n");
    assert_eq!(
        r#"["ZRANGE","board","100","0","BYSCORE","REV","LIMIT","5","10"]"#,
        stub.request().body
    );
}

#[test]
fn store_error_is_reported() {
    let stub = serve_once(
        "400 Bad Request",
        r#"{"error":"ERR value is not an integer or out of range"}"#,
    );
    connected(&stub)
        .args(["INCRBY", "counter", "abc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: ERR value is not an integer or out of range"));
    assert_eq!(r#"["INCRBY","counter","abc"]"#, stub.request().body);
}

#[test]
fn non_envelope_reply_is_reported() {
    let stub = serve_once("401 Unauthorized", "Unauthorized");
    connected(&stub)
        .args(["DBSIZE"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: HTTP 401 Unauthorized: Unauthorized"));
}

#[test]
fn hmget_prints_requested_fields() {
    let stub = serve_once("200 OK", r#"{"result":["John","30"]}"#);
    connected(&stub)
        .args(["HMGET", "user:1", "name", "age"])
        .assert()
        .success()
        .stdout("{\n  \"name\": \"John\",\n  \"age\": 30\n}\n");
}

#[test]
fn hmget_all_missing_is_nil() {
    let stub = serve_once("200 OK", r#"{"result":[null,null]}"#);
    connected(&stub)
        .args(["HMGET", "user:1", "name", "age"])
        .assert()
        .success()
        .stdout("(nil)\n");
}

#[test]
fn scan_cursor_stays_text() {
    let stub = serve_once("200 OK", r#"{"result":["17",["a","b"]]}"#);
    connected(&stub)
        .args(["SCAN", "0"])
        .assert()
        .success()
        .stdout("[\n  \"17\",\n  [\n    \"a\",\n    \"b\"\n  ]\n]\n");
}

#[test]
fn large_integer_sent_without_exponent() {
    let stub = serve_once("200 OK", r#"{"result":"OK"}"#);
    connected(&stub).args(["SET", "id", "12345678901234567890"]).assert().success();
    assert_eq!(r#"["SET","id","12345678901234567000"]"#, stub.request().body);
}

#[test]
fn conflicting_set_flags_send_one_per_group() {
    let stub = serve_once("200 OK", r#"{"result":"OK"}"#);
    connected(&stub)
        .args(["SET", "k", "v", "--nx", "--xx", "--ex", "10", "--px", "5"])
        .assert()
        .success();
    assert_eq!(r#"["SET","k","v","NX","EX","10"]"#, stub.request().body);
}
