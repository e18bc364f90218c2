mod common;

use common::{WAIT, script};

use std::time::Duration;

use googletest::prelude::*;
use serial_test::serial;
use sm_config::Config;
use sm_server::ShutdownCoordinator;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

async fn send(port: u16, request: &str) -> String {
    let mut stream = loop {
        match TcpStream::connect(("127.0.0.1", port)).await {
            Ok(stream) => break stream,
            Err(_) => tokio::time::sleep(Duration::from_millis(50)).await,
        }
    };
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut reply = String::new();
    stream.read_to_string(&mut reply).await.unwrap();
    reply
}

#[tokio::test]
#[serial]
async fn given_config_file_when_running_then_fleet_served_until_shutdown() {
    // Given
    let temp = TempDir::new().unwrap();
    script(temp.path(), "echo.sh", "echo \"hello from $*\"\nexec sleep 30");
    let port = free_port();
    let path = temp.path().join("server-manager.toml");
    std::fs::write(
        &path,
        format!(
            r#"
[supervisor]
host = "127.0.0.1"
port = {port}

[logging]
dir = "journal"

[templates.echo]
path = "./echo.sh"
"--instance" = "$(name)"

[[servers]]
name = "echo1"
"#
        ),
    )
    .unwrap();
    let config = Config::load_file(&path).unwrap();
    let shutdown = ShutdownCoordinator::new();
    let supervisor = tokio::spawn(sm_server::run(config, shutdown.clone()));

    // When
    let reply = timeout(WAIT, send(port, "RELOAD\n")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    shutdown.shutdown();
    let result = timeout(WAIT, supervisor).await.unwrap().unwrap();

    // Then
    assert_that!(reply, eq("OK\n"));
    assert_that!(result, ok(anything()));
    let journal: String = std::fs::read_dir(temp.path().join("journal"))
        .unwrap()
        .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
        .collect();
    assert_that!(journal, contains_substring("Received RELOAD"));
    assert_that!(journal, contains_substring("[echo1] hello from --instance=echo1"));
    assert_that!(journal, contains_substring("Stopped 'echo1'"));
}
