//! `sm status`: TCP connectivity probe of every instance that advertises an
//! address (`--host`/`--port`, else `#host`/`#port`).

use crate::table;

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use sm_core::Spec;
use tokio::net::TcpStream;
use tokio::time::timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Reachability {
    Online,
    Offline,
}

impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "ONLINE"),
            Self::Offline => write!(f, "OFFLINE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerStatus {
    pub name: String,
    pub host: String,
    pub port: String,
    pub status: Reachability,
}

/// Probe each spec in order. Specs without an advertised address are skipped.
pub async fn collect(specs: &[Spec], probe_timeout: Duration) -> Vec<ServerStatus> {
    let mut statuses = Vec::with_capacity(specs.len());

    for spec in specs {
        let Some((host, port)) = spec.advertised_address() else {
            continue;
        };

        statuses.push(ServerStatus {
            name: spec.name().to_string(),
            host: host.to_string(),
            port: port.to_string(),
            status: probe(host, port, probe_timeout).await,
        });
    }

    statuses
}

/// `Online` if a TCP connection to `host:port` opens within `probe_timeout`.
pub async fn probe(host: &str, port: &str, probe_timeout: Duration) -> Reachability {
    let Ok(port) = port.trim().parse::<u16>() else {
        return Reachability::Offline;
    };

    match timeout(probe_timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(_)) => Reachability::Online,
        _ => Reachability::Offline,
    }
}

pub fn render(statuses: &[ServerStatus]) -> String {
    let rows: Vec<Vec<String>> = statuses
        .iter()
        .map(|s| vec![s.name.clone(), s.status.to_string()])
        .collect();

    table::render(&["SERVER", "STATUS"], &rows)
}
