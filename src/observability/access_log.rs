//! Per-virtual-host access and error logs.
//!
//! Two independent, append-only, line-oriented streams per host. Every
//! record is also emitted as a `tracing` event under the
//! `media_gateway::access` / `media_gateway::error` targets, so hosts without
//! log files still produce output.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::config::ConfigError;

/// Which route served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Static,
    Proxy,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Static => "static",
            RouteKind::Proxy => "proxy",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed request.
#[derive(Debug, Clone)]
pub struct AccessRecord<'a> {
    pub client: IpAddr,
    pub method: &'a str,
    pub path: &'a str,
    pub status: u16,
    /// Body size when known up front.
    pub bytes: Option<u64>,
    pub latency: Duration,
    pub route: RouteKind,
    pub request_id: &'a str,
}

impl AccessRecord<'_> {
    /// `<client> - [<date>] "<METHOD> <path>" <status> <bytes> <ms>ms host=.. route=.. rid=..`
    pub fn format_line(&self, host: &str, at: SystemTime) -> String {
        let bytes = self
            .bytes
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} - [{}] \"{} {}\" {} {} {}ms host={} route={} rid={}",
            self.client,
            httpdate::fmt_http_date(at),
            self.method,
            self.path,
            self.status,
            bytes,
            self.latency.as_millis(),
            host,
            self.route,
            self.request_id,
        )
    }
}

/// One failed request.
#[derive(Debug, Clone)]
pub struct ErrorRecord<'a> {
    pub client: IpAddr,
    pub method: &'a str,
    pub path: &'a str,
    pub status: u16,
    pub message: &'a str,
}

impl ErrorRecord<'_> {
    /// `[<date>] [error] <client> "<METHOD> <path>" host=.. status=..: <message>`
    pub fn format_line(&self, host: &str, at: SystemTime) -> String {
        format!(
            "[{}] [error] {} \"{} {}\" host={} status={}: {}",
            httpdate::fmt_http_date(at),
            self.client,
            self.method,
            self.path,
            host,
            self.status,
            self.message,
        )
    }
}

/// Destination for one log stream.
#[derive(Debug)]
enum LogSink {
    /// Only the tracing event.
    Tracing,
    /// Append to a file as well. Opened with O_APPEND, so each line lands
    /// whole with a single write and no lock.
    File { path: PathBuf, file: File },
}

impl LogSink {
    fn open(host: &str, path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(LogSink::Tracing);
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ConfigError::LogFile {
                host: host.to_string(),
                path: path.to_path_buf(),
                source,
            })?;
        Ok(LogSink::File {
            path: path.to_path_buf(),
            file,
        })
    }

    fn append(&self, line: &str) {
        let LogSink::File { path, file } = self else {
            return;
        };
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');
        let mut writer: &File = file;
        if let Err(e) = writer.write_all(record.as_bytes()) {
            tracing::error!(path = ?path, error = %e, "Failed to append log line");
        }
    }
}

/// The access and error streams of one virtual host.
#[derive(Debug)]
pub struct VhostLogs {
    host: String,
    access: LogSink,
    error: LogSink,
}

impl VhostLogs {
    /// Open both streams; `None` keeps a stream tracing-only.
    pub fn open(
        host: &str,
        access_path: Option<&Path>,
        error_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            host: host.to_string(),
            access: LogSink::open(host, access_path)?,
            error: LogSink::open(host, error_path)?,
        })
    }

    pub fn access(&self, record: &AccessRecord<'_>) {
        tracing::info!(
            target: "media_gateway::access",
            host = %self.host,
            client = %record.client,
            method = record.method,
            path = record.path,
            status = record.status,
            bytes = ?record.bytes,
            latency_ms = record.latency.as_millis() as u64,
            route = %record.route,
            request_id = record.request_id,
            "request served"
        );
        self.access
            .append(&record.format_line(&self.host, SystemTime::now()));
    }

    pub fn error(&self, record: &ErrorRecord<'_>) {
        tracing::warn!(
            target: "media_gateway::error",
            host = %self.host,
            client = %record.client,
            method = record.method,
            path = record.path,
            status = record.status,
            message = record.message,
            "request failed"
        );
        self.error
            .append(&record.format_line(&self.host, SystemTime::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn epoch_plus(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn access_line_format() {
        let record = AccessRecord {
            client: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)),
            method: "GET",
            path: "/media/a.jpg",
            status: 206,
            bytes: Some(100),
            latency: Duration::from_millis(12),
            route: RouteKind::Static,
            request_id: "abc",
        };
        assert_eq!(
            record.format_line("a.example", epoch_plus(0)),
            "10.0.0.7 - [Thu, 01 Jan 1970 00:00:00 GMT] \"GET /media/a.jpg\" 206 100 12ms host=a.example route=static rid=abc"
        );

        let unknown = AccessRecord { bytes: None, ..record };
        assert!(unknown.format_line("a.example", epoch_plus(0)).contains(" 206 - 12ms "));
    }

    #[test]
    fn error_line_format() {
        let record = ErrorRecord {
            client: IpAddr::V4(Ipv4Addr::LOCALHOST),
            method: "POST",
            path: "/api/",
            status: 502,
            message: "backend unreachable",
        };
        assert_eq!(
            record.format_line("b.example", epoch_plus(60)),
            "[Thu, 01 Jan 1970 00:01:00 GMT] [error] 127.0.0.1 \"POST /api/\" host=b.example status=502: backend unreachable"
        );
    }

    #[test]
    fn streams_append_to_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let access_path = dir.path().join("access.log");
        let error_path = dir.path().join("error.log");
        std::fs::write(&access_path, "previous\n").unwrap();

        let logs = VhostLogs::open("a.example", Some(&access_path), Some(&error_path)).unwrap();
        let client = IpAddr::V4(Ipv4Addr::LOCALHOST);
        logs.access(&AccessRecord {
            client,
            method: "GET",
            path: "/",
            status: 200,
            bytes: Some(2),
            latency: Duration::ZERO,
            route: RouteKind::Proxy,
            request_id: "-",
        });
        logs.error(&ErrorRecord {
            client,
            method: "GET",
            path: "/missing",
            status: 404,
            message: "file not found",
        });

        let access = std::fs::read_to_string(&access_path).unwrap();
        let lines: Vec<_> = access.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "previous");
        assert!(lines[1].contains("\"GET /\" 200 2"));

        let errors = std::fs::read_to_string(&error_path).unwrap();
        assert_eq!(errors.lines().count(), 1);
        assert!(errors.contains("file not found"));
    }

    #[test]
    fn concurrent_appends_keep_lines_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        let sink = LogSink::open("a.example", Some(&path)).unwrap();
        let line = format!("10.0.0.1 - {}", "x".repeat(512));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        sink.append(&line);
                    }
                });
            }
        });

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 400);
        assert!(written.lines().all(|l| l == line));
    }
}
