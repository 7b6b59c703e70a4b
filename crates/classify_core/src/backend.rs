use crate::config::ClientConfig;
use crate::error::ClassifyError;
use crate::file::SelectedFile;
use anyhow::{Context, Result};
use reqwest::blocking::{Client, ClientBuilder, multipart};

/// Path of the prediction endpoint, relative to the server URL.
pub const PREDICT_PATH: &str = "/predict";
/// Multipart field that carries the image.
pub const IMAGE_FIELD: &str = "image";

/// Raw reply from the prediction endpoint. Interpreting it is up to the
/// controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl BackendReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can classify a selected file.
///
/// Implementations return `Err` only when no reply arrived at all.
pub trait Backend {
    fn predict(&self, file: &SelectedFile) -> Result<BackendReply, ClassifyError>;
}

/// Talks to the classification service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        Self::from_builder(Client::builder(), cfg)
    }

    fn from_builder(builder: ClientBuilder, cfg: &ClientConfig) -> Result<Self> {
        let client = builder
            // one attempt, waits as long as the server needs
            .timeout(None)
            .build()
            .context("cannot build HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}{PREDICT_PATH}", cfg.server_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Backend for HttpBackend {
    fn predict(&self, file: &SelectedFile) -> Result<BackendReply, ClassifyError> {
        let bytes = file.read_bytes().map_err(|e| {
            tracing::warn!("cannot read {} for upload: {e:#}", file.name());
            ClassifyError::transport(format!("{e:#}"))
        })?;
        let part = multipart::Part::bytes(bytes.to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(|e| ClassifyError::transport(e.to_string()))?;
        let form = multipart::Form::new().part(IMAGE_FIELD, part);

        tracing::debug!(endpoint = %self.endpoint, file = file.name(), "submitting image");
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| {
                tracing::warn!("request to {} failed: {e}", self.endpoint);
                ClassifyError::transport(e.to_string())
            })?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| ClassifyError::transport(e.to_string()))?;
        tracing::debug!(status, len = body.len(), "prediction reply received");
        Ok(BackendReply {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{FileCandidate, validate};
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::thread;

    fn local_backend(server_url: String) -> HttpBackend {
        HttpBackend::from_builder(Client::builder().no_proxy(), &ClientConfig { server_url }).unwrap()
    }

    fn selected() -> SelectedFile {
        let bytes: Arc<[u8]> = Arc::from(b"PNGDATA".to_vec());
        validate(FileCandidate::from_bytes("harbour.png", "image/png", bytes)).unwrap()
    }

    /// Accepts one connection, captures the request and answers with `reply`.
    fn one_shot_server(
        status_line: &'static str,
        reply: &'static str,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                head.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
                reply.len()
            );
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            head + &String::from_utf8_lossy(&body)
        });
        (url, handle)
    }

    #[test]
    fn posts_multipart_image_to_predict() {
        let (url, server) = one_shot_server("200 OK", r#"{"success":true}"#);
        let backend = local_backend(format!("{url}/"));
        assert_eq!(backend.endpoint(), format!("{url}/predict"));

        let reply = backend.predict(&selected()).unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.body, br#"{"success":true}"#);

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /predict HTTP/1.1"));
        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("content-type: multipart/form-data; boundary="));
        assert!(lower.contains(r#"form-data; name="image"; filename="harbour.png""#));
        assert!(lower.contains("content-type: image/png"));
        assert!(request.contains("PNGDATA"));
    }

    #[test]
    fn non_success_status_is_still_a_reply() {
        let (url, server) =
            one_shot_server("503 Service Unavailable", r#"{"error":"Model unavailable"}"#);
        let backend = local_backend(url);
        let reply = backend.predict(&selected()).unwrap();
        assert_eq!(reply.status, 503);
        assert!(!reply.is_success());
        server.join().unwrap();
    }

    #[test]
    fn unreachable_server_is_transport_failure() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let backend = local_backend(format!("http://127.0.0.1:{port}"));
        let err = backend.predict(&selected()).unwrap_err();
        assert!(matches!(err, ClassifyError::TransportFailure(_)));
    }

    #[test]
    fn reply_success_range() {
        let reply = |status| BackendReply { status, body: Vec::new() };
        assert!(reply(200).is_success());
        assert!(reply(201).is_success());
        assert!(!reply(199).is_success());
        assert!(!reply(400).is_success());
        assert!(!reply(500).is_success());
    }
}
