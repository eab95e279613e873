//! Blocking HTTP client for the build service API.

use std::time::Instant;

use color_eyre::eyre::{bail, eyre, WrapErr};
use color_eyre::Result;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use url::Url;

use super::{xml, RequestSource};
use crate::config::{Credentials, ResolvedConfig};
use crate::constants;
use crate::state::{PackageRef, PackageSnapshot, Request};

/// Read-only client for one build service endpoint.
pub struct ObsClient {
    http: Client,
    apiurl: Url,
    credentials: Option<Credentials>,
}

impl ObsClient {
    /// Build a client for the resolved endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ResolvedConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(constants::HTTP_TIMEOUT)
            .user_agent(format!("{}/{}", constants::APP_NAME, constants::APP_VERSION))
            .build()
            .wrap_err(constants::ERR_HTTP_CLIENT_BUILD_FAILED)?;

        Ok(Self {
            http,
            apiurl: config.apiurl.clone(),
            credentials: config.credentials.clone(),
        })
    }

    /// Fetch the file listing of a package.
    ///
    /// With `pinned` the listing is taken at the reference's `rev`, otherwise
    /// at the current head. Returns `None` when the ref names no package or
    /// the package does not exist.
    fn fetch_snapshot(&self, pkg: &PackageRef, pinned: bool) -> Result<Option<PackageSnapshot>> {
        let Some(package) = pkg.package.as_deref() else {
            return Ok(None);
        };

        let mut query = vec![("expand", "1")];
        if let (true, Some(rev)) = (pinned, pkg.rev.as_deref()) {
            query.push(("rev", rev));
        }
        let url = self.endpoint(&["source", pkg.project.as_str(), package], &query)?;

        let Some(body) = self.get_xml(&url)? else {
            tracing::debug!(project = %pkg.project, package, "package does not exist");
            return Ok(None);
        };
        let snapshot = xml::parse_directory(&body, &pkg.project, package)?;
        tracing::debug!(
            project = %snapshot.project,
            package = %snapshot.package,
            rev = ?snapshot.rev,
            srcmd5 = ?snapshot.srcmd5,
            files = snapshot.files.len(),
            "listed package"
        );
        Ok(Some(snapshot))
    }

    /// Join `segments` and `query` onto the endpoint URL.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.apiurl.clone();
        url.path_segments_mut()
            .map_err(|()| eyre!("API URL {} cannot be used as a base", self.apiurl))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// GET `url` and return the body, or `None` on 404.
    fn get_xml(&self, url: &Url) -> Result<Option<String>> {
        let mut request = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/xml");
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.user, Some(&creds.password));
        }

        let started = Instant::now();
        let response = request
            .send()
            .wrap_err_with(|| format!("{}: GET {url}", constants::ERR_NETWORK_REQUEST_FAILED))?;
        let status = response.status();
        tracing::debug!(
            method = "GET",
            url = %url,
            status = status.as_u16(),
            elapsed = ?started.elapsed(),
            "http request"
        );

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response
            .text()
            .wrap_err_with(|| format!("{}: GET {url}", constants::ERR_READ_CONTENT_FAILED))?;
        tracing::trace!(url = %url, bytes = body.len(), "http response body");

        if !status.is_success() {
            match xml::parse_status_summary(&body) {
                Some(summary) => bail!("{}{status} ({summary}): GET {url}", constants::ERR_SERVER_ERROR),
                None => bail!("{}{status}: GET {url}", constants::ERR_SERVER_ERROR),
            }
        }

        Ok(Some(body))
    }
}

impl RequestSource for ObsClient {
    fn fetch_request(&self, id: &str) -> Result<Request> {
        let url = self.endpoint(&["request", id], &[("withissues", "1")])?;
        let body = self
            .get_xml(&url)?
            .ok_or_else(|| eyre!("Request '{id}' not found at {}", self.apiurl))?;
        let mut request = xml::parse_request(&body)?;

        // Closed requests are never rendered, so their packages are not fetched.
        if !request.state.is_actionable() {
            return Ok(request);
        }

        for action in &mut request.actions {
            if let Some(source) = &action.source {
                action.src_pkg = self
                    .fetch_snapshot(source, true)
                    .wrap_err_with(|| format!("Failed to list source files of {source}"))?;
            }
            if let Some(target) = &action.target {
                action.tgt_pkg = self
                    .fetch_snapshot(target, false)
                    .wrap_err_with(|| format!("Failed to list target files of {target}"))?;
            }
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    fn client(apiurl: &str) -> ObsClient {
        let config = ResolvedConfig {
            apiurl: Url::parse(apiurl).unwrap(),
            credentials: None,
            debug: false,
        };
        ObsClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let obs = client("https://api.example.org");
        let url = obs
            .endpoint(&["request", "1180542"], &[("withissues", "1")])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.org/request/1180542?withissues=1");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let obs = client("https://build.example.org/api");
        let url = obs
            .endpoint(&["source", "devel:tools", "hello"], &[("expand", "1"), ("rev", "7")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://build.example.org/api/source/devel:tools/hello?expand=1&rev=7"
        );
    }

    #[test]
    fn test_endpoint_escapes_request_id() {
        let obs = client("https://api.example.org");
        let url = obs.endpoint(&["request", "1 2/3"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.org/request/1%202%2F3");
    }

    #[test]
    fn test_snapshot_skipped_without_package() {
        let obs = client("http://127.0.0.1:9");
        let project_only = PackageRef {
            project: "devel:tools".to_string(),
            ..PackageRef::default()
        };
        assert_eq!(obs.fetch_snapshot(&project_only, false).unwrap(), None);
    }

    // ── Local HTTP server ───────────────────────────────────────────────────

    /// Serve one canned `(status, reason, body)` per connection, in order,
    /// then stop listening. The handle yields the request lines received.
    fn serve(responses: Vec<(u16, &'static str, String)>) -> (ObsClient, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let apiurl = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();

        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for (status, reason, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                seen.push(request_line.trim_end().to_string());
                loop {
                    let mut header = String::new();
                    reader.read_line(&mut header).unwrap();
                    if header == "\r\n" || header.is_empty() {
                        break;
                    }
                }

                write!(
                    stream,
                    "HTTP/1.1 {status} {reason}\r\n\
                     Content-Type: application/xml\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\r\n{body}",
                    body.len()
                )
                .unwrap();
            }
            seen
        });

        let obs = ObsClient {
            http: Client::builder().no_proxy().build().unwrap(),
            apiurl,
            credentials: None,
        };
        (obs, handle)
    }

    fn submit_request(state: &str) -> String {
        format!(
            r#"<request id="5">
  <action type="submit">
    <source project="home:alice" package="hello" rev="7"/>
    <target project="devel:tools" package="hello"/>
  </action>
  <state name="{state}"/>
  <description>bump</description>
</request>"#
        )
    }

    const TARGET_DIRECTORY: &str = r#"<directory name="hello" rev="3" srcmd5="abc">
  <entry name="hello.spec" md5="d41d8cd98f00b204e9800998ecf8427e" size="10" mtime="1714644000"/>
</directory>"#;

    #[test]
    fn test_fetch_request_lists_packages() {
        let (obs, server) = serve(vec![
            (200, "OK", submit_request("new")),
            (404, "Not Found", "<status code=\"unknown_package\"/>".to_string()),
            (200, "OK", TARGET_DIRECTORY.to_string()),
        ]);

        let req = obs.fetch_request("5").unwrap();
        let lines = server.join().unwrap();

        assert_eq!(
            lines,
            [
                "GET /request/5?withissues=1 HTTP/1.1",
                "GET /source/home:alice/hello?expand=1&rev=7 HTTP/1.1",
                "GET /source/devel:tools/hello?expand=1 HTTP/1.1",
            ]
        );
        let action = &req.actions[0];
        assert!(action.src_pkg.is_none());
        let target = action.tgt_pkg.as_ref().unwrap();
        assert_eq!(target.rev.as_deref(), Some("3"));
        assert_eq!(target.files.len(), 1);
        assert_eq!(target.files[0].name, "hello.spec");
    }

    #[test]
    fn test_closed_request_skips_package_fetch() {
        // Only one connection is served; a package GET would be refused.
        let (obs, server) = serve(vec![(200, "OK", submit_request("deleted"))]);

        let req = obs.fetch_request("5").unwrap();
        let lines = server.join().unwrap();

        assert_eq!(lines.len(), 1);
        assert!(!req.state.is_actionable());
        assert!(req.actions[0].src_pkg.is_none());
        assert!(req.actions[0].tgt_pkg.is_none());
    }

    #[test]
    fn test_server_error_carries_status_summary() {
        let body = "<status code=\"403\">\n  <summary>forbidden here</summary>\n</status>";
        let (obs, server) = serve(vec![(403, "Forbidden", body.to_string())]);

        let err = obs.fetch_request("5").unwrap_err();
        server.join().unwrap();

        let message = err.to_string();
        assert!(message.contains("403"), "{message}");
        assert!(message.contains("forbidden here"), "{message}");
    }

    #[test]
    fn test_package_listing_error_is_fatal() {
        let (obs, server) = serve(vec![
            (200, "OK", submit_request("review")),
            (500, "Internal Server Error", String::new()),
        ]);

        let err = obs.fetch_request("5").unwrap_err();
        server.join().unwrap();

        assert!(err.to_string().contains("Failed to list source files of home:alice/hello@7"));
        assert!(err.chain().any(|cause| cause.to_string().contains("500")));
    }

    #[test]
    fn test_missing_request_is_error() {
        let (obs, server) = serve(vec![(404, "Not Found", String::new())]);

        let err = obs.fetch_request("999").unwrap_err();
        server.join().unwrap();

        assert!(err.to_string().contains("Request '999' not found"));
    }
}
