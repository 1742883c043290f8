use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::{error::FetchError, model::VillageResponse};

use super::{ForecastQuery, ForecastSource};

pub const DEFAULT_BASE_URL: &str =
    "http://apis.data.go.kr/1360000/VilageFcstInfoService_2.0/getVilageFcst";

/// Village forecast client for the KMA open API (data.go.kr).
#[derive(Debug, Clone)]
pub struct KmaClient {
    base_url: String,
    http: Client,
}

impl KmaClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Fatal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }
}

#[async_trait]
impl ForecastSource for KmaClient {
    async fn village_forecast(
        &self,
        query: &ForecastQuery<'_>,
    ) -> Result<VillageResponse, FetchError> {
        log::debug!(
            "GET {} base={} grid={}/{}",
            self.base_url,
            query.base,
            query.grid.nx,
            query.grid.ny
        );

        let res = self
            .http
            .get(&self.base_url)
            .query(&query.params())
            .send()
            .await?;

        let status = res.status();
        if status != StatusCode::OK {
            log::warn!("KMA request failed with status {status}");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = res.text().await?;
        log::debug!("received {} bytes", body.len());

        let parsed: VillageResponse = serde_json::from_str(&body).map_err(|e| {
            log::error!("undecodable KMA response: {}", truncate_body(&body));
            FetchError::from(e)
        })?;

        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BaseTime, GridLocation};
    use chrono::NaiveDate;
    use std::{
        io::{Read, Write},
        net::{TcpListener, TcpStream},
        sync::mpsc::{self, Receiver},
        thread,
    };

    const FORECAST_JSON: &str = concat!(
        r#"{"response":{"header":{"resultCode":"00","resultMsg":"NORMAL_SERVICE"},"#,
        r#""body":{"items":{"item":[{"category":"TMP","fcstDate":"20240510","#,
        r#""fcstTime":"1500","fcstValue":"21"}]}}}}"#,
    );

    fn query() -> ForecastQuery<'static> {
        ForecastQuery {
            service_key: "KEY",
            base: BaseTime {
                date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                hour: 14,
            },
            grid: GridLocation { nx: 61, ny: 119 },
        }
    }

    fn read_head(stream: &mut TcpStream) -> String {
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => head.extend_from_slice(&buf[..n]),
            }
        }
        String::from_utf8_lossy(&head).into_owned()
    }

    /// Accept one connection, hand its request head back, then answer with `reply`.
    fn serve_once(reply: String, delay: Duration) -> (String, Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let _ = tx.send(read_head(&mut stream));
                thread::sleep(delay);
                let _ = stream.write_all(reply.as_bytes());
            }
        });

        (format!("http://{addr}/getVilageFcst"), rx)
    }

    fn http_reply(status: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    async fn fetch_from(url: &str, timeout: Duration) -> Result<VillageResponse, FetchError> {
        let client = KmaClient::new(url, timeout).unwrap();
        client.village_forecast(&query()).await
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "가".repeat(300);
        assert_eq!(truncate_body(&body).chars().count(), 200);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn client_keeps_base_url() {
        let client = KmaClient::new(DEFAULT_BASE_URL, Duration::from_secs(7)).unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn ok_response_is_decoded_and_query_sent() {
        let reply = http_reply("200 OK", "application/json", FORECAST_JSON);
        let (url, requests) = serve_once(reply, Duration::ZERO);

        let parsed = fetch_from(&url, Duration::from_secs(5)).await.unwrap();
        let items = parsed.into_items().unwrap();
        assert_eq!(items[0].fcst_value, "21");

        let head = requests.recv().unwrap();
        assert!(head.starts_with("GET /getVilageFcst?"));
        for param in [
            "serviceKey=KEY",
            "numOfRows=1000",
            "dataType=JSON",
            "base_date=20240510",
            "base_time=1400",
            "nx=61",
            "ny=119",
        ] {
            assert!(head.contains(param), "missing {param} in {head}");
        }
    }

    #[tokio::test]
    async fn server_error_status_is_http_token() {
        let reply = http_reply("500 Internal Server Error", "text/plain", "oops");
        let (url, _requests) = serve_once(reply, Duration::ZERO);

        let err = fetch_from(&url, Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err.token(), "HTTP_500");
    }

    #[tokio::test]
    async fn other_2xx_status_is_http_token() {
        let reply = "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string();
        let (url, _requests) = serve_once(reply, Duration::ZERO);

        let err = fetch_from(&url, Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err.token(), "HTTP_204");
    }

    #[tokio::test]
    async fn closed_port_is_network_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{addr}/getVilageFcst");
        let err = fetch_from(&url, Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err.token(), "NET_FAIL");
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let reply = http_reply("200 OK", "application/json", FORECAST_JSON);
        let (url, _requests) = serve_once(reply, Duration::from_secs(3));

        let err = fetch_from(&url, Duration::from_secs(1)).await.unwrap_err();
        assert_eq!(err.token(), "TIMEOUT");
    }

    #[tokio::test]
    async fn xml_error_page_is_fatal() {
        let body = "<OpenAPI_ServiceResponse><cmmMsgHeader>\
                    <returnReasonCode>30</returnReasonCode>\
                    </cmmMsgHeader></OpenAPI_ServiceResponse>";
        let reply = http_reply("200 OK", "text/xml", body);
        let (url, _requests) = serve_once(reply, Duration::ZERO);

        let err = fetch_from(&url, Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err.token(), "FATAL_ERR");
    }
}
