use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// 查询失败时显示的占位文本
pub const FETCH_FAILED: &str = "获取失败";

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    info: ProjectInfo,
}

/// PyPI `info` 对象中用到的字段
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProjectInfo {
    pub name: Option<String>,
    pub author: Option<String>,
    pub home_page: Option<String>,
    pub summary: Option<String>,
}

impl ProjectInfo {
    /// 详情面板中的显示文本
    pub fn to_detail_text(&self) -> String {
        fn field(v: &Option<String>) -> &str {
            match v.as_deref() {
                Some(s) if !s.trim().is_empty() => s,
                _ => "None",
            }
        }
        format!(
            "名称: {}\n作者: {}\n主页: {}\n简介: {}\n",
            field(&self.name),
            field(&self.author),
            field(&self.home_page),
            field(&self.summary),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("请求失败: {0}")]
    Http(#[from] reqwest::Error),
    #[error("PyPI 返回状态码 {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Clone)]
pub struct PypiClient {
    client: Client,
    index_url: String,
}

impl PypiClient {
    pub fn new(index_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            index_url: index_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn project_url(&self, name: &str) -> String {
        format!("{}/pypi/{}/json", self.index_url, name)
    }

    pub async fn fetch(&self, name: &str) -> Result<ProjectInfo, LookupError> {
        let response = self.client.get(self.project_url(name)).send().await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        let body: ProjectResponse = response.json().await?;
        Ok(body.info)
    }

    /// 查询并格式化；任何失败都降级为占位文本
    pub async fn describe(&self, name: &str) -> String {
        match self.fetch(name).await {
            Ok(info) => info.to_detail_text(),
            Err(e) => {
                log::debug!("PyPI 查询 {} 失败: {}", name, e);
                FETCH_FAILED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_url_strips_trailing_slash() {
        let client = PypiClient::new("https://pypi.org/", Duration::from_secs(3)).expect("client");
        assert_eq!(client.project_url("requests"), "https://pypi.org/pypi/requests/json");
    }

    #[test]
    fn parses_info_and_ignores_other_fields() {
        let body = r#"{
            "info": {
                "name": "requests",
                "author": "Kenneth Reitz",
                "home_page": "https://requests.readthedocs.io",
                "summary": "Python HTTP for Humans.",
                "version": "2.31.0"
            },
            "releases": {}
        }"#;
        let parsed: ProjectResponse = serde_json::from_str(body).expect("parse");
        let text = parsed.info.to_detail_text();
        assert!(text.contains("名称: requests"));
        assert!(text.contains("作者: Kenneth Reitz"));
        assert!(text.contains("简介: Python HTTP for Humans."));
    }

    #[test]
    fn null_and_blank_fields_render_as_none() {
        let info: ProjectInfo =
            serde_json::from_str(r#"{"name": "x", "author": "", "home_page": null}"#).expect("parse");
        let text = info.to_detail_text();
        assert!(text.contains("作者: None"));
        assert!(text.contains("主页: None"));
        assert!(text.contains("简介: None"));
    }

    #[tokio::test]
    async fn unreachable_index_degrades_to_placeholder() {
        let client =
            PypiClient::new("http://127.0.0.1:9", Duration::from_millis(500)).expect("client");
        assert_eq!(client.describe("requests").await, FETCH_FAILED);
    }
}
