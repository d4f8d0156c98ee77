use crate::types::{AppError, Paper, Result};
use std::time::Duration;

/// Client for the arXiv Atom query API.
pub struct ArxivClient {
    http: reqwest::Client,
    base_url: String,
}

impl ArxivClient {
    pub fn new(base_url: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search for papers, relevance-sorted. `max_results` is clamped to 1..=50.
    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Paper>> {
        let max_results = max_results.clamp(1, 50);
        let url = format!("{}/query", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("search_query", format!("all:{}", query)),
                ("start", "0".to_string()),
                ("max_results", max_results.to_string()),
                ("sortBy", "relevance".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Source(format!("arXiv request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Source(format!("arXiv API error: {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Source(format!("Failed to read arXiv response: {}", e)))?;

        let papers = parse_feed(&body)?;
        tracing::info!("Found {} papers for query: {}", papers.len(), query);
        Ok(papers)
    }

    /// Get a specific paper by its arXiv ID (e.g. "2301.12345").
    pub async fn get_by_id(&self, arxiv_id: &str) -> Result<Paper> {
        let url = format!("{}/query", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("id_list", arxiv_id)])
            .send()
            .await
            .map_err(|e| AppError::Source(format!("arXiv request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Source(format!("arXiv API error: {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Source(format!("Failed to read arXiv response: {}", e)))?;

        parse_feed(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("arXiv paper not found: {}", arxiv_id)))
    }
}

/// Parse an arXiv Atom feed into papers.
///
/// Entries missing optional fields (doi, journal_ref) get empty strings,
/// matching the upstream feed where those elements are simply absent.
fn parse_feed(xml: &str) -> Result<Vec<Paper>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut papers = Vec::new();
    let mut entry: Option<Paper> = None;
    let mut authors: Vec<String> = Vec::new();
    let mut categories: Vec<String> = Vec::new();
    let mut current: Vec<u8> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(quick_xml::events::Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"entry" {
                    entry = Some(Paper::default());
                    authors.clear();
                    categories.clear();
                }
                current = name;
            }
            Ok(quick_xml::events::Event::Empty(e)) => {
                if let Some(paper) = entry.as_mut() {
                    match e.local_name().as_ref() {
                        b"primary_category" => {
                            if let Some(term) = attribute(&e, b"term") {
                                paper.primary_category = term;
                            }
                        }
                        b"category" => {
                            if let Some(term) = attribute(&e, b"term") {
                                categories.push(term);
                            }
                        }
                        b"link" => {
                            // The PDF link carries title="pdf"
                            if attribute(&e, b"title").as_deref() == Some("pdf") {
                                if let Some(href) = attribute(&e, b"href") {
                                    paper.pdf_url = href;
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            Ok(quick_xml::events::Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| AppError::Source(format!("Invalid arXiv feed text: {}", e)))?
                    .trim()
                    .to_string();
                if text.is_empty() {
                    continue;
                }

                if let Some(paper) = entry.as_mut() {
                    match current.as_slice() {
                        b"title" => paper.title = text,
                        b"summary" => paper.summary = text,
                        b"published" => paper.published = date_only(&text),
                        b"updated" => paper.updated = date_only(&text),
                        b"id" => {
                            // e.g. http://arxiv.org/abs/2301.12345v1
                            paper.arxiv_id =
                                text.rsplit('/').next().unwrap_or_default().to_string();
                        }
                        b"name" => authors.push(text),
                        b"doi" => paper.doi = text,
                        b"journal_ref" => paper.journal_ref = text,
                        _ => {}
                    }
                }
            }
            Ok(quick_xml::events::Event::End(e)) => {
                if e.local_name().as_ref() == b"entry" {
                    if let Some(mut paper) = entry.take() {
                        paper.authors = authors.join(", ");
                        paper.categories = categories.join(", ");
                        papers.push(paper);
                    }
                }
                current.clear();
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => {
                return Err(AppError::Source(format!("Invalid arXiv feed: {}", e)));
            }
            _ => {}
        }
    }

    Ok(papers)
}

fn attribute(e: &quick_xml::events::BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| String::from_utf8(a.value.into_owned()).ok())
}

/// arXiv timestamps are RFC3339; the API surfaces dates only.
fn date_only(timestamp: &str) -> String {
    timestamp.chars().take(10).collect()
}
