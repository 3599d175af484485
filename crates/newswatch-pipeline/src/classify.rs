//! Relevance classifier gate: asks a text oracle whether each row's body text
//! is an article and drops the rows it rejects.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{json, Value};

use crate::error::{FetchError, PipelineError};
use crate::table::ResultTable;

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const MAX_TOKENS: u32 = 10;

/// Decides whether a piece of text is an article.
///
/// `Ok(Some(verdict))` is a decision, `Ok(None)` means the oracle declined to
/// decide, `Err` is a failed call.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn is_article(&self, text: &str) -> Result<Option<bool>, FetchError>;
}

/// What to do with a row when the classifier call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassifierFailurePolicy {
    /// Keep the row with its verdict undecided.
    #[default]
    Retain,
    /// Drop the row as if the answer had been "no".
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyReport {
    /// Rows whose body text was sent to the classifier.
    pub checked: usize,
    pub rejected: usize,
    /// Rows kept because the classifier failed or declined to decide.
    pub undecided: usize,
    /// Rows kept without a call because they have no body text.
    pub skipped_without_text: usize,
}

/// `true` only for an affirmative answer: "yes" in any case, ignoring
/// surrounding whitespace, quotes, and trailing punctuation.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    answer
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '*' || c == '`')
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim()
        .eq_ignore_ascii_case("yes")
}

/// Run `classifier` over every row that has body text.
///
/// Rows without body text are never sent and never removed. Rows the
/// classifier rejects are removed. A failed call removes the row only under
/// [`ClassifierFailurePolicy::Reject`].
pub async fn classify(
    table: ResultTable,
    classifier: &dyn TextClassifier,
    policy: ClassifierFailurePolicy,
) -> (ResultTable, ClassifyReport) {
    let mut report = ClassifyReport::default();
    let total = table.len();
    let mut keep = Vec::with_capacity(total);

    for (index, record) in table.rows().iter().enumerate() {
        let Some(text) = record.body_text.as_deref().filter(|t| !t.trim().is_empty()) else {
            report.skipped_without_text += 1;
            keep.push(true);
            continue;
        };

        report.checked += 1;
        let retained = match classifier.is_article(text).await {
            Ok(Some(true)) => true,
            Ok(Some(false)) => {
                tracing::debug!(index = index + 1, total, link = %record.link, "classified as non-article");
                false
            }
            Ok(None) => {
                report.undecided += 1;
                true
            }
            Err(e) => {
                tracing::warn!(
                    index = index + 1,
                    total,
                    link = %record.link,
                    error = %e,
                    ?policy,
                    "classifier call failed"
                );
                if policy == ClassifierFailurePolicy::Retain {
                    report.undecided += 1;
                }
                policy == ClassifierFailurePolicy::Retain
            }
        };
        if !retained {
            report.rejected += 1;
        }
        keep.push(retained);
    }

    let mut verdicts = keep.into_iter();
    let table = table.retain(|_| verdicts.next().unwrap_or(true));
    (table, report)
}

/// Classifier backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct LlmClassifier {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl LlmClassifier {
    /// `base_url` is the API root, e.g. `https://router.huggingface.co/v1`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidUrl`] if `base_url` does not parse, or
    /// [`PipelineError::Client`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, PipelineError> {
        let endpoint = Url::parse(&format!("{}/chat/completions", base_url.trim_end_matches('/')))
            .map_err(|e| PipelineError::InvalidUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn prompt(text: &str) -> String {
        format!(
            "Determine if the following text is an article or not:\n\n{text}\n\nAnswer with 'Yes' for article and 'No' for non-article."
        )
    }
}

#[async_trait]
impl TextClassifier for LlmClassifier {
    async fn is_article(&self, text: &str) -> Result<Option<bool>, FetchError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::prompt(text) }
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": 0.0
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.without_url().to_string()))?;
        let answer = payload
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| FetchError::Malformed("missing choices[0].message.content".to_string()))?;

        tracing::debug!(answer, "classifier answered");
        Ok(Some(is_affirmative(answer)))
    }
}
