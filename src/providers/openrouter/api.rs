use gemrouter_schema::ChatCompletionRequest;
use reqwest::header::{ACCEPT, HeaderValue};
use url::Url;

pub struct OpenRouterApi;

impl OpenRouterApi {
    /// `{base}/chat/completions`, tolerating a trailing slash on `base`.
    pub fn chat_completions_url(base: &Url) -> Result<Url, url::ParseError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["chat", "completions"]);
        Ok(url)
    }

    pub fn build_chat_request(
        client: &reqwest::Client,
        chat_url: &Url,
        api_key: &str,
        body: &ChatCompletionRequest,
    ) -> Result<reqwest::Request, reqwest::Error> {
        let mut builder = client.post(chat_url.clone()).bearer_auth(api_key).json(body);
        if body.stream {
            builder = builder.header(ACCEPT, HeaderValue::from_static("text/event-stream"));
        }
        builder.build()
    }
}
