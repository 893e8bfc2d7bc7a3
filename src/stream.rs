//! Streaming support for the generative engines.
//!
//! All streaming vendors here speak server-sent events; `eventsource-stream`
//! handles UTF-8 boundaries, line buffering and SSE framing, so engines only
//! supply a per-event parser that extracts the text delta.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::Stream;
use futures_util::StreamExt;

use crate::error::TranslateError;

/// A stream of incremental translated-text deltas.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, TranslateError>> + Send>>;

/// Adapt an SSE response into a `TextStream`.
///
/// `parse` maps one event's `data` payload to an optional text delta;
/// `Ok(None)` skips bookkeeping events. The `[DONE]` sentinel used by the
/// chat-completions vendors terminates silently.
pub(crate) fn sse_text_stream<F>(response: reqwest::Response, parse: F) -> TextStream
where
    F: Fn(&str) -> Result<Option<String>, TranslateError> + Send + Sync + 'static,
{
    let stream = response
        .bytes_stream()
        .eventsource()
        .filter_map(move |event| {
            let item = match event {
                Ok(event) => {
                    let data = event.data;
                    if data.trim() == "[DONE]" {
                        None
                    } else {
                        match parse(&data) {
                            Ok(Some(delta)) if !delta.is_empty() => Some(Ok(delta)),
                            Ok(_) => None,
                            Err(e) => Some(Err(e)),
                        }
                    }
                }
                Err(e) => Some(Err(TranslateError::HttpError(format!(
                    "stream error: {e}"
                )))),
            };
            futures::future::ready(item)
        });
    Box::pin(stream)
}

/// Drain a `TextStream` into the full translated string.
pub async fn collect(mut stream: TextStream) -> Result<String, TranslateError> {
    let mut out = String::new();
    while let Some(delta) = stream.next().await {
        out.push_str(&delta?);
    }
    Ok(out)
}
