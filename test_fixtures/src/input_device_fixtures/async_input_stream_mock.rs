// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Duration;

use async_stream::stream;

use crate::PinnedInputStream;

/// Generate a stream that yields every item in `generator_vec` and then ends. An ended
/// stream is how a host reports that its terminal surface was closed.
pub fn gen_input_stream<T>(generator_vec: Vec<T>) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    let it = stream! {
        for item in generator_vec {
            yield item;
        }
    };
    Box::pin(it)
}

/// Same as [`gen_input_stream`], but sleeps for `delay` before yielding each item.
pub fn gen_input_stream_with_delay<T>(
    generator_vec: Vec<T>,
    delay: Duration,
) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    let it = stream! {
        for item in generator_vec {
            tokio::time::sleep(delay).await;
            yield item;
        }
    };
    Box::pin(it)
}

/// Convenience for the common case of keypress tokens given as string slices.
#[must_use]
pub fn gen_token_stream(tokens: &[&str]) -> PinnedInputStream<String> {
    gen_input_stream(tokens.iter().map(ToString::to_string).collect())
}
