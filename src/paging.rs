//! Walking list endpoints page by page.
//!
//! [`paginate`] turns any `start`/`limit` list call into a stream of
//! individual results. Each page is requested only after the previous one
//! has been fully consumed, passing its `nextToken` as the next `start`.

use futures::stream::{self, Stream};
use serde_json::Value;
use std::collections::VecDeque;
use std::future::Future;

use crate::models::{ListResponse, Paging};
use crate::types::*;

enum Cursor {
    First,
    Next(String),
    Done,
}

struct PageState<F> {
    fetch: F,
    limit: Option<u32>,
    cursor: Cursor,
    buffer: VecDeque<Value>,
}

/// Stream every result of a list endpoint.
///
/// The stream ends after a page without a `nextToken`, after an empty page,
/// or right after yielding an error.
///
/// ```no_run
/// # use futures::TryStreamExt;
/// # async fn run(client: oae_rest::RestClient) -> oae_rest::RestResult<()> {
/// let groups = client.groups();
/// let members: Vec<_> = oae_rest::paginate(Some(25), |paging| groups.members("g:cam:abc", paging))
///     .try_collect()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub fn paginate<F, Fut>(limit: Option<u32>, fetch: F) -> impl Stream<Item = RestResult<Value>>
where
    F: FnMut(Paging) -> Fut,
    Fut: Future<Output = RestResult<ListResponse>>,
{
    let state = PageState {
        fetch,
        limit,
        cursor: Cursor::First,
        buffer: VecDeque::new(),
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.buffer.pop_front() {
                return Some((Ok(item), state));
            }

            let start = match std::mem::replace(&mut state.cursor, Cursor::Done) {
                Cursor::Done => return None,
                Cursor::First => None,
                Cursor::Next(token) => Some(token),
            };

            let paging = Paging {
                start,
                limit: state.limit,
            };

            match (state.fetch)(paging).await {
                Ok(page) => {
                    if !page.results.is_empty() {
                        if let Some(token) = page.next_token {
                            state.cursor = Cursor::Next(token);
                        }
                    }
                    state.buffer.extend(page.results);
                }
                Err(err) => return Some((Err(err), state)),
            }
        }
    })
}
