use banter_content::ContentElement;
use tokio_stream::Stream;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::session::StreamSession;
use crate::sink::RenderSink;

/// Consume a chunk source to completion: push each delta into the session,
/// deliver throttled interim renders, then the final untruncated render.
///
/// Cancellation is dropping the future (or ending the stream early); no
/// final render is produced in that case and the session is discarded.
pub async fn drive<S>(
    mut chunks: S,
    mut session: StreamSession,
    sink: &impl RenderSink,
) -> Vec<ContentElement>
where
    S: Stream<Item = String> + Unpin,
{
    while let Some(chunk) = chunks.next().await {
        session.push(&chunk);
        if let Some(elements) = session.render(tokio::time::Instant::now().into_std()) {
            sink.replace(elements);
        }
    }
    debug!("stream.drive source ended, finalizing");
    let elements = session.finalize();
    sink.complete(elements.clone());
    elements
}
