use banter_content::ContentElement;

/// Consumer of parse passes during streaming.
///
/// Every delivery carries the complete element list for the message so far.
/// Interim passes replace the previous render wholesale rather than append,
/// which is what full reparsing buys: the sink never has to reconcile.
pub trait RenderSink {
    fn replace(&self, elements: Vec<ContentElement>);

    /// Delivered exactly once, after the untruncated final parse.
    fn complete(&self, elements: Vec<ContentElement>);
}
