//! Response-consumer capability.

use crate::frame::ResponseFrame;

/// Consumer of decoded frames, owned by the transport.
///
/// The transport typically keys delivery off a FIFO of pending requests:
/// [`deliver_complete`](Self::deliver_complete) finishes the request at the
/// head of the queue, while [`deliver_partial`](Self::deliver_partial)
/// keeps it active for the remainder of a multi-entry reply. Frames arrive
/// in wire order.
pub trait ResponseSink {
    /// Final frame of the current response.
    fn deliver_complete(&mut self, frame: ResponseFrame);

    /// Intermediate multi-entry frame; more frames follow for the same
    /// request.
    fn deliver_partial(&mut self, frame: ResponseFrame);
}

/// Sink that records every delivered frame in order.
///
/// Useful for tests and for simple clients that issue one request at a
/// time.
#[derive(Debug, Default)]
pub struct CollectedFrames {
    frames: Vec<ResponseFrame>,
}

impl CollectedFrames {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Frames delivered so far, in wire order.
    #[must_use]
    pub fn frames(&self) -> &[ResponseFrame] { &self.frames }

    /// Consume the sink, yielding the delivered frames.
    #[must_use]
    pub fn into_frames(self) -> Vec<ResponseFrame> { self.frames }
}

impl ResponseSink for CollectedFrames {
    fn deliver_complete(&mut self, frame: ResponseFrame) { self.frames.push(frame); }

    fn deliver_partial(&mut self, frame: ResponseFrame) { self.frames.push(frame); }
}
