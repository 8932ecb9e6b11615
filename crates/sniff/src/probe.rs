//! Per-call inspection context handed to every sniffer.

use core::fmt;

use buffer::RingBuffer;

/// Which side of a connection a sniffer inspects.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Direction {
    /// Client to server bytes.
    #[default]
    Request,
    /// Server to client bytes.
    Response,
}

impl Direction {
    /// Returns the identifier used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
        }
    }

    /// Returns `true` for the client to server direction.
    #[must_use]
    #[inline]
    pub const fn is_request(self) -> bool {
        matches!(self, Self::Request)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pair of buffers owned by one connection.
///
/// The response side is absent until the connection has a server side.
#[derive(Clone, Copy, Debug)]
pub struct Stream<'a> {
    request: &'a RingBuffer,
    response: Option<&'a RingBuffer>,
}

impl<'a> Stream<'a> {
    /// Creates a stream with only a request buffer.
    #[must_use]
    pub const fn new(request: &'a RingBuffer) -> Self {
        Self {
            request,
            response: None,
        }
    }

    /// Attaches the response buffer.
    #[must_use]
    pub const fn with_response(mut self, response: &'a RingBuffer) -> Self {
        self.response = Some(response);
        self
    }

    /// Buffer of the given direction, if present.
    #[must_use]
    pub const fn buffer(&self, direction: Direction) -> Option<&'a RingBuffer> {
        match direction {
            Direction::Request => Some(self.request),
            Direction::Response => self.response,
        }
    }

    /// Builds the probe for one sniffer invocation.
    #[must_use]
    pub const fn probe(&self, direction: Direction, closed: bool) -> Probe<'a> {
        Probe {
            buffer: self.buffer(direction),
            direction,
            closed,
        }
    }
}

/// Inspection context for one sniffer call: the selected buffer, the
/// direction it was selected for and whether more bytes can still arrive.
#[derive(Clone, Copy, Debug)]
pub struct Probe<'a> {
    buffer: Option<&'a RingBuffer>,
    direction: Direction,
    closed: bool,
}

impl<'a> Probe<'a> {
    /// Probes `buffer` in the given direction.
    #[must_use]
    pub const fn new(buffer: &'a RingBuffer, direction: Direction, closed: bool) -> Self {
        Self {
            buffer: Some(buffer),
            direction,
            closed,
        }
    }

    /// Probes a request buffer that may still receive data.
    #[must_use]
    pub const fn request(buffer: &'a RingBuffer) -> Self {
        Self::new(buffer, Direction::Request, false)
    }

    /// Probes a response buffer that may still receive data.
    #[must_use]
    pub const fn response(buffer: &'a RingBuffer) -> Self {
        Self::new(buffer, Direction::Response, false)
    }

    /// Marks whether the stream can still deliver bytes.
    #[must_use]
    pub const fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// Selected buffer, absent when the direction has none yet.
    #[must_use]
    pub const fn buffer(&self) -> Option<&'a RingBuffer> {
        self.buffer
    }

    /// Direction the buffer was selected for.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns `true` once no more bytes can arrive.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}
