use http::{Response, StatusCode};

/// Where a finished response goes. Transports implement this to write the status, headers and
/// body back to the client.
pub trait ResponseSink {
	fn send(&mut self, response: Response<Vec<u8>>);
}

/// A sink that keeps the response in memory.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
	response: Option<Response<Vec<u8>>>,
}

impl ResponseRecorder {
	pub fn new() -> Self {
		Self::default()
	}

	/// The recorded response, if one was sent.
	pub fn response(&self) -> Option<&Response<Vec<u8>>> {
		self.response.as_ref()
	}

	pub fn into_response(self) -> Option<Response<Vec<u8>>> {
		self.response
	}

	pub fn status(&self) -> Option<StatusCode> {
		self.response.as_ref().map(Response::status)
	}

	/// The recorded body as text; empty if nothing was sent or the body is not UTF-8.
	pub fn body_str(&self) -> &str {
		self.response
			.as_ref()
			.and_then(|response| std::str::from_utf8(response.body()).ok())
			.unwrap_or_default()
	}
}

impl ResponseSink for ResponseRecorder {
	fn send(&mut self, response: Response<Vec<u8>>) {
		self.response = Some(response);
	}
}
