use http::Method;
use std::any::Any;
use thiserror::Error;

/// A failure that escaped the handler chain.
#[derive(Debug, Error)]
pub enum Fault {
	/// A handler panicked and no middleware recovered it.
	#[error("handler for {method} {path} panicked: {message}")]
	Panicked {
		method: Method,
		path: String,
		message: String,
	},
}

/// Extract a readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		(*s).to_owned()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"unknown panic".to_owned()
	}
}
