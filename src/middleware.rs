use crate::{panic_message, Context};
use http::StatusCode;
use std::{
	backtrace::Backtrace,
	panic::{self, AssertUnwindSafe},
	time::Instant,
};

/// Log the status, path and time taken once the rest of the chain has run.
pub fn logger() -> impl Fn(&mut Context) + Send + Sync + 'static {
	|c: &mut Context| {
		let start = Instant::now();
		c.next();
		tracing::info!(
			status = c.status_code().as_u16(),
			method = %c.method(),
			path = %c.path(),
			elapsed = ?start.elapsed(),
			"request handled"
		);
	}
}

/// Turn a panic anywhere downstream into a `500 Internal Server Error`.
///
/// Middleware registered before this one still gets to run its code after `next()`.
pub fn recovery() -> impl Fn(&mut Context) + Send + Sync + 'static {
	|c: &mut Context| {
		if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| c.next())) {
			let message = panic_message(&*payload);
			let trace = Backtrace::force_capture();
			tracing::error!(
				method = %c.method(),
				path = %c.path(),
				%message,
				"recovered from handler panic\n{}",
				trace
			);
			c.fail(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
		}
	}
}
