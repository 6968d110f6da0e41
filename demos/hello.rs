use geode::{Engine, HttpEngine, StatusCode};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let mut engine = Engine::with_default_middleware();
	engine
		.get("/", |c| c.string(StatusCode::OK, "Hello Geektutu\n"))
		// index out of range, caught by the recovery middleware
		.get("/panic", |c| {
			let names = vec!["geektutu"];
			let index = names.len() + 99;
			c.string(StatusCode::OK, names[index]);
		});

	let mut v1 = engine.group("/v1");
	v1.get("/hello/:name", |c| {
		let body = format!("hello {}, you're at {}\n", c.param("name"), c.path());
		c.string(StatusCode::OK, body);
	})
	.get("/assets/*filepath", |c| {
		let body = serde_json::json!({ "filepath": c.param("filepath") });
		c.json(StatusCode::OK, &body);
	});

	let addr: SocketAddr = ([127, 0, 0, 1], 9999).into();
	HttpEngine::from(engine).serve(&addr).await
}
