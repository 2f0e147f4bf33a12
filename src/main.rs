use clap::Parser;
use corridor::dispatcher::Dispatcher;
use corridor::middleware::MiddlewareRef;
use corridor::registry::Registry;
use corridor::router::{HandlerRef, Router};
use corridor::runtime_config::RuntimeConfig;
use corridor::server::{AppService, HttpServer};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Serve the demo routes.
#[derive(Parser, Debug)]
#[command(name = "corridor", about = "Registry-driven HTTP request router")]
struct Args {
    /// Address to bind
    #[arg(long, env = "CORRIDOR_ADDR", default_value = "0.0.0.0:8080")]
    addr: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = RuntimeConfig::from_env();
    may::config().set_stack_size(config.stack_size);

    let mut registry = Registry::new();
    corridor::controllers::register_all(&mut registry);

    let mut router = Router::new();
    router
        .prefix("/home")
        .get("/", HandlerRef::method("home", "index"))
        .post("/", HandlerRef::method("home", "view"))
        .save();
    router
        .get("/agents", HandlerRef::method("agent", "all"))
        .save();
    router
        .middleware(vec![MiddlewareRef::method("auth", "verify_token", vec![])])
        .post("/agents", HandlerRef::method("agent", "create"))
        .save();

    router.dump_routes();

    let service = AppService::new(Arc::new(router), Arc::new(Dispatcher::new(registry)));
    let handle = HttpServer(service).start(args.addr.as_str())?;
    println!("listening on {}", args.addr);
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("server coroutine panicked"))?;
    Ok(())
}
