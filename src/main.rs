extern crate env_logger;
extern crate hermes_blog;
extern crate iron;
extern crate logger;
extern crate router;

use std::process;

use iron::prelude::Chain;
use iron::Iron;
use log::{error, info};
use logger::Logger;
use router::Router;

use hermes_blog::handlers::*;
use hermes_blog::{Blog, Config, JsonDatabase};

// RUST_LOG=info BLOG_POSTS_FILE=/var/lib/hermes/posts.json hermes_blog > logs 2>&1 &
fn main() {
    env_logger::init();
    let config = Config::from_env();

    let database = match JsonDatabase::open(&config.posts_file) {
        Ok(database) => database,
        Err(e) => {
            error!("cannot open {}: {}", config.posts_file.display(), e);
            process::exit(1);
        }
    };

    let handlers = Handlers::new(Blog::new(database));
    let (logger_before, logger_after) = Logger::new(None);

    let mut router = Router::new();
    router.get("/posts", handlers.list, "list");
    router.post("/posts", handlers.add, "add");
    router.get("/posts/:id", handlers.post, "post");
    router.put("/posts/:id", handlers.update, "update");
    router.delete("/posts/:id", handlers.delete, "delete");
    router.post("/posts/:id/like", handlers.like, "like");

    let mut chain = Chain::new(router);
    chain.link_before(logger_before); // Should be first!
    chain.link_after(JsonAfterMiddleware);
    chain.link_after(logger_after); // Should be last!

    info!(
        "serving posts from {} on {}",
        config.posts_file.display(),
        config.addr
    );
    if let Err(e) = Iron::new(chain).http(config.addr.as_str()) {
        error!("cannot listen on {}: {}", config.addr, e);
        process::exit(1);
    }
}
