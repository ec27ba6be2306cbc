use std::collections::BTreeMap;
use std::io::Read;
use std::sync::{Arc, Mutex};

use iron::headers::ContentType;
use iron::status::{self, Status};
use iron::{AfterMiddleware, Handler, IronResult, Request, Response};
use router::Router;
use rustc_serialize::json::{self, Json};

use crate::blog::Blog;
use crate::database::Database;
use crate::error::Error;
use crate::model::PostForm;

/// Unwrap a `Result` or answer with an error body.
/// Blog errors pick their own status; the second form forces one.
macro_rules! try_handler {
    ( $e:expr ) => {
        match $e {
            Ok(x) => x,
            Err(e) => {
                let e = Error::from(e);
                return Ok(Response::with((status_for(&e), error_body(&e))));
            }
        }
    };
    ( $e:expr, $error:expr ) => {
        match $e {
            Ok(x) => x,
            Err(e) => return Ok(Response::with(($error, error_body(&e)))),
        }
    };
}

/// Lock a `Mutex`. A poisoned lock means a handler panicked mid-operation,
/// which we do not try to recover from.
macro_rules! lock {
    ( $e:expr ) => {
        $e.lock().unwrap()
    };
}

/// Get the value of a parameter in the URI.
/// If the parameter was absent, return `400 Bad Request`.
/// If we could not obtain the parameter list, return `500 Internal Server Error`.
macro_rules! get_http_param {
    ( $r:expr, $e:expr ) => {
        match $r.extensions.get::<Router>() {
            Some(router) => match router.find($e) {
                Some(val) => val,
                None => return Ok(Response::with(status::BadRequest)),
            },
            None => return Ok(Response::with(status::InternalServerError)),
        }
    };
}

pub fn status_for(error: &Error) -> Status {
    match *error {
        Error::NotFound(_) => status::NotFound,
        Error::Validation(_) => status::BadRequest,
        Error::Io(_) | Error::StorageCorrupt { .. } | Error::Encode(_) => {
            status::InternalServerError
        }
    }
}

pub fn error_body<E: ToString>(error: &E) -> String {
    let mut body = BTreeMap::new();
    body.insert("error".to_string(), Json::String(error.to_string()));
    Json::Object(body).to_string()
}

fn parse_id(raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .map_err(|_| format!("`{}` is not a post id", raw))
}

fn read_form(req: &mut Request) -> Result<PostForm, String> {
    let mut payload = String::new();
    req.body
        .read_to_string(&mut payload)
        .map_err(|e| e.to_string())?;
    json::decode(&payload).map_err(|e| e.to_string())
}

type SharedBlog<D> = Arc<Mutex<Blog<D>>>;

pub struct Handlers<D> {
    pub list: ListHandler<D>,
    pub add: AddHandler<D>,
    pub post: PostHandler<D>,
    pub update: UpdateHandler<D>,
    pub delete: DeleteHandler<D>,
    pub like: LikeHandler<D>,
}

impl<D: Database> Handlers<D> {
    /// All handlers share one blog, so each request's load-change-save
    /// runs to completion before the next begins.
    pub fn new(blog: Blog<D>) -> Handlers<D> {
        let blog = Arc::new(Mutex::new(blog));
        Handlers {
            list: ListHandler { blog: blog.clone() },
            add: AddHandler { blog: blog.clone() },
            post: PostHandler { blog: blog.clone() },
            update: UpdateHandler { blog: blog.clone() },
            delete: DeleteHandler { blog: blog.clone() },
            like: LikeHandler { blog },
        }
    }
}

pub struct ListHandler<D> {
    blog: SharedBlog<D>,
}

impl<D: Database + Send + 'static> Handler for ListHandler<D> {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        let posts = try_handler!(lock!(self.blog).list());
        let payload = try_handler!(json::encode(&posts));
        Ok(Response::with((status::Ok, payload)))
    }
}

pub struct AddHandler<D> {
    blog: SharedBlog<D>,
}

impl<D: Database + Send + 'static> Handler for AddHandler<D> {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let form = try_handler!(read_form(req), status::BadRequest);

        let post = try_handler!(lock!(self.blog).add(form.author(), form.title(), form.content()));

        let payload = try_handler!(json::encode(&post));
        Ok(Response::with((status::Created, payload)))
    }
}

pub struct PostHandler<D> {
    blog: SharedBlog<D>,
}

impl<D: Database + Send + 'static> Handler for PostHandler<D> {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let id = try_handler!(parse_id(get_http_param!(req, "id")), status::BadRequest);

        let post = try_handler!(lock!(self.blog).get(id));
        let payload = try_handler!(json::encode(&post));
        Ok(Response::with((status::Ok, payload)))
    }
}

pub struct UpdateHandler<D> {
    blog: SharedBlog<D>,
}

impl<D: Database + Send + 'static> Handler for UpdateHandler<D> {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let id = try_handler!(parse_id(get_http_param!(req, "id")), status::BadRequest);
        let form = try_handler!(read_form(req), status::BadRequest);

        let post = try_handler!(lock!(self.blog).update(
            id,
            form.author(),
            form.title(),
            form.content()
        ));

        let payload = try_handler!(json::encode(&post));
        Ok(Response::with((status::Ok, payload)))
    }
}

pub struct DeleteHandler<D> {
    blog: SharedBlog<D>,
}

impl<D: Database + Send + 'static> Handler for DeleteHandler<D> {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let id = try_handler!(parse_id(get_http_param!(req, "id")), status::BadRequest);

        let remaining = try_handler!(lock!(self.blog).delete(id));
        let payload = try_handler!(json::encode(&remaining));
        Ok(Response::with((status::Ok, payload)))
    }
}

pub struct LikeHandler<D> {
    blog: SharedBlog<D>,
}

impl<D: Database + Send + 'static> Handler for LikeHandler<D> {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let id = try_handler!(parse_id(get_http_param!(req, "id")), status::BadRequest);

        match try_handler!(lock!(self.blog).like(id)) {
            Some(post) => {
                let payload = try_handler!(json::encode(&post));
                Ok(Response::with((status::Ok, payload)))
            }
            None => Ok(Response::with(status::NoContent)),
        }
    }
}

pub struct JsonAfterMiddleware;

impl AfterMiddleware for JsonAfterMiddleware {
    fn after(&self, _: &mut Request, mut res: Response) -> IronResult<Response> {
        res.headers.set(ContentType::json());
        Ok(res)
    }
}
