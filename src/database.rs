use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rustc_serialize::json::{self, Json};
use rustc_serialize::{Decodable, Encodable};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::model::{self, Post};

/// Durable home of the post collection.
///
/// The whole collection is the unit of persistence: `load` returns every
/// post in display order and `save` replaces everything that was there.
pub trait Database {
    fn load(&self) -> Result<Vec<Post>>;
    fn save(&mut self, posts: &[Post]) -> Result<()>;
}

/// Keeps posts in memory only. Nothing survives the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryDatabase {
    posts: Vec<Post>,
}

impl MemoryDatabase {
    pub fn new() -> MemoryDatabase {
        MemoryDatabase { posts: vec![] }
    }

    pub fn with_posts(posts: Vec<Post>) -> MemoryDatabase {
        MemoryDatabase { posts }
    }

    pub fn posts(&self) -> &Vec<Post> {
        &self.posts
    }
}

impl Database for MemoryDatabase {
    fn load(&self) -> Result<Vec<Post>> {
        Ok(self.posts.clone())
    }

    fn save(&mut self, posts: &[Post]) -> Result<()> {
        self.posts = posts.to_vec();
        Ok(())
    }
}

/// Stores posts as a pretty-printed JSON array in a single file.
#[derive(Clone, Debug)]
pub struct JsonDatabase {
    path: PathBuf,
}

impl JsonDatabase {
    /// Binds to `path`, creating it with an empty array if it is absent.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<JsonDatabase> {
        let mut database = JsonDatabase { path: path.into() };
        if !database.path.exists() {
            database.bootstrap()?;
        }
        Ok(database)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn bootstrap(&mut self) -> Result<()> {
        info!("initializing empty post store at {}", self.path.display());
        self.save(&[])
    }

    // The temporary file must live next to the target for the rename to be atomic.
    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    fn corrupt(&self, message: String) -> Error {
        warn!("post store {} is corrupt: {}", self.path.display(), message);
        Error::StorageCorrupt {
            path: self.path.clone(),
            message,
        }
    }
}

impl Database for JsonDatabase {
    fn load(&self) -> Result<Vec<Post>> {
        debug!("loading posts from {}", self.path.display());
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                // Removed behind our back; start over rather than fail.
                let mut database = self.clone();
                database.bootstrap()?;
                return Ok(vec![]);
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let contents = String::from_utf8(bytes).map_err(|e| self.corrupt(e.to_string()))?;
        let value = Json::from_str(&contents).map_err(|e| self.corrupt(e.to_string()))?;
        model::check_stored(&value).map_err(|message| self.corrupt(message))?;
        let posts: Vec<Post> = Decodable::decode(&mut json::Decoder::new(value))
            .map_err(|e| self.corrupt(e.to_string()))?;
        debug!("loaded {} posts", posts.len());
        Ok(posts)
    }

    fn save(&mut self, posts: &[Post]) -> Result<()> {
        let mut encoded = String::new();
        {
            let mut encoder = json::Encoder::new_pretty(&mut encoded);
            posts.encode(&mut encoder)?;
        }
        encoded.push('\n');

        let mut file = NamedTempFile::new_in(self.directory())?;
        file.write_all(encoded.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        debug!("saved {} posts to {}", posts.len(), self.path.display());
        Ok(())
    }
}
