use log::info;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::model::Post;

/// Post operations over a `Database`.
///
/// Nothing is cached between calls: each operation reads the full
/// collection, changes it, and writes it back before returning.
pub struct Blog<D> {
    database: D,
}

impl<D: Database> Blog<D> {
    pub fn new(database: D) -> Blog<D> {
        Blog { database }
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    pub fn list(&self) -> Result<Vec<Post>> {
        self.database.load()
    }

    pub fn get(&self, id: u64) -> Result<Post> {
        self.database
            .load()?
            .into_iter()
            .find(|post| post.id == id)
            .ok_or(Error::NotFound(id))
    }

    /// Appends a post with the next free id and no likes.
    pub fn add(&mut self, author: &str, title: &str, content: &str) -> Result<Post> {
        validate(author, title, content)?;

        let mut posts = self.database.load()?;
        let id = posts.iter().map(|post| post.id).max().unwrap_or(0) + 1;
        let post = Post::new(id, author, title, content);
        posts.push(post.clone());
        self.database.save(&posts)?;

        info!("added post {} by {}", id, author);
        Ok(post)
    }

    /// Overwrites author, title and content. The id and likes stay as they were.
    pub fn update(&mut self, id: u64, author: &str, title: &str, content: &str) -> Result<Post> {
        validate(author, title, content)?;

        let mut posts = self.database.load()?;
        let updated = {
            let post = posts
                .iter_mut()
                .find(|post| post.id == id)
                .ok_or(Error::NotFound(id))?;
            post.author = author.to_string();
            post.title = title.to_string();
            post.content = content.to_string();
            post.clone()
        };
        self.database.save(&posts)?;

        info!("updated post {}", id);
        Ok(updated)
    }

    /// Removes the post with `id`, if there is one, and returns what is left.
    pub fn delete(&mut self, id: u64) -> Result<Vec<Post>> {
        let mut posts = self.database.load()?;
        if let Some(index) = posts.iter().position(|post| post.id == id) {
            posts.remove(index);
            self.database.save(&posts)?;
            info!("deleted post {}", id);
        }
        Ok(posts)
    }

    /// Adds one like. An unknown id is ignored.
    pub fn like(&mut self, id: u64) -> Result<Option<Post>> {
        let mut posts = self.database.load()?;
        let liked = match posts.iter_mut().find(|post| post.id == id) {
            Some(post) => {
                post.likes = post.likes.saturating_add(1);
                post.clone()
            }
            None => return Ok(None),
        };
        self.database.save(&posts)?;
        Ok(Some(liked))
    }
}

fn validate(author: &str, title: &str, content: &str) -> Result<()> {
    for &(field, value) in &[("author", author), ("title", title), ("content", content)] {
        if value.trim().is_empty() {
            return Err(Error::Validation(field));
        }
    }
    Ok(())
}
