use rustc_serialize::json::Json;
use rustc_serialize::{Decodable, Decoder, Encodable, Encoder};

/// A single blog entry as it is stored on disk and sent over the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub author: String,
    pub title: String,
    pub content: String,
    pub likes: u64,
}

impl Post {
    pub fn new(id: u64, author: &str, title: &str, content: &str) -> Post {
        Post {
            id,
            author: author.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            likes: 0,
        }
    }
}

impl Encodable for Post {
    fn encode<S: Encoder>(&self, s: &mut S) -> Result<(), S::Error> {
        s.emit_struct("Post", 5, |s| {
            s.emit_struct_field("id", 0, |s| self.id.encode(s))?;
            s.emit_struct_field("author", 1, |s| self.author.encode(s))?;
            s.emit_struct_field("title", 2, |s| self.title.encode(s))?;
            s.emit_struct_field("content", 3, |s| self.content.encode(s))?;
            s.emit_struct_field("likes", 4, |s| self.likes.encode(s))
        })
    }
}

impl Decodable for Post {
    fn decode<D: Decoder>(d: &mut D) -> Result<Post, D::Error> {
        d.read_struct("Post", 5, |d| {
            Ok(Post {
                id: d.read_struct_field("id", 0, Decodable::decode)?,
                author: d.read_struct_field("author", 1, Decodable::decode)?,
                title: d.read_struct_field("title", 2, Decodable::decode)?,
                content: d.read_struct_field("content", 3, Decodable::decode)?,
                // Files written before likes existed have no such key.
                likes: d
                    .read_struct_field("likes", 4, <Option<u64> as Decodable>::decode)?
                    .unwrap_or(0),
            })
        })
    }
}

/// Rejects stored posts whose `id` or `likes` is not a plain non-negative
/// integer. The decoder alone would accept quoted numbers such as `"3"`.
pub fn check_stored(value: &Json) -> Result<(), String> {
    let posts = match value.as_array() {
        Some(posts) => posts,
        None => return Ok(()),
    };
    for (index, post) in posts.iter().enumerate() {
        if let Some(id) = post.find("id") {
            if !id.is_u64() {
                return Err(format!("post {} has a non-integer id: {}", index, id));
            }
        }
        match post.find("likes") {
            None | Some(&Json::Null) => {}
            Some(likes) if likes.is_u64() => {}
            Some(likes) => {
                return Err(format!("post {} has a non-integer likes count: {}", index, likes))
            }
        }
    }
    Ok(())
}

/// Request body for creating or editing a post.
///
/// Fields are optional here so that a missing one is reported as a
/// validation failure for that field rather than as a malformed body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostForm {
    pub author: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostForm {
    pub fn author(&self) -> &str {
        self.author.as_ref().map_or("", String::as_str)
    }

    pub fn title(&self) -> &str {
        self.title.as_ref().map_or("", String::as_str)
    }

    pub fn content(&self) -> &str {
        self.content.as_ref().map_or("", String::as_str)
    }
}

impl Decodable for PostForm {
    fn decode<D: Decoder>(d: &mut D) -> Result<PostForm, D::Error> {
        d.read_struct("PostForm", 3, |d| {
            Ok(PostForm {
                author: d.read_struct_field("author", 0, Decodable::decode)?,
                title: d.read_struct_field("title", 1, Decodable::decode)?,
                content: d.read_struct_field("content", 2, Decodable::decode)?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_serialize::json;

    #[test]
    fn missing_likes_defaults_to_zero() {
        let post: Post =
            json::decode(r#"{"id": 3, "author": "Ann", "title": "T", "content": "C"}"#).unwrap();
        assert_eq!(post, Post::new(3, "Ann", "T", "C"));
    }

    #[test]
    fn null_likes_defaults_to_zero() {
        let post: Post = json::decode(
            r#"{"id": 1, "author": "a", "title": "b", "content": "c", "likes": null}"#,
        )
        .unwrap();
        assert_eq!(post.likes, 0);
    }

    #[test]
    fn stored_likes_are_kept() {
        let post: Post = json::decode(
            r#"{"id": 1, "author": "a", "title": "b", "content": "c", "likes": 7}"#,
        )
        .unwrap();
        assert_eq!(post.likes, 7);
    }

    #[test]
    fn missing_title_is_rejected() {
        let result: json::DecodeResult<Post> =
            json::decode(r#"{"id": 1, "author": "a", "content": "c"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let post: Post = json::decode(
            r#"{"id": 2, "author": "a", "title": "b", "content": "c", "likes": 1, "draft": true}"#,
        )
        .unwrap();
        assert_eq!(post.id, 2);
        assert_eq!(post.likes, 1);
    }

    #[test]
    fn encoding_writes_every_field() {
        let encoded = json::encode(&Post::new(1, "Alice", "Hello", "World")).unwrap();
        let value = json::Json::from_str(&encoded).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 5);
        assert_eq!(object["likes"].as_u64(), Some(0));
        assert_eq!(object["author"].as_string(), Some("Alice"));
    }

    #[test]
    fn stored_numbers_must_be_integers() {
        let ok = Json::from_str(r#"[{"id": 1, "likes": 4}, {"id": 2}, {"id": 3, "likes": null}]"#);
        assert_eq!(check_stored(&ok.unwrap()), Ok(()));

        for bad in &[
            r#"[{"id": "3", "likes": 1}]"#,
            r#"[{"id": 3, "likes": "2"}]"#,
            r#"[{"id": -1}]"#,
            r#"[{"id": 1.5}]"#,
        ] {
            assert!(check_stored(&Json::from_str(bad).unwrap()).is_err(), "{}", bad);
        }
    }

    #[test]
    fn form_with_missing_fields() {
        let form: PostForm = json::decode(r#"{"author": "Alice"}"#).unwrap();
        assert_eq!(form.author(), "Alice");
        assert_eq!(form.title(), "");
        assert_eq!(form.content(), "");
    }
}
