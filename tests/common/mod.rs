//! Models shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use jsonapi_codec::{Fields, Links, Meta, Model, Nullable};
use serde_json::{json, Value};

#[derive(Debug, Default)]
pub struct BadModel {
    pub id: i64,
}

impl Model for BadModel {
    fn describe(fields: &mut Fields<Self>) {
        fields.field("primary", |m| &m.id, |m| &mut m.id);
    }
}

#[derive(Debug, Default)]
pub struct ModelBadTypes {
    pub id: String,
    pub string_field: String,
    pub float_field: f64,
    pub time_field: DateTime<Utc>,
    pub time_ptr_field: Option<DateTime<Utc>>,
}

impl Model for ModelBadTypes {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,badtypes", |m| &m.id, |m| &mut m.id)
            .field("attr,string_field", |m| &m.string_field, |m| &mut m.string_field)
            .field("attr,float_field", |m| &m.float_field, |m| &mut m.float_field)
            .field("attr,time_field", |m| &m.time_field, |m| &mut m.time_field)
            .field(
                "attr,time_ptr_field",
                |m| &m.time_ptr_field,
                |m| &mut m.time_ptr_field,
            );
    }
}

#[derive(Debug, Default)]
pub struct WithPointer {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub int_val: Option<i32>,
    pub float_val: Option<f32>,
}

impl Model for WithPointer {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,with-pointers", |m| &m.id, |m| &mut m.id)
            .field("attr,name", |m| &m.name, |m| &mut m.name)
            .field("attr,is-active", |m| &m.is_active, |m| &mut m.is_active)
            .field("attr,int-val", |m| &m.int_val, |m| &mut m.int_val)
            .field("attr,float-val", |m| &m.float_val, |m| &mut m.float_val);
    }
}

#[derive(Debug, Default)]
pub struct TimestampModel {
    pub id: i64,
    pub default_v: DateTime<Utc>,
    pub default_p: Option<DateTime<Utc>>,
    pub iso8601_v: DateTime<Utc>,
    pub iso8601_p: Option<DateTime<Utc>>,
    pub rfc3339_v: DateTime<Utc>,
    pub rfc3339_p: Option<DateTime<Utc>>,
}

impl Model for TimestampModel {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,timestamps", |m| &m.id, |m| &mut m.id)
            .field("attr,defaultv", |m| &m.default_v, |m| &mut m.default_v)
            .field("attr,defaultp", |m| &m.default_p, |m| &mut m.default_p)
            .field("attr,iso8601v,iso8601", |m| &m.iso8601_v, |m| &mut m.iso8601_v)
            .field("attr,iso8601p,iso8601", |m| &m.iso8601_p, |m| &mut m.iso8601_p)
            .field("attr,rfc3339v,rfc3339", |m| &m.rfc3339_v, |m| &mut m.rfc3339_v)
            .field("attr,rfc3339p,rfc3339", |m| &m.rfc3339_p, |m| &mut m.rfc3339_p);
    }
}

#[derive(Debug, Default)]
pub struct WithNullableAttrs {
    pub id: i64,
    pub name: String,
    pub int_time: Nullable<DateTime<Utc>>,
    pub rfc3339_time: Nullable<DateTime<Utc>>,
    pub iso8601_time: Nullable<DateTime<Utc>>,
    pub flag: Nullable<bool>,
    pub nullable_comment: Nullable<Box<Comment>>,
}

impl Model for WithNullableAttrs {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,with-nullables", |m| &m.id, |m| &mut m.id)
            .field("attr,name", |m| &m.name, |m| &mut m.name)
            .field("attr,int_time,omitempty", |m| &m.int_time, |m| &mut m.int_time)
            .field(
                "attr,rfc3339_time,rfc3339,omitempty",
                |m| &m.rfc3339_time,
                |m| &mut m.rfc3339_time,
            )
            .field(
                "attr,iso8601_time,iso8601,omitempty",
                |m| &m.iso8601_time,
                |m| &mut m.iso8601_time,
            )
            .field("attr,bool,omitempty", |m| &m.flag, |m| &mut m.flag)
            .field(
                "relation,nullable_comment,omitempty",
                |m| &m.nullable_comment,
                |m| &mut m.nullable_comment,
            );
    }
}

#[derive(Debug, Default)]
pub struct Car {
    pub id: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<u32>,
}

impl Model for Car {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,cars", |m| &m.id, |m| &mut m.id)
            .field("attr,make,omitempty", |m| &m.make, |m| &mut m.make)
            .field("attr,model,omitempty", |m| &m.model, |m| &mut m.model)
            .field("attr,year,omitempty", |m| &m.year, |m| &mut m.year);
    }
}

#[derive(Debug, Default)]
pub struct Blog {
    pub id: i64,
    pub client_id: String,
    pub title: String,
    pub posts: Vec<Box<Post>>,
    pub current_post: Option<Box<Post>>,
    pub current_post_id: i64,
    pub created_at: DateTime<Utc>,
    pub view_count: i64,
    pub links: Links,
}

impl Model for Blog {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,blogs", |m| &m.id, |m| &mut m.id)
            .field("client-id", |m| &m.client_id, |m| &mut m.client_id)
            .field("attr,title", |m| &m.title, |m| &mut m.title)
            .field("relation,posts", |m| &m.posts, |m| &mut m.posts)
            .field("relation,current_post", |m| &m.current_post, |m| &mut m.current_post)
            .field(
                "attr,current_post_id",
                |m| &m.current_post_id,
                |m| &mut m.current_post_id,
            )
            .field("attr,created_at", |m| &m.created_at, |m| &mut m.created_at)
            .field("attr,view_count", |m| &m.view_count, |m| &mut m.view_count)
            .field("links", |m| &m.links, |m| &mut m.links);
    }

    fn links(&self) -> Option<Links> {
        let mut counts = Meta::new();
        counts.insert("counts".into(), json!({"likes": 4, "comments": 20}));
        Some(
            Links::new()
                .href("self", format!("https://example.com/api/blogs/{}", self.id))
                .link(
                    "comments",
                    format!("https://example.com/api/blogs/{}/comments", self.id),
                    Some(counts),
                ),
        )
    }

    fn meta(&self) -> Option<Meta> {
        Some(meta(json!({"detail": "extra details regarding the blog"})))
    }

    fn relationship_links(&self, relation: &str) -> Option<Links> {
        match relation {
            "posts" => Some(Links::new().link(
                "related",
                format!("https://example.com/api/blogs/{}/posts", self.id),
                Some(meta(json!({"count": self.posts.len()}))),
            )),
            "current_post" => Some(
                Links::new()
                    .href("self", "https://example.com/api/posts/3")
                    .link(
                        "related",
                        format!("https://example.com/api/blogs/{}/current_post", self.id),
                        None,
                    ),
            ),
            _ => None,
        }
    }

    fn relationship_meta(&self, relation: &str) -> Option<Meta> {
        match relation {
            "posts" => Some(meta(
                json!({"this": {"can": {"go": ["as", "deep", {"as": "required"}]}}}),
            )),
            "current_post" => Some(meta(json!({"detail": "extra current_post detail"}))),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Post {
    pub id: u64,
    pub blog_id: i64,
    pub client_id: String,
    pub title: String,
    pub body: String,
    pub comments: Vec<Box<Comment>>,
    pub latest_comment: Option<Box<Comment>>,
    pub links: Links,
}

impl Model for Post {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,posts", |m| &m.id, |m| &mut m.id)
            .field("attr,blog_id", |m| &m.blog_id, |m| &mut m.blog_id)
            .field("client-id", |m| &m.client_id, |m| &mut m.client_id)
            .field("attr,title", |m| &m.title, |m| &mut m.title)
            .field("attr,body", |m| &m.body, |m| &mut m.body)
            .field("relation,comments", |m| &m.comments, |m| &mut m.comments)
            .field(
                "relation,latest_comment",
                |m| &m.latest_comment,
                |m| &mut m.latest_comment,
            )
            .field("links", |m| &m.links, |m| &mut m.links);
    }
}

#[derive(Debug, Default)]
pub struct Comment {
    pub id: i64,
    pub client_id: String,
    pub post_id: i64,
    pub body: String,
    pub links: Links,
}

impl Model for Comment {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,comments", |m| &m.id, |m| &mut m.id)
            .field("client-id", |m| &m.client_id, |m| &mut m.client_id)
            .field("attr,post_id", |m| &m.post_id, |m| &mut m.post_id)
            .field("attr,body", |m| &m.body, |m| &mut m.body)
            .field("links", |m| &m.links, |m| &mut m.links);
    }
}

#[derive(Debug, Default)]
pub struct Book {
    pub id: u64,
    pub author: String,
    pub isbn: String,
    pub title: String,
    pub description: Option<String>,
    pub pages: Option<u32>,
    pub published_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl Model for Book {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,books", |m| &m.id, |m| &mut m.id)
            .field("attr,author", |m| &m.author, |m| &mut m.author)
            .field("attr,isbn", |m| &m.isbn, |m| &mut m.isbn)
            .field("attr,title,omitempty", |m| &m.title, |m| &mut m.title)
            .field("attr,description", |m| &m.description, |m| &mut m.description)
            .field("attr,pages,omitempty", |m| &m.pages, |m| &mut m.pages)
            .field("", |m| &m.published_at, |m| &mut m.published_at)
            .field("attr,tags", |m| &m.tags, |m| &mut m.tags);
    }
}

#[derive(Debug, Default)]
pub struct GenericInterface {
    pub id: u64,
    pub data: Value,
}

impl Model for GenericInterface {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,generic", |m| &m.id, |m| &mut m.id)
            .field("attr,interface", |m| &m.data, |m| &mut m.data);
    }
}

#[derive(Debug, Default)]
pub struct BadComment {
    pub id: u64,
    pub body: String,
}

impl Model for BadComment {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,bad-comment", |m| &m.id, |m| &mut m.id)
            .field("attr,body", |m| &m.body, |m| &mut m.body);
    }

    fn links(&self) -> Option<Links> {
        let mut links = Links::new();
        links.insert("self", json!(["invalid", "should error"]));
        Some(links)
    }
}

#[derive(Debug, Default)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub boss: Box<Employee>,
    pub manager: Option<Box<Employee>>,
    pub teams: Vec<Box<Team>>,
    pub people: Vec<Option<Box<People>>>,
    pub founded_at: DateTime<Utc>,
}

impl Model for Company {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,companies", |m| &m.id, |m| &mut m.id)
            .field("attr,name", |m| &m.name, |m| &mut m.name)
            .field("attr,boss", |m| &m.boss, |m| &mut m.boss)
            .field("attr,manager", |m| &m.manager, |m| &mut m.manager)
            .field("attr,teams", |m| &m.teams, |m| &mut m.teams)
            .field("attr,people", |m| &m.people, |m| &mut m.people)
            .field("attr,founded-at,iso8601", |m| &m.founded_at, |m| &mut m.founded_at);
    }
}

#[derive(Debug, Default)]
pub struct CompanyOmitEmpty {
    pub id: String,
    pub name: String,
    pub boss: Box<Employee>,
    pub manager: Option<Box<Employee>>,
    pub teams: Vec<Box<Team>>,
    pub people: Vec<Option<Box<People>>>,
    pub founded_at: DateTime<Utc>,
}

impl Model for CompanyOmitEmpty {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,companies", |m| &m.id, |m| &mut m.id)
            .field("attr,name,omitempty", |m| &m.name, |m| &mut m.name)
            .field("attr,boss,omitempty", |m| &m.boss, |m| &mut m.boss)
            .field("attr,manager,omitempty", |m| &m.manager, |m| &mut m.manager)
            .field("attr,teams,omitempty", |m| &m.teams, |m| &mut m.teams)
            .field("attr,people,omitempty", |m| &m.people, |m| &mut m.people)
            .field(
                "attr,founded-at,iso8601,omitempty",
                |m| &m.founded_at,
                |m| &mut m.founded_at,
            );
    }
}

#[derive(Debug, Default)]
pub struct People {
    pub name: String,
    pub age: i64,
}

impl Model for People {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("attr,name", |m| &m.name, |m| &mut m.name)
            .field("attr,age", |m| &m.age, |m| &mut m.age);
    }
}

#[derive(Debug, Default)]
pub struct Team {
    pub name: String,
    pub leader: Option<Box<Employee>>,
    pub members: Vec<Box<Employee>>,
}

impl Model for Team {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("attr,name", |m| &m.name, |m| &mut m.name)
            .field("attr,leader", |m| &m.leader, |m| &mut m.leader)
            .field("attr,members", |m| &m.members, |m| &mut m.members);
    }
}

#[derive(Debug, Default)]
pub struct Employee {
    pub firstname: String,
    pub surname: String,
    pub age: i64,
    pub hired_at: Option<DateTime<Utc>>,
}

impl Model for Employee {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("attr,firstname", |m| &m.firstname, |m| &mut m.firstname)
            .field("attr,surname", |m| &m.surname, |m| &mut m.surname)
            .field("attr,age", |m| &m.age, |m| &mut m.age)
            .field("attr,hired-at,iso8601", |m| &m.hired_at, |m| &mut m.hired_at);
    }
}

#[derive(Debug, Default)]
pub struct Image {
    pub id: String,
    pub src: String,
}

impl Model for Image {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,images", |m| &m.id, |m| &mut m.id)
            .field("attr,src", |m| &m.src, |m| &mut m.src);
    }
}

#[derive(Debug, Default)]
pub struct Video {
    pub id: String,
    pub captions: String,
}

impl Model for Video {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,videos", |m| &m.id, |m| &mut m.id)
            .field("attr,captions", |m| &m.captions, |m| &mut m.captions);
    }
}

/// Variant set: at most one of the slots is populated.
#[derive(Debug, Default)]
pub struct OneOfMedia {
    pub image: Option<Box<Image>>,
    pub video: Option<Box<Video>>,
}

impl Model for OneOfMedia {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .variant(|m| &m.image, |m| &mut m.image)
            .variant(|m| &m.video, |m| &mut m.video);
    }
}

#[derive(Debug, Default)]
pub struct BlogPostWithPoly {
    pub id: String,
    pub title: String,
    pub hero: Option<Box<OneOfMedia>>,
    pub media: Vec<Box<OneOfMedia>>,
}

impl Model for BlogPostWithPoly {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,blogs", |m| &m.id, |m| &mut m.id)
            .field("attr,title", |m| &m.title, |m| &mut m.title)
            .field("polyrelation,hero-media,omitempty", |m| &m.hero, |m| &mut m.hero)
            .field("polyrelation,media,omitempty", |m| &m.media, |m| &mut m.media);
    }
}

/// Variant set wrongly declared under a plain relation.
#[derive(Debug, Default)]
pub struct PlainHero {
    pub id: u64,
    pub hero: Option<Box<OneOfMedia>>,
}

impl Model for PlainHero {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,plain-heroes", |m| &m.id, |m| &mut m.id)
            .field("relation,hero", |m| &m.hero, |m| &mut m.hero);
    }
}

/// Relation to a model that has no primary field.
#[derive(Debug, Default)]
pub struct UntypedOwner {
    pub id: u64,
    pub owner: Option<Box<People>>,
}

impl Model for UntypedOwner {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("primary,untyped-owners", |m| &m.id, |m| &mut m.id)
            .field("relation,owner", |m| &m.owner, |m| &mut m.owner);
    }
}

pub fn meta(value: Value) -> Meta {
    match value {
        Value::Object(map) => map,
        other => panic!("meta must be an object, got {other}"),
    }
}

pub fn image(id: &str, src: &str) -> Option<Box<Image>> {
    Some(Box::new(Image {
        id: id.into(),
        src: src.into(),
    }))
}

pub fn video(id: &str, captions: &str) -> Option<Box<Video>> {
    Some(Box::new(Video {
        id: id.into(),
        captions: captions.into(),
    }))
}

/// A blog with two posts, each with comments, and a current post.
pub fn test_blog() -> Blog {
    let comment = |id: i64, body: &str| {
        Box::new(Comment {
            id,
            body: body.into(),
            ..Comment::default()
        })
    };
    Blog {
        id: 5,
        title: "Title 1".into(),
        created_at: DateTime::from_timestamp(1_471_422_432, 0).unwrap_or_default(),
        posts: vec![
            Box::new(Post {
                id: 1,
                title: "Foo".into(),
                body: "Bar".into(),
                comments: vec![comment(1, "foo"), comment(2, "bar")],
                latest_comment: Some(comment(1, "foo")),
                ..Post::default()
            }),
            Box::new(Post {
                id: 2,
                title: "Fuubar".into(),
                body: "Bas".into(),
                comments: vec![comment(1, "foo"), comment(3, "bas")],
                latest_comment: Some(comment(1, "foo")),
                ..Post::default()
            }),
        ],
        current_post: Some(Box::new(Post {
            id: 1,
            title: "Foo".into(),
            body: "Bar".into(),
            comments: vec![comment(1, "foo"), comment(2, "bar")],
            latest_comment: Some(comment(1, "foo")),
            ..Post::default()
        })),
        ..Blog::default()
    }
}
