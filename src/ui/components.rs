use anyhow::Context;
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::users::repo_types::User;

/// Local draft of the form fields; posted as a whole on submit.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl UserDraft {
    /// Pre-fill from a stored record. The hash is never echoed back into the
    /// password input.
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            password: String::new(),
        }
    }

    pub fn without_password(self) -> Self {
        Self {
            password: String::new(),
            ..self
        }
    }
}

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{title}}</title>
</head>
<body>
<nav class="navbar"><a href="/">Users</a> | <a href="/add">Add User</a></nav>
<div class="container">
<h2>{{title}}</h2>
{{{body}}}
</div>
</body>
</html>"#;

const USER_TABLE: &str = r#"<table class="table">
<thead><tr><th>ID</th><th>Name</th><th>Email</th><th>Actions</th></tr></thead>
<tbody>{{#each users}}<tr><td>{{id}}</td><td>{{name}}</td><td>{{email}}</td><td><a class="btn" href="/edit/{{id}}">Edit</a> <form method="post" action="/delete/{{id}}" style="display:inline"><button type="submit" class="btn btn-danger">Delete</button></form></td></tr>{{/each}}</tbody>
</table>"#;

const USER_FORM: &str = r#"<form method="post" action="{{action}}">
<div class="form-group"><label>Name</label><input type="text" name="name" value="{{draft.name}}" required></div>
<div class="form-group"><label>Email</label><input type="email" name="email" value="{{draft.email}}" required></div>
<div class="form-group"><label>Password</label><input type="password" name="password" value="{{draft.password}}"{{#if password_required}} required{{/if}}></div>
<button type="submit" class="btn btn-primary">Save</button>
</form>"#;

/// Handlebars registry for the UI pages. `{{...}}` output is HTML-escaped;
/// only the layout's `{{{body}}}` slot takes pre-rendered markup.
pub struct Templates {
    handlebars: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> anyhow::Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars
            .register_template_string("layout", LAYOUT)
            .context("register layout template")?;
        handlebars
            .register_template_string("user_table", USER_TABLE)
            .context("register user_table template")?;
        handlebars
            .register_template_string("user_form", USER_FORM)
            .context("register user_form template")?;
        Ok(Self { handlebars })
    }

    pub fn layout(&self, title: &str, body: &str) -> anyhow::Result<String> {
        self.handlebars
            .render("layout", &json!({ "title": title, "body": body }))
            .context("render layout")
    }

    pub fn user_table(&self, users: &[User]) -> anyhow::Result<String> {
        // Only the displayed columns go into the context; the hash stays out.
        let rows: Vec<_> = users
            .iter()
            .map(|u| json!({ "id": u.id, "name": u.name, "email": u.email }))
            .collect();
        self.handlebars
            .render("user_table", &json!({ "users": rows }))
            .context("render user_table")
    }

    /// `password_required` is off on the edit form, where a blank password
    /// keeps the stored one.
    pub fn user_form(
        &self,
        action: &str,
        draft: &UserDraft,
        password_required: bool,
    ) -> anyhow::Result<String> {
        self.handlebars
            .render(
                "user_form",
                &json!({
                    "action": action,
                    "draft": draft,
                    "password_required": password_required,
                }),
            )
            .context("render user_form")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn user(id: i64, name: &str) -> User {
        User {
            id,
            name: name.into(),
            email: format!("u{id}@x.com"),
            password: "$argon2id$hash".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn escapes_markup() {
        let templates = Templates::new().unwrap();
        let html = templates
            .layout(r#"<b a="1">Tom & 'Jerry'</b>"#, "<p>body</p>")
            .unwrap();
        assert!(html.contains("<title>&lt;b a"));
        assert!(html.contains("&quot;1&quot;&gt;Tom &amp;"));
        assert!(!html.contains("<b a="));
        assert!(!html.contains("'Jerry'"));
        // Pre-rendered page bodies pass through untouched.
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn table_has_row_per_user_with_actions() {
        let templates = Templates::new().unwrap();
        let html = templates
            .user_table(&[user(1, "Ana"), user(2, "<script>")])
            .unwrap();
        assert_eq!(html.matches("<tr><td>").count(), 2);
        assert!(html.contains(r#"href="/edit/1""#));
        assert!(html.contains(r#"action="/delete/2""#));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("argon2"));
    }

    #[test]
    fn empty_table_has_empty_body() {
        let html = Templates::new().unwrap().user_table(&[]).unwrap();
        assert!(html.contains("<tbody></tbody>"));
    }

    #[test]
    fn form_prefills_draft() {
        let draft = UserDraft::from_user(&user(3, "Ana"));
        assert!(draft.password.is_empty());
        let html = Templates::new()
            .unwrap()
            .user_form("/edit/3", &draft, false)
            .unwrap();
        assert!(html.contains(r#"value="Ana""#));
        assert!(html.contains(r#"value="u3@x.com""#));
        assert!(html.contains(r#"<input type="password" name="password" value="">"#));
    }

    #[test]
    fn create_form_requires_password() {
        let html = Templates::new()
            .unwrap()
            .user_form("/add", &UserDraft::default(), true)
            .unwrap();
        assert!(html.contains(r#"name="password" value="" required"#));
    }
}
