//! A small mustache-like template renderer for e-mails.
//!
//! Supported syntax:
//! * `{{field}}` inserts a value from the payload. Dotted paths (`{{buyer.name}}`) descend into nested objects. Values
//!   are HTML-escaped in bodies. Missing and `null` values render as an empty string.
//! * `{{#items}}...{{/items}}` repeats the enclosed block for each entry of the `items` array. Inside the block, fields
//!   are looked up on the entry first and then on the enclosing payload. A non-array value renders the block once if
//!   it is truthy. Sections can be nested.
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::Value;

use crate::{helpers::escape_html, traits::NotificationError};

static SECTION_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([#/])\s*([\w.]+)\s*\}\}").expect("section regex is valid"));
static FIELD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([\w.]+)\s*\}\}").expect("field regex is valid"));

/// Subject line and HTML body for one kind of e-mail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
}

impl EmailTemplate {
    pub fn new<S: Into<String>, B: Into<String>>(subject: S, body: B) -> Self {
        Self { subject: subject.into(), body: body.into() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmailTemplates {
    pub order_info_support: EmailTemplate,
    pub order_info_customer: EmailTemplate,
    pub payment_info_support: EmailTemplate,
    pub payment_info_customer: EmailTemplate,
}

/// Renders an HTML template against a serializable payload.
pub fn render_template<T: Serialize>(template: &str, data: &T) -> Result<String, NotificationError> {
    render(template, data, true)
}

/// Renders a plain-text template (such as a subject line). Values are inserted verbatim.
pub fn render_text<T: Serialize>(template: &str, data: &T) -> Result<String, NotificationError> {
    render(template, data, false)
}

fn render<T: Serialize>(template: &str, data: &T, escape: bool) -> Result<String, NotificationError> {
    let context = serde_json::to_value(data).map_err(|e| NotificationError::TemplateError(e.to_string()))?;
    render_block(template, &[&context], escape)
}

fn render_block(template: &str, scopes: &[&Value], escape: bool) -> Result<String, NotificationError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(tag) = SECTION_TAG_REGEX.captures(rest) {
        let (Some(whole), Some(name)) = (tag.get(0), tag.get(2)) else { break };
        let name = name.as_str();
        if &tag[1] == "/" {
            return Err(NotificationError::TemplateError(format!("section '{name}' is closed but was never opened")));
        }
        out.push_str(&render_fields(&rest[..whole.start()], scopes, escape));
        let (block, tail) = split_section(&rest[whole.end()..], name)?;
        match lookup(scopes, name) {
            Some(Value::Array(entries)) => {
                for entry in entries {
                    let mut inner = scopes.to_vec();
                    inner.push(entry);
                    out.push_str(&render_block(block, &inner, escape)?);
                }
            },
            Some(value) if is_truthy(value) => out.push_str(&render_block(block, scopes, escape)?),
            _ => {},
        }
        rest = tail;
    }
    out.push_str(&render_fields(rest, scopes, escape));
    Ok(out)
}

/// Splits `text` at the tag that closes the section `name`. Returns the section body and the text after the tag.
fn split_section<'a>(text: &'a str, name: &str) -> Result<(&'a str, &'a str), NotificationError> {
    let mut depth = 0usize;
    for tag in SECTION_TAG_REGEX.captures_iter(text) {
        let (Some(whole), Some(tag_name)) = (tag.get(0), tag.get(2)) else { continue };
        if tag_name.as_str() != name {
            continue;
        }
        match (&tag[1], depth) {
            ("#", _) => depth += 1,
            (_, 0) => return Ok((&text[..whole.start()], &text[whole.end()..])),
            _ => depth -= 1,
        }
    }
    Err(NotificationError::TemplateError(format!("section '{name}' is not closed")))
}

fn render_fields(text: &str, scopes: &[&Value], escape: bool) -> String {
    FIELD_REGEX
        .replace_all(text, |caps: &Captures| {
            let value = match lookup(scopes, &caps[1]) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                _ => String::new(),
            };
            if escape {
                escape_html(&value)
            } else {
                value
            }
        })
        .into_owned()
}

// Innermost scope wins.
fn lookup<'a>(scopes: &[&'a Value], path: &str) -> Option<&'a Value> {
    scopes.iter().rev().find_map(|scope| path.split('.').try_fold(*scope, |v, key| v.get(key)))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn fields_are_substituted_and_escaped() {
        let data = json!({"order_id": 12, "first_name": "Jane <b>", "paid": true, "buyer": {"name": "J. Doe"}});
        let out = render_template("Order #{{order_id}} for {{ first_name }}, {{buyer.name}} {{missing}}!", &data)
            .unwrap();
        assert_eq!(out, "Order #12 for Jane &lt;b&gt;, J. Doe !");
        let subject = render_text("{{first_name}} & co", &data).unwrap();
        assert_eq!(subject, "Jane <b> & co");
    }

    #[test]
    fn sections_repeat_for_each_entry() {
        let data = json!({
            "currency": "USD",
            "items": [
                {"title": "Ring", "price": "10.00", "quantity": 3},
                {"title": "Chain", "price": "5.00", "quantity": 2}
            ]
        });
        let template = "<ul>{{#items}}<li>{{quantity}} x {{title}} @ {{price}} {{currency}}</li>{{/items}}</ul>";
        let out = render_template(template, &data).unwrap();
        assert_eq!(out, "<ul><li>3 x Ring @ 10.00 USD</li><li>2 x Chain @ 5.00 USD</li></ul>");
    }

    #[test]
    fn conditional_sections() {
        let data = json!({"phone": "", "card_mask": "****4242"});
        let template = "{{#phone}}Phone: {{phone}}{{/phone}}{{#card_mask}}Card: {{card_mask}}{{/card_mask}}";
        assert_eq!(render_template(template, &data).unwrap(), "Card: ****4242");
    }

    #[test]
    fn nested_sections() {
        let data = json!({
            "items": [
                {"title": "Ring", "thumbnail": "https://cdn.example.com/ring.jpg"},
                {"title": "Chain", "thumbnail": ""}
            ]
        });
        let template = "{{#items}}[{{title}}{{#thumbnail}} <img src=\"{{thumbnail}}\">{{/thumbnail}}]{{/items}}";
        let out = render_template(template, &data).unwrap();
        assert_eq!(out, "[Ring <img src=\"https://cdn.example.com/ring.jpg\">][Chain]");
    }

    #[test]
    fn malformed_sections_are_errors() {
        let data = json!({"items": []});
        assert!(render_template("{{#items}}oops{{/things}}", &data).is_err());
        assert!(render_template("{{#items}} never closed", &data).is_err());
        assert!(render_template("stray {{/items}}", &data).is_err());
    }
}
