use serde::Serialize;

use crate::model::content::ReportContent;

/// Body posted to a Lark custom-bot webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LarkMessage {
    Text(TextMessage),
    Interactive(CardMessage),
    Post(PostMessage),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMessage {
    // carries the report name, which is what the webhook has always received here
    pub msg_type: String,
    pub content: TextContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardMessage {
    pub msg_type: &'static str,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub config: CardConfig,
    pub i18n_elements: CardI18nElements,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardConfig {
    pub wide_screen_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardI18nElements {
    pub zh_cn: Vec<CardElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum CardElement {
    Markdown {
        content: String,
    },
    Img {
        title: CardText,
        img_key: String,
        alt: CardText,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum CardText {
    LarkMd { content: String },
    PlainText { content: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMessage {
    pub msg_type: &'static str,
    pub content: PostContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostContent {
    pub post: PostLocales,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostLocales {
    pub zh_cn: PostBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostBody {
    pub title: String,
    pub content: Vec<Vec<PostElement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum PostElement {
    Text { text: String },
}

impl LarkMessage {
    /// Picks the template for `content`: error text first, then an image
    /// card when an upload produced a key, otherwise a plain post.
    pub fn build(
        content: &ReportContent,
        image_key: Option<&str>,
        link_title: &str,
        now: &str,
    ) -> Self {
        let description = content.description_or_empty();

        if let Some(text) = content.error_text() {
            return LarkMessage::Text(TextMessage {
                msg_type: content.name.clone(),
                content: TextContent {
                    text: format!("{description}\nError: {text}"),
                },
            });
        }

        if let Some(img_key) = image_key.filter(|k| !k.is_empty()) {
            return LarkMessage::Interactive(CardMessage {
                msg_type: "interactive",
                card: Card {
                    config: CardConfig {
                        wide_screen_mode: true,
                    },
                    i18n_elements: CardI18nElements {
                        zh_cn: vec![
                            CardElement::Markdown {
                                content: format!(
                                    "**{}**\n {now}\n[{link_title}]({})\n",
                                    content.name, content.url
                                ),
                            },
                            CardElement::Img {
                                title: CardText::LarkMd {
                                    content: format!(" {description}"),
                                },
                                img_key: img_key.to_string(),
                                alt: CardText::PlainText {
                                    content: description.to_string(),
                                },
                            },
                        ],
                    },
                },
            });
        }

        LarkMessage::Post(PostMessage {
            msg_type: "post",
            content: PostContent {
                post: PostLocales {
                    zh_cn: PostBody {
                        title: content.name.clone(),
                        content: vec![vec![PostElement::Text {
                            text: description.to_string(),
                        }]],
                    },
                },
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: &str = "2024-05-01 09:30:00";

    fn content() -> ReportContent {
        ReportContent::new("Sales", "http://superset/explore/?slice_id=1")
    }

    #[test]
    fn error_report_uses_text_template() {
        let content = content().with_description("Weekly").with_text("timeout");
        let message = LarkMessage::build(&content, Some("img_v2_x"), "Explore", NOW);

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "msg_type": "Sales",
                "content": { "text": "Weekly\nError: timeout" }
            })
        );
    }

    #[test]
    fn error_report_without_description() {
        let content = content().with_text("boom");
        let LarkMessage::Text(message) = LarkMessage::build(&content, None, "Explore", NOW) else {
            panic!("expected text template");
        };

        assert_eq!(message.content.text, "\nError: boom");
    }

    #[test]
    fn image_key_produces_interactive_card() {
        let content = content().with_description("Weekly");
        let message = LarkMessage::build(&content, Some("img_v2_abc"), "Explore in Superset", NOW);

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "msg_type": "interactive",
                "card": {
                    "config": { "wide_screen_mode": true },
                    "i18n_elements": {
                        "zh_cn": [
                            {
                                "tag": "markdown",
                                "content": "**Sales**\n 2024-05-01 09:30:00\n[Explore in Superset](http://superset/explore/?slice_id=1)\n"
                            },
                            {
                                "tag": "img",
                                "title": { "tag": "lark_md", "content": " Weekly" },
                                "img_key": "img_v2_abc",
                                "alt": { "tag": "plain_text", "content": "Weekly" }
                            }
                        ]
                    }
                }
            })
        );
    }

    #[test]
    fn plain_report_uses_post_template() {
        let message = LarkMessage::build(&content(), None, "Explore", NOW);

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "msg_type": "post",
                "content": {
                    "post": {
                        "zh_cn": {
                            "title": "Sales",
                            "content": [[{ "tag": "text", "text": "" }]]
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn empty_image_key_falls_back_to_post() {
        let message = LarkMessage::build(&content(), Some(""), "Explore", NOW);
        assert!(matches!(message, LarkMessage::Post(_)));
    }

    #[test]
    fn quotes_and_backslashes_stay_valid_json() {
        let content = content()
            .with_description(r#"say "hi" \ bye"#)
            .with_text("line1\nline2");
        let body = serde_json::to_string(&LarkMessage::build(&content, None, "Explore", NOW)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(
            parsed["content"]["text"],
            "say \"hi\" \\ bye\nError: line1\nline2"
        );
    }
}
