use serde::{Deserialize, Serialize};

/// An inbound channel message, consumed read-only by the pipeline.
///
/// Transports hand these over as JSON; unknown body shapes degrade to an
/// empty blob rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub id: String,
    pub channel_id: String,
    pub author: Author,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub embeds: Vec<Embed>,
    /// Arrived unhydrated; the body cannot be trusted until the source
    /// re-fetches the full message.
    #[serde(default)]
    pub partial: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    #[serde(default)]
    pub bot: bool,
    /// Webhook posts carry the bot flag but are legitimate notifications.
    #[serde(default)]
    pub webhook: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

impl RawMessage {
    /// Flatten the body into the single text blob the heuristics operate on.
    ///
    /// A rich embed takes precedence over the plain body: its description
    /// when non-empty, otherwise its name/value fields joined as
    /// `name: value` lines. An embed with neither yields an empty blob;
    /// the plain body is not consulted in that case.
    pub fn normalized_content(&self) -> String {
        if let Some(embed) = self.embeds.first() {
            if let Some(description) = &embed.description {
                if !description.is_empty() {
                    return description.clone();
                }
            }
            return embed
                .fields
                .iter()
                .map(|field| format!("{}: {}", field.name, field.value))
                .collect::<Vec<_>>()
                .join("\n");
        }
        self.content.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_with(content: &str, embeds: Vec<Embed>) -> RawMessage {
        RawMessage {
            id: "m1".to_string(),
            channel_id: "c1".to_string(),
            author: Author {
                id: "u1".to_string(),
                bot: false,
                webhook: false,
            },
            content: content.to_string(),
            embeds,
            partial: false,
        }
    }

    #[test]
    fn plain_body_is_used_without_embeds() {
        let msg = message_with("hello", vec![]);
        assert_eq!(msg.normalized_content(), "hello");
    }

    #[test]
    fn embed_description_wins_over_plain_body() {
        let msg = message_with(
            "ignored",
            vec![Embed {
                description: Some("🛒 New Order Received".to_string()),
                fields: vec![],
            }],
        );
        assert_eq!(msg.normalized_content(), "🛒 New Order Received");
    }

    #[test]
    fn embed_fields_are_joined_as_labelled_lines() {
        let msg = message_with(
            "",
            vec![Embed {
                description: None,
                fields: vec![
                    EmbedField {
                        name: "👤 First Name".to_string(),
                        value: "Ana".to_string(),
                    },
                    EmbedField {
                        name: "🆔 Order ID".to_string(),
                        value: "ORD-9".to_string(),
                    },
                ],
            }],
        );
        assert_eq!(
            msg.normalized_content(),
            "👤 First Name: Ana\n🆔 Order ID: ORD-9"
        );
    }

    #[test]
    fn empty_embed_yields_empty_blob_not_plain_body() {
        let msg = message_with("fallback text", vec![Embed::default()]);
        assert_eq!(msg.normalized_content(), "");
    }
}
