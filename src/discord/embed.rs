use crate::command::{help_fields, Reply, HELP_TITLE, STATUS_TITLE};
use crate::discord::models::{Embed, EmbedField, EmbedImage, MessagePayload};
use crate::notify::{truncate, DetailField, Notification};

/// Accent color of help and status embeds
pub const EMBED_COLOR: u32 = 0x5865F2;

const MAX_TITLE: usize = 256;
const MAX_DESCRIPTION: usize = 4096;
const MAX_FIELD_NAME: usize = 256;
const MAX_FIELD_VALUE: usize = 1024;
const MAX_FIELDS: usize = 25;
const MAX_CONTENT: usize = 2000;

impl From<&Notification> for Embed {
    fn from(notification: &Notification) -> Self {
        Embed {
            title: Some(truncate(&notification.title, MAX_TITLE)),
            description: Some(truncate(&notification.description(), MAX_DESCRIPTION)),
            url: Some(notification.url.clone()),
            color: None,
            fields: embed_fields(&notification.fields()),
            image: notification
                .image_url
                .as_ref()
                .map(|url| EmbedImage { url: url.clone() }),
        }
    }
}

/// Renders a command reply as a message
///
/// Help and status become embeds; confirmations and errors stay plain text.
pub fn reply_payload(reply: &Reply) -> MessagePayload {
    match reply {
        Reply::Text(_) | Reply::Error(_) => {
            MessagePayload::text(truncate(&reply.to_text(), MAX_CONTENT))
        }
        Reply::Help => MessagePayload::embed(Embed {
            title: Some(HELP_TITLE.to_string()),
            description: Some("Available commands:".to_string()),
            color: Some(EMBED_COLOR),
            fields: embed_fields(&help_fields()),
            ..Embed::default()
        }),
        Reply::Status(report) => MessagePayload::embed(Embed {
            title: Some(STATUS_TITLE.to_string()),
            color: Some(EMBED_COLOR),
            fields: embed_fields(&report.fields()),
            ..Embed::default()
        }),
    }
}

fn embed_fields(fields: &[DetailField]) -> Vec<EmbedField> {
    fields
        .iter()
        .take(MAX_FIELDS)
        .map(|f| EmbedField {
            name: truncate(f.name, MAX_FIELD_NAME),
            value: truncate(&f.value, MAX_FIELD_VALUE),
            inline: f.inline,
        })
        .collect()
}
