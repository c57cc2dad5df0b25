use super::editor::EditorState;
use crate::domain::models::Record;
use chrono::{DateTime, Local};
use uuid::Uuid;

pub type MessageId = Uuid;

/// An editable record attached to the log.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBubble {
    pub record: Record,
    pub is_new: bool,
    /// Present while the bubble is being edited.
    pub editor: Option<EditorState>,
}

impl RecordBubble {
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    Text(String),
    Record(Box<RecordBubble>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub sent: bool,
    pub timestamp: DateTime<Local>,
    pub body: MessageBody,
}

impl Message {
    fn new(sent: bool, body: MessageBody) -> Self {
        Self {
            id: Uuid::new_v4(),
            sent,
            timestamp: Local::now(),
            body,
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text(text) => Some(text),
            MessageBody::Record(_) => None,
        }
    }

    #[must_use]
    pub fn bubble(&self) -> Option<&RecordBubble> {
        match &self.body {
            MessageBody::Record(bubble) => Some(bubble),
            MessageBody::Text(_) => None,
        }
    }
}

/// Append-only message log; bubbles are replaced or removed in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conversation {
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn push_sent(&mut self, text: impl Into<String>) -> MessageId {
        self.push(Message::new(true, MessageBody::Text(text.into())))
    }

    pub fn push_received(&mut self, text: impl Into<String>) -> MessageId {
        self.push(Message::new(false, MessageBody::Text(text.into())))
    }

    pub fn push_record(&mut self, record: Record, editor: Option<EditorState>) -> MessageId {
        let is_new = record.is_new;
        self.push(Message::new(
            false,
            MessageBody::Record(Box::new(RecordBubble {
                record,
                is_new,
                editor,
            })),
        ))
    }

    fn push(&mut self, message: Message) -> MessageId {
        let id = message.id;
        self.messages.push(message);
        id
    }

    #[must_use]
    pub fn position(&self, id: MessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }

    pub fn bubble_mut(&mut self, id: MessageId) -> Option<&mut RecordBubble> {
        self.messages
            .iter_mut()
            .find(|m| m.id == id)
            .and_then(|m| match &mut m.body {
                MessageBody::Record(bubble) => Some(bubble.as_mut()),
                MessageBody::Text(_) => None,
            })
    }

    pub fn remove(&mut self, id: MessageId) -> Option<Message> {
        let index = self.position(id)?;
        Some(self.messages.remove(index))
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Ids of record bubbles, oldest first.
    #[must_use]
    pub fn bubble_ids(&self) -> Vec<MessageId> {
        self.messages
            .iter()
            .filter(|m| m.bubble().is_some())
            .map(|m| m.id)
            .collect()
    }

    #[must_use]
    pub fn last_text(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(Message::text)
    }
}
